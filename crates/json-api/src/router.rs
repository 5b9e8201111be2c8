//! App Router

use salvo::Router;

use crate::products;

pub(crate) fn app_router() -> Router {
    Router::new().push(
        Router::with_path("products")
            .get(products::index::handler)
            .post(products::create::handler)
            .push(Router::with_path("validate").post(products::validate::handler))
            .push(
                Router::with_path("{id}")
                    .get(products::get::handler)
                    .patch(products::update::handler)
                    .delete(products::delete::handler),
            ),
    )
}
