//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use catalog_app::domain::products::{
    MockProductsService,
    records::{ProductId, ProductRecord},
};

use crate::state::State;

pub(crate) fn make_product(id: ProductId) -> ProductRecord {
    ProductRecord {
        id,
        name: format!("Product {id}"),
        price: 100.0,
        available: true,
    }
}

pub(crate) fn state_with_products(products: MockProductsService) -> Arc<State> {
    Arc::new(State::new(Arc::new(products)))
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_products(products)))
            .push(route),
    )
}
