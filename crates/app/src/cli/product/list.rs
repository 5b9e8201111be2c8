use catalog_app::{
    config::DatabaseConfig,
    domain::products::data::{DEFAULT_LIMIT, DEFAULT_PAGE, Pagination},
};
use clap::Args;

use crate::cli::{open, print_product};

#[derive(Debug, Args)]
pub(crate) struct ListProductsArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    page: u32,

    /// Products per page
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: u32,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: ListProductsArgs) -> Result<(), String> {
    let pagination = Pagination::new(args.page, args.limit).map_err(|error| error.to_string())?;

    let app = open(&args.database).await?;

    let result = app.products.list_products(pagination).await;

    app.close().await;

    let page = result.map_err(|error| format!("failed to list products: {error}"))?;

    for product in &page.data {
        print_product(product);
        println!();
    }

    println!(
        "page {} of {} ({} active products, {} per page)",
        page.meta.page, page.meta.pages, page.meta.total, page.meta.limit
    );

    Ok(())
}
