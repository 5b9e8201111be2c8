use catalog_app::{config::DatabaseConfig, domain::products::data::NewProduct};
use clap::Args;

use crate::cli::{open, print_product};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// Product name
    #[arg(long)]
    name: String,

    /// Unit price
    #[arg(long)]
    price: f64,

    /// Create the product already marked unavailable
    #[arg(long)]
    unavailable: bool,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let app = open(&args.database).await?;

    let result = app
        .products
        .create_product(NewProduct {
            name: args.name,
            price: args.price,
            available: args.unavailable.then_some(false),
        })
        .await;

    app.close().await;

    let product = result.map_err(|error| format!("failed to create product: {error}"))?;

    print_product(&product);

    Ok(())
}
