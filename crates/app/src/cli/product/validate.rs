use catalog_app::{config::DatabaseConfig, domain::products::records::ProductId};
use clap::Args;

use crate::cli::open;

#[derive(Debug, Args)]
pub(crate) struct ValidateProductsArgs {
    /// Comma separated product ids
    #[arg(long, value_delimiter = ',', required = true)]
    ids: Vec<ProductId>,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: ValidateProductsArgs) -> Result<(), String> {
    let app = open(&args.database).await?;

    let result = app.products.validate_products(args.ids).await;

    app.close().await;

    let products = result.map_err(|error| error.to_string())?;

    for product in products {
        println!("{}: {} (available: {})", product.id, product.name, product.available);
    }

    Ok(())
}
