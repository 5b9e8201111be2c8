use catalog_app::{config::DatabaseConfig, domain::products::records::ProductId};
use clap::Args;

use crate::cli::{open, print_product};

#[derive(Debug, Args)]
pub(crate) struct GetProductArgs {
    /// Product id
    #[arg(long)]
    id: ProductId,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: GetProductArgs) -> Result<(), String> {
    let app = open(&args.database).await?;

    let result = app.products.get_product(args.id).await;

    app.close().await;

    let product = result.map_err(|error| error.to_string())?;

    print_product(&product);

    Ok(())
}
