use catalog_app::{
    config::DatabaseConfig, context::AppContext, domain::products::records::ProductRecord,
};
use clap::{Parser, Subcommand};

mod db;
mod product;

#[derive(Debug, Parser)]
#[command(name = "catalog-app", about = "Product catalog CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Product(product::ProductCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Product(command) => product::run(command).await,
        }
    }
}

async fn open(config: &DatabaseConfig) -> Result<AppContext, String> {
    AppContext::from_database_url(&config.database_url)
        .await
        .map_err(|error| format!("failed to open catalog: {error}"))
}

fn print_product(product: &ProductRecord) {
    println!("id: {}", product.id);
    println!("name: {}", product.name);
    println!("price: {}", product.price);
    println!("available: {}", product.available);
}
