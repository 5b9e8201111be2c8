use clap::{Args, Subcommand};

mod create;
mod get;
mod list;
mod remove;
mod validate;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Create a product
    Create(create::CreateProductArgs),
    /// List active products one page at a time
    List(list::ListProductsArgs),
    /// Show one active product
    Get(get::GetProductArgs),
    /// Mark a product unavailable
    Remove(remove::RemoveProductArgs),
    /// Check that every id exists
    Validate(validate::ValidateProductsArgs),
}

pub(crate) async fn run(command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => create::run(args).await,
        ProductSubcommand::List(args) => list::run(args).await,
        ProductSubcommand::Get(args) => get::run(args).await,
        ProductSubcommand::Remove(args) => remove::run(args).await,
        ProductSubcommand::Validate(args) => validate::run(args).await,
    }
}
