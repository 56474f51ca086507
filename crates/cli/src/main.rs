//! Tienda CLI - Terminal front end for the demo store.
//!
//! # Usage
//!
//! ```bash
//! tienda catalog
//! tienda add 3
//! tienda cart
//! tienda dec 0
//! tienda checkout -n "Ana" -e ana@example.com -a "Av. Corrientes 1234"
//! tienda orders
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products
//! - `cart` - Show the cart
//! - `add`, `inc`, `dec`, `remove`, `clear` - Change the cart
//! - `checkout` - Pay for the cart
//! - `orders` - Show completed orders
//!
//! State lives in `TIENDA_DATA_DIR` (default `.tienda`), so each invocation
//! picks up the cart left by the previous one.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tienda_core::{CartCommand, ProductId};
use tienda_storefront::services::CheckoutForm;
use tienda_storefront::{Storefront, StorefrontConfig};

mod commands;

#[derive(Parser)]
#[command(name = "tienda")]
#[command(author, version, about = "Tienda demo store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products for sale
    Catalog,
    /// Show the cart
    Cart,
    /// Add one unit of a product
    Add {
        /// Product id, as shown by `catalog`
        product_id: ProductId,
    },
    /// Add one unit to a cart line
    Inc {
        /// Line index, as shown by `cart`
        index: usize,
    },
    /// Take one unit from a cart line (removes the line at zero)
    Dec {
        /// Line index, as shown by `cart`
        index: usize,
    },
    /// Remove a cart line
    Remove {
        /// Line index, as shown by `cart`
        index: usize,
    },
    /// Empty the cart
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Pay for the cart
    Checkout {
        /// Customer name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Customer email address
        #[arg(short, long, default_value = "")]
        email: String,

        /// Delivery address
        #[arg(short, long, default_value = "")]
        address: String,
    },
    /// Show completed orders
    Orders,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr so rendered views on stdout stay clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tienda_storefront=info,tienda_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let mut shop = Storefront::open_simulated(&config).await;

    match cli.command {
        Commands::Catalog => commands::cart::catalog(&shop)?,
        Commands::Cart => commands::cart::show(&shop)?,
        Commands::Add { product_id } => {
            commands::cart::apply(&mut shop, CartCommand::Add(product_id))?;
        }
        Commands::Inc { index } => {
            commands::cart::apply(&mut shop, CartCommand::Increment(index))?;
        }
        Commands::Dec { index } => {
            commands::cart::apply(&mut shop, CartCommand::Decrement(index))?;
        }
        Commands::Remove { index } => {
            commands::cart::apply(&mut shop, CartCommand::Remove(index))?;
        }
        Commands::Clear { yes } => commands::cart::clear(&mut shop, yes)?,
        Commands::Checkout {
            name,
            email,
            address,
        } => {
            let form = CheckoutForm {
                name,
                email,
                address,
            };
            commands::checkout::run(&mut shop, form).await?;
        }
        Commands::Orders => commands::checkout::history(&shop)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_product_id() {
        let cli = Cli::try_parse_from(["tienda", "add", "3"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::Add { product_id } if product_id == ProductId::new(3)
        ));
    }

    #[test]
    fn test_rejects_negative_index() {
        assert!(Cli::try_parse_from(["tienda", "dec", "-1"]).is_err());
    }
}
