//! E-Shop CLI - Terminal front end for the E-Shop client.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (token cached in the session file)
//! eshop login -e shopper@example.com -p secret
//!
//! # Browse the catalog
//! eshop products list --category Furniture --sort price-asc
//! eshop products show 3
//!
//! # Place an order (three-step checkout)
//! eshop order --product 3 --quantity 2 --address 7
//!
//! # Admin product management
//! eshop product create --name Lamp --category Furniture --price 200 --stock 5
//! eshop product delete 3
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `signup` - Session management
//! - `products` - Catalog browsing
//! - `order` - Order placement
//! - `product` - Admin product management

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use eshop_storefront::catalog::SortBy;

mod commands;

#[derive(Parser)]
#[command(name = "eshop")]
#[command(author, version, about = "E-Shop client CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and cache the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Destroy the cached session
    Logout,
    /// Create a new account
    Signup {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        contact_number: String,
    },
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Place an order through the checkout flow
    Order {
        /// Product to buy
        #[arg(long)]
        product: i64,

        /// How many units
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,

        /// Ship to an existing address
        #[arg(long, conflicts_with = "new_address")]
        address: Option<i64>,

        /// Ship to a new address, `name,contact,street,city,state,zip`
        #[arg(long, value_delimiter = ',')]
        new_address: Option<Vec<String>>,
    },
    /// Manage products (admin)
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, optionally filtered and sorted
    List {
        /// Name substring filter (case-insensitive)
        #[arg(short, long)]
        query: Option<String>,

        /// Exact category filter
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order (`default`, `price-desc`, `price-asc`, `newest`)
        #[arg(short, long, default_value = "default")]
        sort: SortBy,
    },
    /// Show one product
    Show {
        /// Product ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a product
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        price: String,

        #[arg(long)]
        stock: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        manufacturer: String,

        #[arg(long)]
        image_url: Option<String>,
    },
    /// Replace a product
    Update {
        /// Product ID
        id: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        price: String,

        #[arg(long)]
        stock: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        manufacturer: String,

        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&email, &password).await?,
        Commands::Logout => commands::auth::logout()?,
        Commands::Signup {
            first_name,
            last_name,
            email,
            password,
            contact_number,
        } => {
            commands::auth::signup(&first_name, &last_name, &email, &password, &contact_number)
                .await?;
        }
        Commands::Products { action } => match action {
            ProductsAction::List {
                query,
                category,
                sort,
            } => commands::products::list(query, category, sort).await?,
            ProductsAction::Show { id } => commands::products::show(id).await?,
        },
        Commands::Order {
            product,
            quantity,
            address,
            new_address,
        } => commands::order::place(product, quantity, address, new_address).await?,
        Commands::Product { action } => match action {
            ProductAction::Create {
                name,
                category,
                price,
                stock,
                description,
                manufacturer,
                image_url,
            } => {
                commands::admin::create(commands::admin::FormArgs {
                    name,
                    category,
                    price,
                    stock,
                    description,
                    manufacturer,
                    image_url,
                })
                .await?;
            }
            ProductAction::Update {
                id,
                name,
                category,
                price,
                stock,
                description,
                manufacturer,
                image_url,
            } => {
                commands::admin::update(
                    id,
                    commands::admin::FormArgs {
                        name,
                        category,
                        price,
                        stock,
                        description,
                        manufacturer,
                        image_url,
                    },
                )
                .await?;
            }
            ProductAction::Delete { id } => commands::admin::delete(id).await?,
        },
    }
    Ok(())
}
