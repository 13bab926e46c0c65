//! Product listing and creation.

use anyhow::Result;

use crate::client::{DataAccess, HttpClient, ProductInput};
use crate::config::Config;
use crate::session::Session;

pub async fn run_list(config: &Config) -> Result<()> {
    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;
    let products = client.list_products(&session).await?;

    if products.is_empty() {
        println!("No products yet. Add one with `fcst products add <name>`.");
        return Ok(());
    }

    println!("{:>6}  {:<28} {:<16}", "ID", "NAME", "SKU");
    println!("{}", "-".repeat(54));
    for product in &products {
        println!(
            "{:>6}  {:<28} {:<16}",
            product.product_id,
            product.product_name,
            product.sku.as_deref().unwrap_or("-")
        );
    }
    println!();
    println!("{} products.", products.len());
    Ok(())
}

pub async fn run_add(
    config: &Config,
    name: &str,
    sku: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;
    let product = client
        .create_product(
            &session,
            &ProductInput {
                org_id: session.org_id,
                product_name: name.to_string(),
                sku,
                description,
            },
        )
        .await?;
    println!(
        "Created product '{}' (id {}).",
        product.product_name, product.product_id
    );
    Ok(())
}
