//! HTTP client example for the product catalog API
//!
//! Walks through every endpoint of the REST contract using the shared
//! `catalog_core` types and a plain reqwest client.
//!
//! Usage:
//!   cargo run -p api-client [--url http://localhost:3000]

use catalog_core::{Product, ProductStats};

const DEFAULT_URL: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::args()
        .nth(1)
        .filter(|arg| !arg.starts_with('-'))
        .or_else(|| std::env::args().skip_while(|arg| arg != "--url").nth(1))
        .unwrap_or_else(|| DEFAULT_URL.to_string());
    let products_url = format!("{}/products", base_url.trim_end_matches('/'));

    println!("Product Catalog API Client Demo");
    println!("===============================\n");
    println!("Connecting to: {}\n", products_url);

    let client = reqwest::Client::new();

    // 1. List all products
    println!("1. Listing products...\n");
    let products: Vec<Product> = client
        .get(&products_url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    for p in &products {
        println!("   - [{}] {} ({}) {:.2}", p.id_str(), p.name, p.category, p.price);
    }

    let stats = ProductStats::from_products(&products);
    println!(
        "\n   {} product(s), total value {:.2}, average price {:.2}\n",
        stats.total_products, stats.total_value, stats.average_price
    );

    // 2. Create a product
    println!("2. Creating a product...\n");
    let now = jiff::Timestamp::now();
    let mut draft = Product::new("Demo Lamp", "Home & Garden", 24.99);
    draft.created_at = Some(now);
    draft.updated_at = Some(now);

    let created: Product = client
        .post(&products_url)
        .json(&draft)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let id = created.id_str().to_string();
    println!("   Created '{}' with id {}\n", created.name, id);

    // 3. Fetch it back
    println!("3. Getting product {}...\n", id);
    let fetched: Product = client
        .get(format!("{}/{}", products_url, id))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("   {}", serde_json::to_string_pretty(&fetched)?);
    println!();

    // 4. Update the price
    println!("4. Updating price of {}...\n", id);
    let mut changed = fetched.clone();
    changed.price = 19.99;
    changed.updated_at = Some(jiff::Timestamp::now());
    let updated: Product = client
        .put(format!("{}/{}", products_url, id))
        .json(&changed)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("   New price: {:.2}\n", updated.price);

    // 5. Delete it
    println!("5. Deleting product {}...\n", id);
    let response = client
        .delete(format!("{}/{}", products_url, id))
        .send()
        .await?
        .error_for_status()?;
    println!("   Status: {}", response.status());

    println!("\nDemo complete!");

    Ok(())
}
