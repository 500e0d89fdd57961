//! Example Payssion client.
//!
//! Creates a payment, queries it and refunds part of it against the sandbox.
//!
//! Run with:
//! ```bash
//! cargo run --example payssion
//! ```
//!
//! Environment variables (a `.env` file is honoured):
//! - PAYSSION_API_KEY / PAYSSION_SECRET_KEY: sandbox credentials
//! - PAYSSION_LIVE_MODE: set to `true` to hit the live gateway (default here: sandbox)
//! - PAYSSION_TRANSACTION_ID: transaction to query and refund

use payssion_rs::{CreateParams, DetailsParams, PayssionClient, PayssionConfig, RefundParams};
use std::time::{SystemTime, UNIX_EPOCH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    if std::env::var("PAYSSION_LIVE_MODE").is_err() {
        std::env::set_var("PAYSSION_LIVE_MODE", "false");
    }
    let config = PayssionConfig::from_env()?;
    println!("Gateway: {}", config.base_url);
    let client = PayssionClient::from_config(config)?;

    let order_id = format!(
        "test_order_{}",
        SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis()
    );

    println!("\n1. Creating a payment...");
    let created = client
        .create(
            CreateParams::new("alipay_cn", "10.00", "USD", &order_id)
                .with_description("Test payment from payssion-rs")
                .with_return_url("https://your-site.com/return")
                .with_notify_url("https://your-site.com/notify"),
        )
        .await?;
    println!("{}", serde_json::to_string_pretty(&created.response)?);
    println!("Is success: {}", created.is_success);
    if let (true, Some(url)) = (created.is_success, created.response.redirect_url()) {
        println!("Payment URL: {}", url);
    }

    let transaction_id = std::env::var("PAYSSION_TRANSACTION_ID")
        .ok()
        .or_else(|| created.response.transaction_id().map(str::to_string))
        .unwrap_or_else(|| "your_transaction_id_here".to_string());

    println!("\n2. Getting payment details...");
    match client
        .get_details(DetailsParams::by_transaction(&transaction_id).with_order_id(&order_id))
        .await
    {
        Ok(details) => println!("{}", serde_json::to_string_pretty(&details.response)?),
        Err(e) => println!("Details error: {}", e),
    }

    println!("\n3. Processing refund...");
    match client
        .refund(RefundParams::new(&transaction_id, "5.00", "USD"))
        .await
    {
        Ok(refund) => println!("{}", serde_json::to_string_pretty(&refund.response)?),
        Err(e) => println!("Refund error: {}", e),
    }

    Ok(())
}
