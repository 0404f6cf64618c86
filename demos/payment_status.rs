//! Look up a payment by token.
//!
//! ```text
//! cargo run --example payment_status -- <token>
//! ```

use clap::Parser;
use moneyfusion_pay::utils::init_logger;
use moneyfusion_pay::PaymentClient;

#[derive(Parser, Debug)]
#[command(about = "Fetch the status of a Money Fusion Pay payment")]
struct Args {
    /// Payment token returned by create_payment
    token: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("moneyfusion_pay=debug");

    let args = Args::parse();
    // The status endpoint is fixed, so the creation URL is not needed here
    let client = PaymentClient::new(std::env::var("MONEYFUSION_API_URL").unwrap_or_default());

    let response = client.get_payment(&args.token).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
