//! Open a payment and print the vendor response.
//!
//! ```text
//! MONEYFUSION_API_URL=https://www.pay.moneyfusion.net/... \
//!     cargo run --example create_payment -- --total 10000 --phone 0101010101 --name assemienDev
//! ```

use clap::Parser;
use moneyfusion_pay::utils::init_logger;
use moneyfusion_pay::{Article, ClientConfig, PaymentClient, PaymentRequest};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Create a Money Fusion Pay payment")]
struct Args {
    #[arg(long)]
    total: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value_t = 1)]
    user_id: i64,
    #[arg(long, default_value_t = 1)]
    order_id: i64,
    #[arg(long, default_value = "https://example.com/callback")]
    return_url: String,
    #[arg(long, default_value = "https://example.com/webhook")]
    webhook_url: String,
    /// Article as name:price:quantity, repeatable
    #[arg(long = "article", value_parser = parse_article)]
    articles: Vec<Article>,
}

fn parse_article(raw: &str) -> Result<Article, String> {
    let mut parts = raw.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(price), Some(quantity)) => {
            let quantity = quantity
                .parse()
                .map_err(|e| format!("invalid quantity {quantity:?}: {e}"))?;
            Ok(Article::new(name, price, quantity))
        }
        _ => Err(format!("expected name:price:quantity, got {raw:?}")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("moneyfusion_pay=debug,create_payment=info");

    let args = Args::parse();
    let client = PaymentClient::from_config(ClientConfig::from_env()?)?;

    let request = PaymentRequest::new(
        args.total,
        args.phone,
        args.name,
        args.user_id,
        args.order_id,
        args.return_url,
        args.webhook_url,
    )
    .with_articles(args.articles);

    let response = client.create_payment(&request).await?;
    info!(token = ?response.get("token"), "Payment opened");
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
