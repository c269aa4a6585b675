use anyhow::Context;

use orderdesk_app::{App, walkthrough};
use orderdesk_infra::OrderDeskConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = OrderDeskConfig::from_env().context("loading configuration")?;
    orderdesk_observability::init(&config.log);

    tracing::info!(max_item_price = %config.menu.max_price, "orderdesk starting");

    let app = App::in_memory(&config);
    for step in walkthrough(&app).await? {
        println!("{}", serde_json::to_string_pretty(&step.to_json())?);
    }

    tracing::info!("walkthrough finished");
    Ok(())
}
