// src/main.rs

use anyhow::Context;
use askme::{
    api::AskClient,
    app::App,
    chat::ChatController,
    code_snippet::SystemClipboard,
    config::{get_config, initialize_config},
    logging::init_logging,
    ui::run_ui,
};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    initialize_config().context("failed to load configuration")?;
    let config = get_config();

    // Dropping the handle stops the logger.
    let _logger = init_logging(&config.log_level).context("failed to start logging")?;
    log::info!("starting askme against {}", config.endpoint);

    let client = AskClient::from_config(&config).context("invalid endpoint")?;
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let chat = ChatController::from_config(&config, client.clone(), events_tx);
    let app = App::new(chat, Box::new(SystemClipboard::default()));

    run_ui(app, events_rx, client).await?;

    log::info!("askme exited");
    Ok(())
}
