use std::sync::Arc;
use std::time::Duration;

use bot_server::core::{AppState, BackgroundTasks, Config, TaskKind};
use bot_server::dispatch;
use bot_server::gateway::TelegramGateway;
use bot_server::scheduler;
use bot_server::store::sheets::ServiceAccountKey;
use bot_server::store::{ComplaintRepository, SheetsStore};
use bot_server::utils::logger;

/// Backoff after a failed getUpdates call.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    logger::init_logger_with_file(config.log_dir.as_deref());
    tracing::info!(environment = %config.environment, "Starting bot server");

    let gateway = Arc::new(TelegramGateway::new(&config.bot_token));
    let key = ServiceAccountKey::from_json(&config.service_account_key()?)?;
    let sheets = Arc::new(SheetsStore::new(key, &config.sheet_id, &config.sheet_name));
    let repo = ComplaintRepository::new(sheets);

    // best effort: a transient sheets outage must not block startup
    if let Err(e) = repo.ensure_schema().await {
        tracing::warn!(error = %e, "Header check failed, continuing with the sheet as is");
    }

    let state = AppState::new(config, gateway.clone(), repo);

    let mut tasks = BackgroundTasks::new();
    let token = tasks.shutdown_token();
    let poll_state = state.clone();
    tasks.spawn("update-poller", TaskKind::Worker, async move {
        let mut offset = 0i64;
        loop {
            let batch = tokio::select! {
                _ = token.cancelled() => return,
                result = gateway.get_updates(offset) => result,
            };
            match batch {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        if let Err(e) = dispatch::handle_update(&poll_state, update).await {
                            tracing::error!(error = %e, "Update handling failed");
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "getUpdates failed");
                    tokio::select! {
                        _ = token.cancelled() => return,
                        _ = tokio::time::sleep(POLL_ERROR_BACKOFF) => {}
                    }
                }
            }
        }
    });

    scheduler::register(state, &mut tasks);
    tasks.log_summary();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    tasks.shutdown().await;
    Ok(())
}
