//! Entrypoint.

use clap::Parser;
use config::Opts;
use dotenvy::dotenv;
use eyre::WrapErr;
use review::ReviewClient;
use runtime::shutdown::{ShutdownSignal, run_until_shutdown};
use telegram::TelegramNotifier;
use tracing::{error, info};
use watcher::{LoopState, Schedule, Watcher};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try the default .env file, and ignore if it doesn't exist.
        dotenv().ok();
    }

    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            runtime::logging::init_console();
            error!(error = %e, "Invalid configuration");
            e.exit()
        }
    };

    let _log_guard = runtime::logging::init(&opts.log.log_dir, opts.log.log_max_files)?;
    info!("📚 Homework bot starting...");

    let timeout = opts.schedule.request_timeout();
    let review = ReviewClient::new(opts.review.review_token, opts.review.url, timeout)?;
    let telegram = TelegramNotifier::new(
        opts.telegram.telegram_token,
        opts.telegram.chat_id,
        opts.telegram.api_url,
        timeout,
    )?;
    info!(review_url = %review.url(), chat_id = %telegram.chat_id(), "Clients ready");

    let schedule = Schedule {
        poll_interval: opts.schedule.poll_interval(),
        error_backoff: opts.schedule.error_backoff(),
        cooldown: opts.schedule.cooldown(),
        max_consecutive_errors: opts.schedule.max_consecutive_errors,
    };
    let watcher = Watcher::new(review, telegram, schedule);

    let shutdown = ShutdownSignal::new().wrap_err("failed to install signal handlers")?;
    match run_until_shutdown(watcher.run(LoopState::starting_now()), shutdown).await {
        Some(result) => result,
        None => {
            info!("Shutdown signal received, stopping");
            Ok(())
        }
    }
}
