//! Homework watcher configuration
use std::{path::PathBuf, time::Duration};

use clap::Parser;
use url::Url;

/// Default review API endpoint.
pub const DEFAULT_REVIEW_URL: &str = "https://praktikum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Review service configuration options
#[derive(Debug, Clone, Parser)]
pub struct ReviewOpts {
    /// OAuth token for the review API
    #[clap(long, env = "PRAKTIKUM_TOKEN", hide_env_values = true)]
    pub review_token: String,
    /// Review API endpoint returning homework statuses
    #[clap(long = "review-url", env = "REVIEW_API_URL", default_value = DEFAULT_REVIEW_URL)]
    pub url: Url,
}

/// Telegram delivery configuration options
#[derive(Debug, Clone, Parser)]
pub struct TelegramOpts {
    /// Telegram bot token
    #[clap(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: String,
    /// Chat receiving the notifications
    #[clap(long = "telegram-chat-id", env = "TELEGRAM_CHAT_ID")]
    pub chat_id: String,
    /// Telegram Bot API base URL
    #[clap(long = "telegram-api-url", env = "TELEGRAM_API_URL", default_value = DEFAULT_TELEGRAM_API_URL)]
    pub api_url: Url,
}

/// Polling schedule and backoff options
#[derive(Debug, Clone, Parser)]
pub struct ScheduleOpts {
    /// Seconds between successful polls
    #[clap(long, env = "POLL_INTERVAL_SECS", default_value = "300")]
    pub poll_interval_secs: u64,
    /// Seconds to wait after a failed iteration
    #[clap(long, env = "ERROR_BACKOFF_SECS", default_value = "5")]
    pub error_backoff_secs: u64,
    /// Seconds to cool down once the consecutive error threshold is reached
    #[clap(long, env = "COOLDOWN_SECS", default_value = "600")]
    pub cooldown_secs: u64,
    /// Consecutive failed iterations that trigger the cooldown
    #[clap(long, env = "MAX_CONSECUTIVE_ERRORS", default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_consecutive_errors: u32,
    /// Timeout in seconds for each HTTP request
    #[clap(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,
}

impl ScheduleOpts {
    /// Interval between successful polls.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Short backoff after a failed iteration.
    pub const fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    /// Long cooldown after a failure streak.
    pub const fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Per-request HTTP timeout.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Log output options
#[derive(Debug, Clone, Parser)]
pub struct LogOpts {
    /// Directory for the rotating log files
    #[clap(long, env = "LOG_DIR", default_value = ".")]
    pub log_dir: PathBuf,
    /// Number of rotated log files to keep
    #[clap(long, env = "LOG_MAX_FILES", default_value = "5")]
    pub log_max_files: usize,
}

/// CLI options for the homework bot
#[derive(Debug, Clone, Parser)]
#[clap(version, about = "Polls the homework review service and reports status changes to Telegram")]
pub struct Opts {
    /// Review service configuration
    #[clap(flatten)]
    pub review: ReviewOpts,

    /// Telegram delivery configuration
    #[clap(flatten)]
    pub telegram: TelegramOpts,

    /// Polling schedule configuration
    #[clap(flatten)]
    pub schedule: ScheduleOpts,

    /// Logging configuration
    #[clap(flatten)]
    pub log: LogOpts,
}
