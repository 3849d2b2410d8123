use chrono_tz::Tz;

use crate::utils::{AppError, AppResult};

/// Bot server configuration.
///
/// # Environment variables
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | BOT_TOKEN | required | Telegram bot token |
/// | GROUP_COMPLAINTS_ID | required | intake group chat id |
/// | GROUP_SOLUTIONS_ID | required | resolution group chat id |
/// | GROUP_LEADERS_ID | required | leadership group chat id |
/// | GOOGLE_SHEET_ID | required | spreadsheet id |
/// | SHEET_NAME | Sheet1 | worksheet holding the records |
/// | SERVICE_ACCOUNT_FILE | service_account.json | key file path |
/// | SERVICE_ACCOUNT_JSON | - | inline key, overrides the file |
/// | TIMEZONE | Asia/Tashkent | business timezone |
/// | INSTRUCTION_FILE | instruction.pdf | usage guide sent on /instruction |
/// | LOG_DIR | - | when set, daily file logging |
/// | ENVIRONMENT | development | development \| production |
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Intake group: receives new complaints, confirms the parent call
    pub group_complaints_id: i64,
    /// Resolution group: authors resolutions, notifies the parent
    pub group_solutions_id: i64,
    /// Leadership group: read-only relay of every step
    pub group_leaders_id: i64,
    /// Spreadsheet id of the record store
    pub sheet_id: String,
    /// Worksheet name inside the spreadsheet
    pub sheet_name: String,
    /// Path to the service-account key file
    pub service_account_file: String,
    /// Inline service-account key JSON, takes precedence over the file
    pub service_account_json: Option<String>,
    /// Business timezone; all timestamps and fire times use it
    pub timezone: Tz,
    /// Usage-guide document sent on request
    pub instruction_file: String,
    /// When set, logs additionally go to daily files under this directory
    pub log_dir: Option<String>,
    /// development | production
    pub environment: String,
}

fn required(name: &str) -> AppResult<String> {
    std::env::var(name)
        .map_err(|_| AppError::internal(format!("missing required env var {name}")))
}

fn required_id(name: &str) -> AppResult<i64> {
    required(name)?
        .trim()
        .parse()
        .map_err(|_| AppError::internal(format!("{name} must be a chat id (i64)")))
}

impl Config {
    /// Load from environment variables. Group ids and the bot token are
    /// required; everything else has a default.
    pub fn from_env() -> AppResult<Self> {
        let timezone = std::env::var("TIMEZONE")
            .unwrap_or_else(|_| "Asia/Tashkent".into())
            .parse::<Tz>()
            .map_err(|e| AppError::internal(format!("bad TIMEZONE: {e}")))?;

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            group_complaints_id: required_id("GROUP_COMPLAINTS_ID")?,
            group_solutions_id: required_id("GROUP_SOLUTIONS_ID")?,
            group_leaders_id: required_id("GROUP_LEADERS_ID")?,
            sheet_id: required("GOOGLE_SHEET_ID")?,
            sheet_name: std::env::var("SHEET_NAME").unwrap_or_else(|_| "Sheet1".into()),
            service_account_file: std::env::var("SERVICE_ACCOUNT_FILE")
                .unwrap_or_else(|_| "service_account.json".into()),
            service_account_json: std::env::var("SERVICE_ACCOUNT_JSON").ok(),
            timezone,
            instruction_file: std::env::var("INSTRUCTION_FILE")
                .unwrap_or_else(|_| "instruction.pdf".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        })
    }

    /// Fixed values for tests, no environment access.
    pub fn for_tests() -> Self {
        Self {
            bot_token: "test-token".into(),
            group_complaints_id: -1001,
            group_solutions_id: -1002,
            group_leaders_id: -1003,
            sheet_id: "sheet".into(),
            sheet_name: "Sheet1".into(),
            service_account_file: "service_account.json".into(),
            service_account_json: None,
            timezone: chrono_tz::Asia::Tashkent,
            instruction_file: "instruction.pdf".into(),
            log_dir: None,
            environment: "development".into(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Service-account key JSON, inline value first, file second.
    pub fn service_account_key(&self) -> AppResult<String> {
        if let Some(json) = &self.service_account_json {
            return Ok(json.clone());
        }
        std::fs::read_to_string(&self.service_account_file).map_err(|e| {
            AppError::internal(format!(
                "cannot read {}: {e}",
                self.service_account_file
            ))
        })
    }
}
