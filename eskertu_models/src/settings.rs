use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct TelegramSettings {
    pub token: String,
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Raw scheduler settings. Parsed into a daily schedule at startup.
#[derive(Deserialize, Debug, Clone)]
pub struct SchedulerSettings {
    /// Local wall-clock time of the daily pass, `HH:MM`.
    pub fire_at: String,
    /// IANA timezone name, e.g. `Asia/Almaty`.
    pub timezone: String,
    #[serde(default = "default_delivery_timeout_secs")]
    pub delivery_timeout_secs: u64,
    /// Upper bound on deliveries of one notice in flight at once.
    #[serde(default = "default_max_concurrent_deliveries")]
    pub max_concurrent_deliveries: usize,
    #[serde(default)]
    pub run_on_startup: bool,
}

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub telegram: TelegramSettings,
    pub database: DatabaseSettings,
    pub scheduler: SchedulerSettings,
}

fn default_max_connections() -> u32 {
    5
}

fn default_delivery_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_deliveries() -> usize {
    16
}
