mod appsettings;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use eskertu_scheduler::{DailySchedule, DailyScheduler, Dispatcher, ReminderPass};
use eskertu_storage::sqlite::{
    self, subscriber_registry::SqliteSubscriberRegistry, tenant_storage::SqliteTenantStorage,
};
use eskertu_telegram::{TelegramNotificationChannel, TelegramSubscriptionInterface, teloxide::Bot};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenvy::dotenv() {
        eprintln!("No .env file loaded: {error}");
    }
    pretty_env_logger::init();

    let settings = appsettings::load().context("Could not load application settings")?;

    // Refuse to start rather than run a scheduler that never fires.
    let schedule = DailySchedule::from_settings(&settings.scheduler)
        .context("Invalid scheduler configuration")?;

    let pool = sqlite::connect(&settings.database.url, settings.database.max_connections)
        .await
        .context("Could not open the database")?;
    let tenants = Arc::new(SqliteTenantStorage::new(pool.clone()));
    let registry = Arc::new(SqliteSubscriberRegistry::new(pool));

    let bot = Bot::new(settings.telegram.token.clone());
    let channel = Arc::new(TelegramNotificationChannel::new(bot.clone()));
    let dispatcher = Dispatcher::from_settings(registry.clone(), channel, &settings.scheduler)
        .context("Invalid delivery configuration")?;
    let pass = Arc::new(ReminderPass::new(tenants, dispatcher));

    let scheduler = DailyScheduler::start(schedule, pass);
    if settings.scheduler.run_on_startup {
        scheduler.trigger_now();
    }

    TelegramSubscriptionInterface::start(bot, registry).await;

    log::info!("Shutting down");
    scheduler.shutdown(SHUTDOWN_TIMEOUT).await;

    Ok(())
}
