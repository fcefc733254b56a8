mod delivery;
mod subscription;

pub use teloxide;

pub use delivery::TelegramNotificationChannel;
pub use subscription::{SubscribeOutcome, TelegramSubscriptionInterface, subscribe};
