/// Delivery address of a subscriber. For the Telegram channel this is the chat id.
pub type SubscriberAddress = i64;
