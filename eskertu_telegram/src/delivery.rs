use async_trait::async_trait;
use eskertu_models::subscriber::SubscriberAddress;
use eskertu_scheduler::NotificationChannel;
use teloxide::prelude::*;

pub struct TelegramNotificationChannel {
    bot: Bot,
}

impl TelegramNotificationChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl NotificationChannel for TelegramNotificationChannel {
    async fn send(&self, address: SubscriberAddress, text: &str) -> anyhow::Result<()> {
        self.bot.send_message(ChatId(address), text).await?;
        Ok(())
    }
}
