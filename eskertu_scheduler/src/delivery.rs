use async_trait::async_trait;
use eskertu_models::subscriber::SubscriberAddress;

/// Remote, unreliable "deliver text to address" primitive.
#[async_trait]
pub trait NotificationChannel: Send + Sync + 'static {
    async fn send(&self, address: SubscriberAddress, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Failed { detail: String },
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub address: SubscriberAddress,
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered)
    }
}
