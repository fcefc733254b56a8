use std::{sync::Arc, time::Duration};

use eskertu_models::{
    settings::SchedulerSettings,
    subscriber::SubscriberAddress,
    tenant::{DUE_DATE_FORMAT, Tenant, TenantId},
};
use eskertu_storage::SubscriberRegistry;
use futures::{StreamExt, stream};

use crate::{
    ScheduleConfigError,
    delivery::{DeliveryOutcome, DeliveryStatus, NotificationChannel},
    matcher::{NoticeKind, ReminderEvent},
};

pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Outcomes of fanning a single [`ReminderEvent`] out to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub tenant_id: TenantId,
    pub kind: NoticeKind,
    pub outcomes: Vec<DeliveryOutcome>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

pub fn render(tenant: &Tenant, kind: NoticeKind) -> String {
    let due_date = tenant.due_date.format(DUE_DATE_FORMAT);
    match kind {
        NoticeKind::ThreeDayNotice => format!(
            "Hi, {}! Rent for apartment {} is due in 3 days ({}).",
            tenant.name, tenant.apartment, due_date
        ),
        NoticeKind::OneDayNotice => format!(
            "Hi, {}! Rent for apartment {} is due tomorrow ({}).",
            tenant.name, tenant.apartment, due_date
        ),
    }
}

pub struct Dispatcher {
    registry: Arc<dyn SubscriberRegistry>,
    channel: Arc<dyn NotificationChannel>,
    delivery_timeout: Duration,
    max_in_flight: usize,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<dyn SubscriberRegistry>,
        channel: Arc<dyn NotificationChannel>,
        delivery_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            channel,
            delivery_timeout,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Builds a dispatcher from settings, rejecting a zero timeout or a zero concurrency limit.
    pub fn from_settings(
        registry: Arc<dyn SubscriberRegistry>,
        channel: Arc<dyn NotificationChannel>,
        settings: &SchedulerSettings,
    ) -> Result<Self, ScheduleConfigError> {
        if settings.delivery_timeout_secs == 0 {
            return Err(ScheduleConfigError::ZeroDeliveryTimeout);
        }
        if settings.max_concurrent_deliveries == 0 {
            return Err(ScheduleConfigError::ZeroConcurrentDeliveries);
        }

        Ok(Self::new(
            registry,
            channel,
            Duration::from_secs(settings.delivery_timeout_secs),
        )
        .with_max_in_flight(settings.max_concurrent_deliveries))
    }

    /// Caps how many deliveries of one event are in flight at once.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Sends the rendered notice to every registered address and waits for all attempts.
    ///
    /// A failing or hanging address never prevents delivery to the others.
    pub async fn dispatch(&self, event: &ReminderEvent) -> DispatchReport {
        let text = render(&event.tenant, event.kind);

        let addresses = match self.registry.list_all().await {
            Ok(addresses) => addresses,
            Err(error) => {
                log::error!(
                    "Could not read subscribers for tenant {}: {error}",
                    event.tenant.id
                );
                Vec::new()
            }
        };

        let outcomes: Vec<DeliveryOutcome> = stream::iter(addresses)
            .map(|address| self.deliver(address, &text))
            .buffered(self.max_in_flight)
            .collect()
            .await;

        let report = DispatchReport {
            tenant_id: event.tenant.id,
            kind: event.kind,
            outcomes,
        };

        log::info!(
            "[DISPATCH] tenant {} {:?}: {} delivered, {} failed",
            report.tenant_id,
            report.kind,
            report.delivered(),
            report.failed()
        );

        report
    }

    async fn deliver(&self, address: SubscriberAddress, text: &str) -> DeliveryOutcome {
        let status =
            match tokio::time::timeout(self.delivery_timeout, self.channel.send(address, text)).await
            {
                Ok(Ok(())) => DeliveryStatus::Delivered,
                Ok(Err(error)) => {
                    log::warn!("Delivery to {address} failed: {error:#}");
                    DeliveryStatus::Failed {
                        detail: format!("{error:#}"),
                    }
                }
                Err(_) => {
                    log::warn!(
                        "Delivery to {address} timed out after {:?}",
                        self.delivery_timeout
                    );
                    DeliveryStatus::TimedOut
                }
            };

        DeliveryOutcome { address, status }
    }
}
