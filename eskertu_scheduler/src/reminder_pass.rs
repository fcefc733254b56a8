use std::sync::Arc;

use async_trait::async_trait;
use eskertu_models::chrono::NaiveDate;
use eskertu_storage::TenantStorage;

use crate::{
    dispatcher::{DispatchReport, Dispatcher},
    matcher::match_tenants,
    scheduler::DailyJob,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub date: NaiveDate,
    pub tenants_read: usize,
    pub read_errors: usize,
    pub reports: Vec<DispatchReport>,
}

impl PassSummary {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            tenants_read: 0,
            read_errors: 0,
            reports: Vec::new(),
        }
    }

    pub fn delivered(&self) -> usize {
        self.reports.iter().map(DispatchReport::delivered).sum()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().map(DispatchReport::failed).sum()
    }
}

/// One classify-then-dispatch cycle over the whole tenant store.
pub struct ReminderPass {
    tenants: Arc<dyn TenantStorage>,
    dispatcher: Dispatcher,
}

impl ReminderPass {
    pub fn new(tenants: Arc<dyn TenantStorage>, dispatcher: Dispatcher) -> Self {
        Self {
            tenants,
            dispatcher,
        }
    }

    pub async fn execute(&self, today: NaiveDate) -> PassSummary {
        log::info!("[PASS] Checking payment dates for {today}");

        let listing = match self.tenants.get_all().await {
            Ok(listing) => listing,
            Err(error) => {
                log::error!("[PASS] Could not read tenants: {error}");
                return PassSummary::empty(today);
            }
        };

        for error in &listing.errors {
            log::warn!("[PASS] Skipping tenant: {error}");
        }

        let tenants_read = listing.tenants.len();
        let read_errors = listing.errors.len();
        let events = match_tenants(today, listing.tenants);

        let mut reports = Vec::with_capacity(events.len());
        for event in &events {
            reports.push(self.dispatcher.dispatch(event).await);
        }

        let summary = PassSummary {
            date: today,
            tenants_read,
            read_errors,
            reports,
        };

        log::info!(
            "[PASS] {today}: {} tenants, {} unreadable, {} notices, {} delivered, {} failed",
            summary.tenants_read,
            summary.read_errors,
            summary.reports.len(),
            summary.delivered(),
            summary.failed()
        );

        summary
    }
}

#[async_trait]
impl DailyJob for ReminderPass {
    async fn run(&self, today: NaiveDate) {
        self.execute(today).await;
    }
}
