use std::{sync::Arc, time::Duration};

use eskertu_models::{chrono::NaiveDate, tenant::NewTenant};
use eskertu_storage::{
    InMemoryTenantStorage, TenantStorage,
    sqlite::{self, sqlx, tenant_storage::SqliteTenantStorage},
};

use super::test_utils::*;
use crate::{Dispatcher, NoticeKind, ReminderPass};

struct PassContext {
    channel: TestNotificationChannel,
    pass: ReminderPass,
}

async fn context(tenants: Arc<dyn TenantStorage>, channel: TestNotificationChannel) -> PassContext {
    let registry = registry_with([100, 200, 300]).await;
    let dispatcher = Dispatcher::new(registry, Arc::new(channel.clone()), Duration::from_secs(5));

    PassContext {
        channel,
        pass: ReminderPass::new(tenants, dispatcher),
    }
}

async fn store_with_tenant_due(due: NaiveDate) -> Arc<InMemoryTenantStorage> {
    let storage = Arc::new(InMemoryTenantStorage::new());
    storage
        .insert(NewTenant::new("Aigerim", "12B", due).unwrap())
        .await
        .unwrap();
    storage
}

#[tokio::test]
async fn three_days_before_due_date_sends_three_day_notice_to_everyone() {
    let tenants = store_with_tenant_due(date(2024, 3, 10)).await;
    let ctx = context(tenants, TestNotificationChannel::new()).await;

    let summary = ctx.pass.execute(date(2024, 3, 7)).await;

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].kind, NoticeKind::ThreeDayNotice);
    assert_eq!(summary.delivered(), 3);

    let sent = ctx.channel.sent();
    let mut addresses: Vec<_> = sent.iter().map(|(address, _)| *address).collect();
    addresses.sort();
    assert_eq!(addresses, vec![100, 200, 300]);
    for (_, text) in &sent {
        assert!(text.contains("Aigerim"));
        assert!(text.contains("12B"));
        assert!(text.contains("2024-03-10"));
    }
}

#[tokio::test]
async fn day_before_due_date_sends_one_day_notice() {
    let tenants = store_with_tenant_due(date(2024, 3, 10)).await;
    let ctx = context(tenants, TestNotificationChannel::new()).await;

    let summary = ctx.pass.execute(date(2024, 3, 9)).await;

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].kind, NoticeKind::OneDayNotice);
    assert!(ctx.channel.sent().iter().all(|(_, text)| text.contains("tomorrow")));
}

#[tokio::test]
async fn other_days_send_nothing() {
    let tenants = store_with_tenant_due(date(2024, 3, 10)).await;
    let ctx = context(tenants, TestNotificationChannel::new()).await;

    for today in [date(2024, 3, 8), date(2024, 3, 10), date(2024, 3, 1), date(2024, 3, 6)] {
        let summary = ctx.pass.execute(today).await;
        assert!(summary.reports.is_empty(), "today = {today}");
    }
    assert!(ctx.channel.sent().is_empty());
}

#[tokio::test]
async fn failed_deliveries_are_counted_and_pass_completes() {
    let tenants = store_with_tenant_due(date(2024, 3, 10)).await;
    let channel = TestNotificationChannel::new().failing_for([200]);
    let ctx = context(tenants, channel).await;

    let summary = ctx.pass.execute(date(2024, 3, 7)).await;

    assert_eq!(summary.delivered(), 2);
    assert_eq!(summary.failed(), 1);
}

#[tokio::test]
async fn unparsable_row_is_skipped_and_the_rest_are_dispatched() {
    let pool = sqlite::connect_in_memory().await.unwrap();
    let storage = Arc::new(SqliteTenantStorage::new(pool.clone()));
    for n in 1..=9 {
        storage
            .insert(NewTenant::new(format!("Tenant {n}"), format!("{n}"), date(2024, 3, 10)).unwrap())
            .await
            .unwrap();
    }
    sqlx::query("INSERT INTO tenants (name, apartment, payment_date) VALUES ('Broken', '10', '2024-13-45')")
        .execute(&pool)
        .await
        .unwrap();
    let ctx = context(storage, TestNotificationChannel::new()).await;

    let summary = ctx.pass.execute(date(2024, 3, 7)).await;

    assert_eq!(summary.tenants_read, 9);
    assert_eq!(summary.read_errors, 1);
    assert_eq!(summary.reports.len(), 9);
    assert_eq!(ctx.channel.sent().len(), 27);
}

#[tokio::test]
async fn unreadable_tenant_store_yields_empty_summary() {
    let ctx = context(Arc::new(UnavailableTenantStorage), TestNotificationChannel::new()).await;

    let summary = ctx.pass.execute(date(2024, 3, 7)).await;

    assert_eq!(summary.tenants_read, 0);
    assert!(summary.reports.is_empty());
    assert!(ctx.channel.sent().is_empty());
}
