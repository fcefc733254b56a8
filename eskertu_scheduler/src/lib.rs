pub mod delivery;
pub mod dispatcher;
pub mod matcher;
mod reminder_pass;
mod scheduler;

pub use delivery::{DeliveryOutcome, DeliveryStatus, NotificationChannel};
pub use dispatcher::{DEFAULT_DELIVERY_TIMEOUT, DEFAULT_MAX_IN_FLIGHT, DispatchReport, Dispatcher};
pub use matcher::{NoticeKind, ReminderEvent};
pub use reminder_pass::{PassSummary, ReminderPass};
pub use scheduler::{
    Clock, DailyJob, DailySchedule, DailyScheduler, ScheduleConfigError, SchedulerHandle,
    SystemClock,
};

#[cfg(test)]
mod tests;
