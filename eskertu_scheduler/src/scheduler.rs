use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use eskertu_models::{
    chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc},
    chrono_tz::Tz,
    settings::SchedulerSettings,
};
use thiserror::Error;
use tokio::{
    sync::Mutex,
    task::{self, JoinHandle},
};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum ScheduleConfigError {
    #[error("Invalid trigger time {value:?}, expected HH:MM")]
    InvalidTime {
        value: String,
        #[source]
        source: eskertu_models::chrono::ParseError,
    },

    #[error("Unknown timezone {value:?}: {detail}")]
    InvalidTimezone { value: String, detail: String },

    #[error("Delivery timeout must be at least one second")]
    ZeroDeliveryTimeout,

    #[error("At least one concurrent delivery must be allowed")]
    ZeroConcurrentDeliveries,
}

/// Work performed once per calendar day.
#[async_trait]
pub trait DailyJob: Send + Sync + 'static {
    async fn run(&self, today: NaiveDate);
}

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed local wall-clock time, once per day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySchedule {
    fire_at: NaiveTime,
    timezone: Tz,
}

impl DailySchedule {
    pub fn new(fire_at: NaiveTime, timezone: Tz) -> Self {
        let fire_at = fire_at.with_nanosecond(0).unwrap_or(fire_at);
        Self { fire_at, timezone }
    }

    pub fn parse(fire_at: &str, timezone: &str) -> Result<Self, ScheduleConfigError> {
        let fire_at = NaiveTime::parse_from_str(fire_at.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(fire_at.trim(), "%H:%M:%S"))
            .map_err(|source| ScheduleConfigError::InvalidTime {
                value: fire_at.to_string(),
                source,
            })?;

        let timezone = timezone
            .trim()
            .parse::<Tz>()
            .map_err(|error| ScheduleConfigError::InvalidTimezone {
                value: timezone.to_string(),
                detail: error.to_string(),
            })?;

        Ok(Self::new(fire_at, timezone))
    }

    pub fn from_settings(settings: &SchedulerSettings) -> Result<Self, ScheduleConfigError> {
        Self::parse(&settings.fire_at, &settings.timezone)
    }

    pub fn fire_at(&self) -> NaiveTime {
        self.fire_at
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Calendar date of `now` in the schedule's timezone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }

    /// First trigger instant strictly after `after`.
    pub fn next_run_after(&self, after: DateTime<Utc>) -> Option<DateTime<Tz>> {
        let mut date = self.today(after);
        loop {
            if let Some(trigger) = self.trigger_on(date) {
                if trigger.with_timezone(&Utc) > after {
                    return Some(trigger);
                }
            }
            date = date.succ_opt()?;
        }
    }

    fn trigger_on(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        let local = date.and_time(self.fire_at);
        // Ambiguous times take the earliest instant; times inside a DST gap move forward an hour.
        self.timezone.from_local_datetime(&local).earliest().or_else(|| {
            self.timezone
                .from_local_datetime(&(local + TimeDelta::hours(1)))
                .earliest()
        })
    }
}

#[derive(Clone)]
struct PassRunner {
    job: Arc<dyn DailyJob>,
    in_flight: Arc<Mutex<()>>,
}

impl PassRunner {
    /// Starts the job unless a previous run is still going. Dropped triggers are not queued.
    fn try_start(&self, today: NaiveDate) -> Option<JoinHandle<()>> {
        let Ok(guard) = Arc::clone(&self.in_flight).try_lock_owned() else {
            log::warn!("[SCHEDULE] Previous reminder pass is still running, dropping trigger for {today}");
            return None;
        };

        let job = Arc::clone(&self.job);
        Some(task::spawn(async move {
            job.run(today).await;
            drop(guard);
        }))
    }
}

pub struct SchedulerHandle {
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
    runner: PassRunner,
    schedule: DailySchedule,
    clock: Arc<dyn Clock>,
}

impl SchedulerHandle {
    /// Runs the job now for the current local date. Returns `false` if a run is in flight.
    pub fn trigger_now(&self) -> bool {
        let today = self.schedule.today(self.clock.now());
        log::info!("[SCHEDULE] Manual trigger for {today}");
        self.runner.try_start(today).is_some()
    }

    /// Stops the timer and waits, up to `timeout`, for a running pass to finish.
    pub async fn shutdown(self, timeout: Duration) {
        self.cancellation_token.cancel();
        let in_flight = self.runner.in_flight;
        let task_handle = self.task_handle;
        let finished = tokio::time::timeout(timeout, async move {
            let _ = task_handle.await;
            let _ = in_flight.lock().await;
        })
        .await;

        if finished.is_err() {
            log::warn!("[SCHEDULE] Reminder pass did not finish within {timeout:?}");
        }
    }
}

pub struct DailyScheduler;

impl DailyScheduler {
    pub fn start(schedule: DailySchedule, job: Arc<dyn DailyJob>) -> SchedulerHandle {
        Self::start_with_clock(schedule, job, Arc::new(SystemClock))
    }

    pub fn start_with_clock(
        schedule: DailySchedule,
        job: Arc<dyn DailyJob>,
        clock: Arc<dyn Clock>,
    ) -> SchedulerHandle {
        let cancellation_token = CancellationToken::new();
        let runner = PassRunner {
            job,
            in_flight: Arc::new(Mutex::new(())),
        };

        let task_handle = task::spawn(run_schedule(
            schedule,
            runner.clone(),
            Arc::clone(&clock),
            cancellation_token.child_token(),
        ));

        log::info!(
            "Reminder pass scheduled daily at {} ({})",
            schedule.fire_at,
            schedule.timezone
        );

        SchedulerHandle {
            task_handle,
            cancellation_token,
            runner,
            schedule,
            clock,
        }
    }
}

async fn run_schedule(
    schedule: DailySchedule,
    runner: PassRunner,
    clock: Arc<dyn Clock>,
    cancellation_token: CancellationToken,
) {
    let mut previous: Option<DateTime<Utc>> = None;
    loop {
        let now = clock.now();
        // Never fire twice for the same nominal trigger, even if the clock reads earlier than it.
        let after = previous.map_or(now, |previous| previous.max(now));
        let Some(next) = schedule.next_run_after(after) else {
            log::error!("[SCHEDULE] No further trigger time can be computed, stopping");
            break;
        };

        let delay = get_target_delay(next.with_timezone(&Utc), now);
        log::info!("[SCHEDULE] Next reminder pass at {next}, sleeping for {delay:?}");

        tokio::select! {
            _ = cancellation_token.cancelled() => {
                log::info!("[SCHEDULE] Scheduler shutting down");
                break;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        let nominal = next.with_timezone(&Utc);
        let woke_at = clock.now();
        match schedule.next_run_after(nominal) {
            Some(following) if woke_at >= following.with_timezone(&Utc) => {
                log::warn!(
                    "[SCHEDULE] Woke at {woke_at}, past the following trigger {following}; skipping stale pass for {}",
                    next.date_naive()
                );
            }
            // The nominal date, so a late wake-up still checks the intended day.
            _ => {
                runner.try_start(next.date_naive());
            }
        }
        previous = Some(nominal);
    }
}

pub(crate) fn get_target_delay(target: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (target - now).to_std().unwrap_or(Duration::ZERO)
}
