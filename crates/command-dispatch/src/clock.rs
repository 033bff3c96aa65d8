use time::OffsetDateTime;

/// Wall-clock source for the time, date and greeting handlers.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Local time, falling back to UTC when the local offset cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "local offset unavailable, using UTC");
            OffsetDateTime::now_utc()
        })
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
