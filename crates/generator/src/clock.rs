use chrono::Datelike;

/// Source of the current date for render-time content such as the footer year.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Reads the local wall clock on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        chrono::Local::now().year()
    }
}

/// Always reports the same year; keeps renders reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}
