use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};
use std::sync::atomic::{AtomicI64, Ordering};

/// Console logger: browser console on wasm, stderr elsewhere
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Info)
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    fn format_log_entry(&self, entry: &LogEntry) -> String {
        let timestamp = crate::time_utils::format_clock_time(entry.timestamp);
        match &entry.widget_id {
            Some(widget_id) => format!(
                "[{}] {} {} [{}] | {}",
                timestamp, entry.level, entry.component, widget_id, entry.message
            ),
            None => format!("[{}] {} {} | {}", timestamp, entry.level, entry.component, entry.message),
        }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let formatted = self.format_log_entry(&entry);

        #[cfg(target_arch = "wasm32")]
        match entry.level {
            LogLevel::Trace | LogLevel::Debug => gloo::console::debug!(formatted),
            LogLevel::Info => gloo::console::info!(formatted),
            LogLevel::Warn => gloo::console::warn!(formatted),
            LogLevel::Error => gloo::console::error!(formatted),
        }

        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{}", formatted);
    }
}

/// Wall clock backed by `chrono::Utc::now`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeProvider for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Settable clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self { now_ms: AtomicI64::new(now_ms) }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
