//! Logging and clock seams of the engine.
//!
//! Both are process-wide: [`init_logger`] and [`init_time_provider`] are
//! called once from the wasm start hook. Before that (and in native tests)
//! logging is silent and time comes from the UTC wall clock.

use derive_more::Display;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum LogLevel {
    #[display(fmt = "TRACE")]
    Trace,
    #[display(fmt = "DEBUG")]
    Debug,
    #[display(fmt = " INFO")]
    Info,
    #[display(fmt = " WARN")]
    Warn,
    #[display(fmt = "ERROR")]
    Error,
}

/// Layer and unit a message comes from, printed as `APP:Registry`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LogComponent {
    #[display(fmt = "DOM:{}", _0)]
    Domain(&'static str),
    #[display(fmt = "APP:{}", _0)]
    Application(&'static str),
    #[display(fmt = "INF:{}", _0)]
    Infrastructure(&'static str),
    #[display(fmt = "PRE:{}", _0)]
    Presentation(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: i64,
    pub level: LogLevel,
    pub component: LogComponent,
    /// Widget the message is about, when there is one.
    pub widget_id: Option<String>,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, component: LogComponent, message: &str) -> Self {
        Self {
            timestamp: get_time_provider().now_ms(),
            level,
            component,
            widget_id: None,
            message: message.to_string(),
        }
    }

    pub fn for_widget(mut self, widget_id: &str) -> Self {
        self.widget_id = Some(widget_id.to_string());
        self
    }
}

/// Wall-clock time in epoch milliseconds
pub trait TimeProvider: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub trait Logger: Send + Sync {
    fn log(&self, entry: LogEntry);

    fn trace(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Trace, component, message));
    }

    fn debug(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Debug, component, message));
    }

    fn info(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Info, component, message));
    }

    fn warn(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Warn, component, message));
    }

    fn error(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Error, component, message));
    }

    /// Message tagged with the widget it concerns.
    fn widget(&self, level: LogLevel, component: LogComponent, widget_id: &str, message: &str) {
        self.log(LogEntry::new(level, component, message).for_widget(widget_id));
    }
}

static LOGGER: OnceLock<Box<dyn Logger>> = OnceLock::new();
static TIME_PROVIDER: OnceLock<Box<dyn TimeProvider>> = OnceLock::new();

/// Installs the process logger; later calls are ignored.
pub fn init_logger(logger: Box<dyn Logger>) {
    let _ = LOGGER.set(logger);
}

pub fn init_time_provider(time_provider: Box<dyn TimeProvider>) {
    let _ = TIME_PROVIDER.set(time_provider);
}

pub fn get_logger() -> &'static dyn Logger {
    LOGGER.get().map(|logger| logger.as_ref()).unwrap_or(&SilentLogger)
}

pub fn get_time_provider() -> &'static dyn TimeProvider {
    TIME_PROVIDER.get().map(|provider| provider.as_ref()).unwrap_or(&UtcFallback)
}

struct SilentLogger;

impl Logger for SilentLogger {
    fn log(&self, _entry: LogEntry) {}
}

struct UtcFallback;

impl TimeProvider for UtcFallback {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Trace line compiled out of release builds.
#[macro_export]
macro_rules! log_trace {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::domain::logging::Logger::trace($crate::domain::logging::get_logger(), $component, &format!($($arg)*));
        }
    };
}

/// Debug line compiled out of release builds.
#[macro_export]
macro_rules! log_debug {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::domain::logging::Logger::debug($crate::domain::logging::get_logger(), $component, &format!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::Info.to_string(), " INFO");
    }

    #[test]
    fn widget_entries_carry_their_id() {
        let entry = LogEntry::new(LogLevel::Info, LogComponent::Application("Registry"), "rendered")
            .for_widget("kpi-tvl");
        assert_eq!(entry.widget_id.as_deref(), Some("kpi-tvl"));
        assert_eq!(entry.component.to_string(), "APP:Registry");
    }
}
