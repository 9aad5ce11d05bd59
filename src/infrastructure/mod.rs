//! Browser-facing adapters: HTTP fetch, result cache, storage, logging.

pub mod cache;
pub mod http;
pub mod services;
pub mod storage;

pub use cache::TtlCache;
pub use http::{DataFetcher, GlooFetcher, HttpUtils};
pub use services::{ConsoleLogger, ManualClock, SystemClock};
pub use storage::{FilterStore, LocalStorageFilterStore, MemoryFilterStore};
