//! Pure domain layer: payload model, formatting, chart option building.

pub mod chart;
pub mod errors;
pub mod filters;
pub mod formatting;
pub mod logging;
pub mod widget;
