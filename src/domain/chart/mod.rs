//! Chart aggregate: the typed option, its value objects, focus windowing
//! and the payload → option builders.

pub mod builder;
pub mod option;
pub mod value_objects;
pub mod windowing;

pub use builder::{BuildContext, Transform, WidgetProfile, build_chart_option};
pub use option::ChartOption;
pub use value_objects::*;
pub use windowing::compute_focused_window;
