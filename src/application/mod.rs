pub mod coordinator;
pub mod detail_table;
pub mod modal;
pub mod ports;
pub mod registry;
pub mod requests;

pub use coordinator::*;
pub use detail_table::*;
pub use modal::*;
pub use ports::*;
pub use registry::*;
pub use requests::*;
