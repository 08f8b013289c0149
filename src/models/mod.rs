pub mod appointment;
pub mod enums;
pub mod patient;
pub mod staff;
pub mod visit;

pub use appointment::*;
pub use patient::*;
pub use staff::*;
pub use visit::*;

/// Primary keys are whatever the store hands back (integer or uuid text).
pub type RecordId = serde_json::Value;
