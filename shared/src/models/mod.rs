//! Data models
//!
//! Shared between the desk core and any front-end embedding it.
//! All monetary amounts are integer yen; all IDs are strings.

pub mod attendance;
pub mod menu_item;
pub mod settings;
pub mod staff;
pub mod ticket;

// Re-exports
pub use attendance::*;
pub use menu_item::*;
pub use settings::*;
pub use staff::*;
pub use ticket::*;
