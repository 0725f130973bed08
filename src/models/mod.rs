//! Data models for Wanderlust
//!
//! - Trip: the parameters collected by the form
//! - Month: the thirteen month choices
//! - Catalog: the destination list and quick picks

pub mod catalog;
pub mod month;
pub mod trip;

pub use catalog::{COUNTRIES, POPULAR_DESTINATIONS};
pub use month::Month;
pub use trip::TripParameters;
