//! Wanderlust - travel itinerary generator
//!
//! Builds an itinerary prompt from the trip the user picked, forwards it to
//! a generative-language API and cleans the reply for display.

pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod metrics;
pub mod models;
pub mod prompt;
pub mod sanitize;
pub mod session;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::WanderlustConfig;
pub use error::WanderlustError;
pub use generation::{EndpointClient, GeminiClient, GenerationClient, GenerationError};
pub use models::{Month, TripParameters};
pub use prompt::build_prompt;
pub use sanitize::{clean_output, render_markup, sanitize};
pub use session::{FormSession, TripForm};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
