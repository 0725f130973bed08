//! Error types and handling for Wanderlust

use thiserror::Error;

use crate::generation::GenerationError;

/// Main error type for the Wanderlust application
#[derive(Error, Debug)]
pub enum WanderlustError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The generation service did not produce an itinerary
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The session already has a generation outstanding
    #[error("A generation is already in progress")]
    GenerationInProgress,

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl WanderlustError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WanderlustError::Config { .. } => {
                "Configuration error. Please check your config file and GEMINI_API_KEY.".to_string()
            }
            WanderlustError::Generation(_) => "Failed to generate content".to_string(),
            WanderlustError::GenerationInProgress => {
                "Please wait for the current itinerary to finish.".to_string()
            }
            WanderlustError::Validation { message } => {
                format!("Invalid input: {message}")
            }
        }
    }
}
