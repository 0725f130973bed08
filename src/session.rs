//! Form session state
//!
//! Holds what the page holds: the form fields, the generate trigger and the
//! last output. Only one generation may be outstanding per session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{error, info};

use crate::WanderlustError;
use crate::generation::GenerationClient;
use crate::models::{Month, POPULAR_DESTINATIONS, TripParameters};
use crate::prompt::build_prompt;
use crate::sanitize::clean_output;

/// Editable form fields, starting from the page defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripForm {
    fields: TripParameters,
}

impl TripForm {
    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.fields.destination = destination.into();
    }

    pub fn set_duration(&mut self, duration: impl Into<String>) {
        self.fields.duration = duration.into();
    }

    pub fn set_month(&mut self, month: Month) {
        self.fields.month = month;
    }

    pub fn set_include_hotels(&mut self, include: bool) {
        self.fields.include_hotels = include;
    }

    pub fn set_include_restaurants(&mut self, include: bool) {
        self.fields.include_restaurants = include;
    }

    /// Quick-pick button; returns false for names that are not offered
    pub fn select_popular(&mut self, name: &str) -> bool {
        match POPULAR_DESTINATIONS.iter().find(|popular| popular.eq_ignore_ascii_case(name)) {
            Some(popular) => {
                self.fields.destination = (*popular).to_string();
                true
            }
            None => false,
        }
    }

    /// Snapshot of the current fields
    #[must_use]
    pub fn parameters(&self) -> TripParameters {
        self.fields.clone()
    }
}

impl From<TripParameters> for TripForm {
    fn from(fields: TripParameters) -> Self {
        Self { fields }
    }
}

/// The generate button: disabled while a generation is pending
#[derive(Debug, Default)]
pub struct GenerationTrigger {
    generating: AtomicBool,
    loading: AtomicBool,
}

/// Re-enables the trigger when dropped, whatever the outcome
#[derive(Debug)]
pub struct TriggerGuard<'a> {
    trigger: &'a GenerationTrigger,
}

impl GenerationTrigger {
    /// Claim the trigger, or `None` if a generation is already running
    pub fn begin(&self) -> Option<TriggerGuard<'_>> {
        self.generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.loading.store(true, Ordering::Release);
        Some(TriggerGuard { trigger: self })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.generating.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }
}

impl Drop for TriggerGuard<'_> {
    fn drop(&mut self) {
        self.trigger.loading.store(false, Ordering::Release);
        self.trigger.generating.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
struct Outputs {
    raw: String,
    cleaned: String,
}

/// One browser-like session
#[derive(Debug, Default)]
pub struct FormSession {
    pub form: TripForm,
    trigger: GenerationTrigger,
    outputs: Mutex<Outputs>,
}

impl FormSession {
    #[must_use]
    pub fn new(form: TripForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn trigger(&self) -> &GenerationTrigger {
        &self.trigger
    }

    /// Last raw reply
    #[must_use]
    pub fn raw_output(&self) -> String {
        self.outputs.lock().unwrap_or_else(PoisonError::into_inner).raw.clone()
    }

    /// Last reply after cleanup
    #[must_use]
    pub fn cleaned_output(&self) -> String {
        self.outputs.lock().unwrap_or_else(PoisonError::into_inner).cleaned.clone()
    }

    /// Run one generation for the current form fields.
    ///
    /// On failure the previous output is kept and the error is logged; the
    /// trigger is released in every case.
    pub async fn generate(&self, client: &dyn GenerationClient) -> Result<String, WanderlustError> {
        let Some(_guard) = self.trigger.begin() else {
            return Err(WanderlustError::GenerationInProgress);
        };

        let prompt = build_prompt(&self.form.parameters());
        info!("Calling the generation service");

        match client.generate(&prompt).await {
            Ok(raw) => {
                let cleaned = clean_output(&raw);
                let mut outputs = self.outputs.lock().unwrap_or_else(PoisonError::into_inner);
                outputs.raw = raw;
                outputs.cleaned = cleaned.clone();
                Ok(cleaned)
            }
            Err(e) => {
                error!("Error generating content: {}", e);
                Err(e.into())
            }
        }
    }
}
