//! Single-flight AI template generation.
//!
//! Generation is one long request to `createTemplateEntryTable`. The task
//! refuses a second start while one is running and keeps the last result
//! or error for display.

#[cfg(test)]
#[path = "template_create_test.rs"]
mod template_create_test;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::api::templates::TemplateCreateRequest;
use crate::error::ApiError;

/// Template name used when neither a template name nor a title is given.
pub const DEFAULT_TEMPLATE_NAME: &str = "AI generated template";

/// Error recorded when a failure carries no message of its own.
pub const GENERATION_FAILED_MESSAGE: &str = "generation failed";

/// Caller-supplied inputs; blank strings count as absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateCreateParams {
    pub title_name: String,
    pub writing_requirement: String,
    pub user_id: String,
    pub template_name: Option<String>,
    pub model_id: Option<i64>,
    pub example_output: Option<String>,
}

impl TemplateCreateParams {
    #[must_use]
    pub fn to_request(&self) -> TemplateCreateRequest {
        let template_name = non_blank(self.template_name.as_deref())
            .or_else(|| non_blank(Some(&self.title_name)))
            .unwrap_or(DEFAULT_TEMPLATE_NAME)
            .to_owned();
        TemplateCreateRequest {
            title_name: self.title_name.clone(),
            writing_requirement: self.writing_requirement.clone(),
            user_id: self.user_id.clone(),
            template_name,
            model_id: self.model_id,
            example_output: non_blank(self.example_output.as_deref()).map(str::to_owned),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Default)]
struct Outcome {
    data: Option<Value>,
    error: Option<String>,
}

#[derive(Debug, Default)]
pub struct TemplateCreateTask {
    running: AtomicBool,
    outcome: Mutex<Outcome>,
}

/// Clears the running flag however the call exits.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl TemplateCreateTask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Template produced by the last successful run.
    #[must_use]
    pub fn data(&self) -> Option<Value> {
        self.outcome().data.clone()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.outcome().error.clone()
    }

    /// Generate a template and return its tree. Returns `Ok(None)` without
    /// sending anything if a run is already in progress, or when the backend
    /// answers with null data.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn start(&self, client: &ApiClient, params: &TemplateCreateParams) -> Result<Option<Value>, ApiError> {
        if self.running.swap(true, Ordering::SeqCst) {
            info!("template generation already running");
            return Ok(None);
        }
        let _running = RunningGuard(&self.running);
        *self.outcome() = Outcome::default();

        let request = params.to_request();
        match client.templates().create_entry_table(&request).await {
            Ok(response) => {
                let data = Some(response).filter(|d| !d.is_null());
                self.outcome().data.clone_from(&data);
                Ok(data)
            }
            Err(e) => {
                let message = e.to_string();
                let message = if message.trim().is_empty() { GENERATION_FAILED_MESSAGE.to_owned() } else { message };
                warn!(error = %message, "template generation failed");
                self.outcome().error = Some(message);
                Err(e)
            }
        }
    }

    fn outcome(&self) -> std::sync::MutexGuard<'_, Outcome> {
        self.outcome.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
