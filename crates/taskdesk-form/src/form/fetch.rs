/*
[INPUT]:  Store futures and per-call notification options
[OUTPUT]: Store results, with success/error notices raised on the way
[POS]:    Form collaborator - wraps every network call made by the form
[UPDATE]: When notification policy changes
*/

use std::future::Future;
use std::sync::{Arc, Mutex};
use taskdesk_client::{ApiError, SaveAck, TaskRecord};
use tracing::{error, info};

/// Per-call notification switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub show_success_toast: bool,
    pub show_error_toast: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            show_success_toast: true,
            show_error_toast: true,
        }
    }
}

impl FetchOptions {
    /// Errors are still reported, successes are not
    pub fn quiet_success() -> Self {
        Self {
            show_success_toast: false,
            ..Self::default()
        }
    }
}

/// Receives user-facing outcome notices
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that writes notices to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(notice = %message, "request succeeded");
    }

    fn error(&self, message: &str) {
        error!(notice = %message, "request failed");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Notifier that keeps every notice for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notice);
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Notice::Error(message.to_string()));
    }
}

/// Message a successful response wants shown, if any
pub trait SuccessMessage {
    fn success_message(&self) -> Option<&str>;
}

impl SuccessMessage for SaveAck {
    fn success_message(&self) -> Option<&str> {
        self.msg.as_deref()
    }
}

impl SuccessMessage for TaskRecord {
    fn success_message(&self) -> Option<&str> {
        None
    }
}

/// Runs store calls and raises notices for their outcome
#[derive(Clone)]
pub struct Fetcher {
    notifier: Arc<dyn Notifier>,
}

impl Fetcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Await a store call; errors are reported here and handed back unchanged
    pub async fn run<T, F>(&self, options: FetchOptions, call: F) -> Result<T, ApiError>
    where
        T: SuccessMessage,
        F: Future<Output = Result<T, ApiError>>,
    {
        match call.await {
            Ok(value) => {
                if options.show_success_toast {
                    if let Some(message) = value.success_message() {
                        self.notifier.success(message);
                    }
                }
                Ok(value)
            }
            Err(err) => {
                if options.show_error_toast {
                    self.notifier.error(&err.to_string());
                }
                Err(err)
            }
        }
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(Arc::new(TracingNotifier))
    }
}
