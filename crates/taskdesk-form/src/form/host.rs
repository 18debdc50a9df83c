/*
[INPUT]:  Title and navigation requests from the form
[OUTPUT]: Side effects in whatever shell embeds the form
[POS]:    Form collaborator - document title and navigation seam
[UPDATE]: When the form needs new shell capabilities
*/

use std::sync::{Arc, Mutex};
use tracing::info;

/// Path the form returns to after save or cancel
pub const HOME_PATH: &str = "/";

/// Shell capabilities the form relies on
pub trait FormHost: Send {
    fn set_title(&mut self, title: &str);
    fn navigate(&mut self, path: &str);
}

/// Host for headless use; logs what a UI shell would do
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHost;

impl FormHost for TracingHost {
    fn set_title(&mut self, title: &str) {
        info!(title, "document title set");
    }

    fn navigate(&mut self, path: &str) {
        info!(path, "navigating");
    }
}

#[derive(Debug, Default)]
struct HostLog {
    title: Option<String>,
    visited: Vec<String>,
}

/// Host that records titles and navigations; clones share one log
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    log: Arc<Mutex<HostLog>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<String> {
        self.with_log(|log| log.title.clone())
    }

    pub fn visited(&self) -> Vec<String> {
        self.with_log(|log| log.visited.clone())
    }

    fn with_log<R>(&self, f: impl FnOnce(&mut HostLog) -> R) -> R {
        let mut guard = self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl FormHost for RecordingHost {
    fn set_title(&mut self, title: &str) {
        self.with_log(|log| log.title = Some(title.to_string()));
    }

    fn navigate(&mut self, path: &str) {
        self.with_log(|log| log.visited.push(path.to_string()));
    }
}
