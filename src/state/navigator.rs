//! External navigation
//!
//! The one side effect the engine asks of its environment: open a URL in a
//! new context. Navigation is fire-and-forget; a failed or blocked open is
//! the environment's concern and never touches the session.

use std::sync::Mutex;
use url::Url;
use tracing::info;

/// Opens outbound links on behalf of a widget
pub trait Navigator: Send + Sync {
    fn open_in_new_context(&self, url: &Url);
}

/// Navigator that only records the request in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn open_in_new_context(&self, url: &Url) {
        info!(url = %url, "Open in new context requested");
    }
}

/// Navigator that remembers every requested URL
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<Url>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn open_in_new_context(&self, url: &Url) {
        if let Ok(mut urls) = self.opened.lock() {
            urls.push(url.clone());
        }
    }
}
