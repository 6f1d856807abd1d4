//! Widget registry
//!
//! Hosts serving many conversations at once keep one widget per key (a chat
//! id for the Telegram host). Widgets are created lazily and share the engine.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use chrono::Utc;
use tracing::{debug, info};

use crate::config::ChatConfig;
use crate::utils::errors::{ChatBuddyError, Result};
use super::engine::ConversationEngine;
use super::navigator::Navigator;
use super::widget::ChatWidget;

/// Builds the navigator a new widget should use
pub type NavigatorFactory<K> = Arc<dyn Fn(&K) -> Arc<dyn Navigator> + Send + Sync>;

pub struct SessionRegistry<K> {
    engine: ConversationEngine,
    config: ChatConfig,
    navigator_factory: NavigatorFactory<K>,
    widgets: Mutex<HashMap<K, ChatWidget>>,
}

impl<K> SessionRegistry<K>
where
    K: Eq + Hash + Clone + Display,
{
    pub fn new(engine: ConversationEngine, config: ChatConfig, navigator_factory: NavigatorFactory<K>) -> Self {
        Self {
            engine,
            config,
            navigator_factory,
            widgets: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &ConversationEngine {
        &self.engine
    }

    /// Widget for `key`, creating it on first use
    ///
    /// The flag is true when the widget was created by this call.
    pub fn get_or_create(&self, key: &K) -> (ChatWidget, bool) {
        let mut widgets = self.lock();
        if let Some(widget) = widgets.get(key) {
            return (widget.clone(), false);
        }

        let navigator = (self.navigator_factory)(key);
        let widget = ChatWidget::new(key.to_string(), self.engine.clone(), self.config.clone(), navigator);
        widgets.insert(key.clone(), widget.clone());
        info!(session = %key, "Created chat session");
        (widget, true)
    }

    pub fn get(&self, key: &K) -> Option<ChatWidget> {
        self.lock().get(key).cloned()
    }

    /// Widget for `key`, failing when the conversation was never started
    pub fn require(&self, key: &K) -> Result<ChatWidget> {
        self.get(key)
            .ok_or_else(|| ChatBuddyError::SessionNotFound(key.to_string()))
    }

    pub fn remove(&self, key: &K) -> Option<ChatWidget> {
        let removed = self.lock().remove(key);
        if removed.is_some() {
            debug!(session = %key, "Removed chat session");
        }
        removed
    }

    /// Drop closed widgets with no turn in flight that have been quiet for `idle`
    ///
    /// Returns how many sessions were evicted. Once the last handle to an
    /// evicted widget goes, its event channel closes and subscribers stop.
    pub fn evict_idle(&self, idle: Duration) -> usize {
        let Ok(idle) = chrono::Duration::from_std(idle) else {
            return 0;
        };
        let now = Utc::now();

        let mut widgets = self.lock();
        let before = widgets.len();
        widgets.retain(|key, widget| {
            let expired = widget.is_idle() && now - widget.last_activity() >= idle;
            if expired {
                debug!(session = %key, "Evicting idle chat session");
            }
            !expired
        });
        let evicted = before - widgets.len();

        if evicted > 0 {
            info!(evicted = evicted, remaining = widgets.len(), "Evicted idle chat sessions");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, ChatWidget>> {
        self.widgets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
