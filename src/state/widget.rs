//! Chat widget
//!
//! Owns one conversation session and drives it on the tokio timer: applies
//! selections through the engine, runs the turn scripts, tracks whether the
//! conversation surface is shown and publishes every change to subscribers.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::ChatConfig;
use crate::dialogue::START_OPTION_ID;
use crate::utils::logging::{
    log_ignored_selection, log_navigation, log_selection, log_session_reset, log_stale_step,
};
use super::engine::{ConversationEngine, Outcome};
use super::events::WidgetEvent;
use super::navigator::Navigator;
use super::script::{run_script, Action, Flow};
use super::session::{ChatSnapshot, SessionState, Visibility};

/// Handle to a chat widget; clones share the same session
#[derive(Clone)]
pub struct ChatWidget {
    inner: Arc<WidgetInner>,
}

struct WidgetInner {
    label: String,
    engine: ConversationEngine,
    config: ChatConfig,
    navigator: Arc<dyn Navigator>,
    events: broadcast::Sender<WidgetEvent>,
    state: Mutex<WidgetState>,
}

struct WidgetState {
    session: SessionState,
    visibility: Visibility,
    unread: bool,
    launcher_visible: bool,
    /// Bumped on every open/close so a stale close timer cannot hide a reopened widget
    visibility_epoch: u64,
}

impl fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatWidget")
            .field("label", &self.inner.label)
            .finish_non_exhaustive()
    }
}

impl ChatWidget {
    /// Create a widget with a fresh session; `label` identifies it in logs
    pub fn new(
        label: impl Into<String>,
        engine: ConversationEngine,
        config: ChatConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        let session = engine.new_session();

        Self {
            inner: Arc::new(WidgetInner {
                label: label.into(),
                engine,
                config,
                navigator,
                events,
                state: Mutex::new(WidgetState {
                    session,
                    visibility: Visibility::Closed,
                    unread: false,
                    launcher_visible: false,
                    visibility_epoch: 0,
                }),
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.inner.events.subscribe()
    }

    /// Current read model
    pub fn snapshot(&self) -> ChatSnapshot {
        let state = self.inner.lock();
        ChatSnapshot {
            stage: state.session.stage().clone(),
            transcript: state.session.transcript().to_vec(),
            typing: state.session.is_typing(),
            options: state.session.visible_options().to_vec(),
            options_visible: state.session.options_visible(),
            visibility: state.visibility,
            open: state.visibility.is_shown(),
            unread: state.unread,
            launcher_visible: state.launcher_visible,
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().visibility.is_shown()
    }

    pub fn has_unread(&self) -> bool {
        self.inner.lock().unread
    }

    /// When the conversation last changed
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.inner.lock().session.updated_at()
    }

    /// Hidden with no turn in flight
    pub fn is_idle(&self) -> bool {
        let state = self.inner.lock();
        state.visibility == Visibility::Closed
            && state.session.options_visible()
            && !state.session.is_typing()
    }

    /// Reveal the launcher once the configured delay has passed
    pub fn mount(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let delay = inner.config.launcher_delay();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = inner.lock();
            if !state.launcher_visible {
                state.launcher_visible = true;
                inner.publish(WidgetEvent::LauncherShown);
            }
        })
    }

    /// Begin the conversation from the cold open
    ///
    /// Ignored once the conversation has started. The returned handle
    /// completes when the turn has settled.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        self.turn(None)
    }

    /// Select one of the currently offered options
    ///
    /// Ids outside the offered set, and any selection while a turn is in
    /// flight, are ignored without touching the session.
    pub fn select_option(&self, option_id: &str) -> Option<JoinHandle<()>> {
        self.turn(Some(option_id))
    }

    /// Discard the conversation and offer the cold open again
    pub fn reset(&self) {
        let inner = &self.inner;
        let mut state = inner.lock();
        let transcript_len = state.session.transcript().len();

        inner.engine.reset(&mut state.session);
        inner.publish(WidgetEvent::Reset);
        inner.publish(WidgetEvent::OptionsRevealed(state.session.visible_options().to_vec()));
        if state.unread {
            state.unread = false;
            inner.publish(WidgetEvent::Unread(false));
        }

        log_session_reset(&inner.label, transcript_len);
    }

    /// Show the conversation surface
    pub fn open(&self) {
        let inner = &self.inner;
        let mut state = inner.lock();
        state.visibility_epoch += 1;
        if state.visibility != Visibility::Open {
            state.visibility = Visibility::Open;
            inner.publish(WidgetEvent::Visibility(Visibility::Open));
        }
        inner.refresh_unread(&mut state);
    }

    /// Hide the conversation surface after the closing animation
    ///
    /// The session is retained; pending turns keep running while hidden.
    pub fn close(&self) -> Option<JoinHandle<()>> {
        let inner = Arc::clone(&self.inner);
        let epoch = {
            let mut state = inner.lock();
            if state.visibility != Visibility::Open {
                return None;
            }
            state.visibility = Visibility::Closing;
            state.visibility_epoch += 1;
            inner.publish(WidgetEvent::Visibility(Visibility::Closing));
            state.visibility_epoch
        };
        let delay = inner.config.close_animation();

        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.finish_close(epoch);
        }))
    }

    /// Open when hidden or closing, close when open
    pub fn toggle_open(&self) -> Option<JoinHandle<()>> {
        let visibility = self.inner.lock().visibility;
        match visibility {
            Visibility::Open => self.close(),
            Visibility::Closed | Visibility::Closing => {
                self.open();
                None
            }
        }
    }

    fn turn(&self, option_id: Option<&str>) -> Option<JoinHandle<()>> {
        let inner = &self.inner;
        let selected = option_id.unwrap_or(START_OPTION_ID);
        let mut state = inner.lock();

        let transcript_len = state.session.transcript().len();
        let options_were_visible = state.session.options_visible();
        let outcome = match option_id {
            Some(id) => inner.engine.select_option(&mut state.session, id),
            None => inner.engine.start(&mut state.session),
        };

        let script = match outcome {
            Outcome::Accepted(script) => script,
            Outcome::Ignored(reason) => {
                log_ignored_selection(&inner.label, selected, reason.as_str());
                return None;
            }
        };
        log_selection(&inner.label, selected, state.session.stage().as_str());
        debug!(session = %inner.label, summary = ?state.session.summary(), "Turn accepted");

        if options_were_visible && !state.session.options_visible() {
            inner.publish(WidgetEvent::OptionsHidden);
        }
        for message in &state.session.transcript()[transcript_len..] {
            inner.publish(WidgetEvent::UserMessage(message.clone()));
        }
        let generation = state.session.generation();
        drop(state);

        let runner = Arc::clone(inner);
        Some(tokio::spawn(async move {
            run_script(script, |action| runner.apply_step(generation, action)).await;
        }))
    }
}

impl WidgetInner {
    fn lock(&self) -> MutexGuard<'_, WidgetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: WidgetEvent) {
        // No subscribers is fine; the snapshot stays authoritative.
        let _ = self.events.send(event);
    }

    fn apply_step(&self, generation: u64, action: Action) -> Flow {
        let mut state = self.lock();
        let current = state.session.generation();
        if current != generation {
            log_stale_step(&self.label, generation, current);
            return Flow::Stop;
        }

        let delivered = state.session.apply(&action);
        let navigate = match action {
            Action::StartTyping => {
                self.publish(WidgetEvent::Typing);
                None
            }
            Action::DeliverBot(_) => {
                if let Some(message) = delivered {
                    self.publish(WidgetEvent::BotMessage(message));
                }
                self.refresh_unread(&mut state);
                None
            }
            Action::RevealOptions(_) => {
                self.publish(WidgetEvent::OptionsRevealed(state.session.visible_options().to_vec()));
                None
            }
            Action::Navigate(url) => {
                self.publish(WidgetEvent::Navigated(url.clone()));
                Some(url)
            }
        };
        drop(state);

        if let Some(url) = navigate {
            log_navigation(&self.label, url.as_str());
            self.navigator.open_in_new_context(&url);
        }

        Flow::Continue
    }

    fn finish_close(&self, epoch: u64) {
        let mut state = self.lock();
        if state.visibility_epoch != epoch || state.visibility != Visibility::Closing {
            return;
        }
        state.visibility = Visibility::Closed;
        self.publish(WidgetEvent::Visibility(Visibility::Closed));
        self.refresh_unread(&mut state);
    }

    /// Unread while hidden with something in the transcript; read while shown
    fn refresh_unread(&self, state: &mut WidgetState) {
        let unread = !state.visibility.is_shown() && !state.session.transcript().is_empty();
        if unread != state.unread {
            state.unread = unread;
            self.publish(WidgetEvent::Unread(unread));
        }
    }
}
