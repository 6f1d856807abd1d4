//! Conversation engine
//!
//! Validates option selections against the dialogue graph, applies their
//! immediate effects to the session and returns the timed script for the
//! rest of the turn. The engine never sleeps and never touches a host; it is
//! a pure function of (session, selection) apart from message timestamps.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ChatConfig;
use crate::dialogue::{DialogueGraph, Target};
use super::script::Script;
use super::session::{SessionState, Stage};

/// Delays used when building turn scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Before the first bot message of a turn
    pub typing: Duration,
    /// Before a follow-up message
    pub follow_up: Duration,
    /// Between the last bot message and the options reveal
    pub options: Duration,
}

impl Timing {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            typing: config.typing_delay(),
            follow_up: config.follow_up_delay(),
            options: config.options_delay(),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

/// Why a selection was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A turn is in flight; options are hidden until it settles
    OptionsHidden,
    /// The id is not part of the offered option set
    NotOffered,
    /// `start` after the conversation already began
    AlreadyStarted,
    /// Offered id that resolves to nothing usable
    UnknownTarget,
}

impl IgnoreReason {
    pub fn as_str(self) -> &'static str {
        match self {
            IgnoreReason::OptionsHidden => "options_hidden",
            IgnoreReason::NotOffered => "not_offered",
            IgnoreReason::AlreadyStarted => "already_started",
            IgnoreReason::UnknownTarget => "unknown_target",
        }
    }
}

/// Result of feeding a selection to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The session was updated; the script carries the deferred effects
    Accepted(Script),
    /// Nothing changed
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    pub fn script(&self) -> Option<&Script> {
        match self {
            Outcome::Accepted(script) => Some(script),
            Outcome::Ignored(_) => None,
        }
    }
}

/// Conversation engine over a shared dialogue graph
#[derive(Debug, Clone)]
pub struct ConversationEngine {
    graph: Arc<DialogueGraph>,
    timing: Timing,
}

impl ConversationEngine {
    pub fn new(graph: Arc<DialogueGraph>, timing: Timing) -> Self {
        Self { graph, timing }
    }

    pub fn graph(&self) -> &DialogueGraph {
        &self.graph
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// A fresh session positioned at the cold open
    pub fn new_session(&self) -> SessionState {
        SessionState::new(self.graph.cold_open())
    }

    /// Begin the conversation: echo the cold-open option and greet
    pub fn start(&self, state: &mut SessionState) -> Outcome {
        if state.stage().is_started() {
            return Outcome::Ignored(IgnoreReason::AlreadyStarted);
        }
        let Some(cold_open) = self.graph.cold_open().first() else {
            return Outcome::Ignored(IgnoreReason::UnknownTarget);
        };

        let menu = self.graph.menu();
        state.hide_options();
        state.push_user(&cold_open.label);
        state.set_stage(Stage::Menu);

        Outcome::Accepted(
            Script::new()
                .bot_message(self.timing.typing, menu.message.clone())
                .reveal_options(self.timing.options, menu.options.clone()),
        )
    }

    /// Apply a user selection
    pub fn select_option(&self, state: &mut SessionState, option_id: &str) -> Outcome {
        if !state.options_visible() || state.is_typing() {
            return Outcome::Ignored(IgnoreReason::OptionsHidden);
        }
        let Some(option) = state.offered(option_id).cloned() else {
            return Outcome::Ignored(IgnoreReason::NotOffered);
        };

        match self.graph.resolve(&option.id) {
            Target::Start => self.start(state),
            Target::Menu => {
                let menu = self.graph.menu();
                state.hide_options();
                state.push_user(&option.label);
                state.set_stage(Stage::Menu);

                Outcome::Accepted(
                    Script::new()
                        .bot_message(self.timing.typing, self.graph.menu_ack())
                        .reveal_options(self.timing.options, menu.options.clone()),
                )
            }
            Target::ExternalLink => {
                let link = match state.stage() {
                    Stage::Topic(id) => self
                        .graph
                        .topic(id)
                        .and_then(|topic| topic.external_link.as_ref()),
                    _ => None,
                };
                let Some(link) = link else {
                    return Outcome::Ignored(IgnoreReason::UnknownTarget);
                };

                // Options stay up; the reveal re-offers exactly what was shown.
                Outcome::Accepted(
                    Script::new()
                        .navigate(link.url.clone())
                        .reveal_options(Duration::ZERO, state.options().to_vec()),
                )
            }
            Target::Topic(topic) => {
                state.hide_options();
                state.push_user(&option.label);
                state.set_stage(Stage::Topic(topic.id.clone()));

                let mut script = Script::new().bot_message(self.timing.typing, topic.message.clone());
                if let Some(follow_up) = &topic.follow_up {
                    script = script.bot_message(self.timing.follow_up, follow_up.clone());
                }
                Outcome::Accepted(script.reveal_options(self.timing.options, topic.rendered_options()))
            }
            Target::Unknown => Outcome::Ignored(IgnoreReason::NotOffered),
        }
    }

    /// Throw the conversation away and return to the cold open
    pub fn reset(&self, state: &mut SessionState) {
        state.reset(self.graph.cold_open());
    }
}
