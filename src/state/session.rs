//! Conversation session state
//!
//! This module holds the single mutable entity of the chat widget: the stage
//! the conversation is positioned at, the transcript, the offered options and
//! the typing / visibility flags, along with the read model handed to hosts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dialogue::OptionLink;
use crate::utils::helpers::{format_message_time, generate_uuid};
use super::script::Action;

/// Who wrote a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: generate_uuid(),
            sender,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    /// Render timestamp formatted for display
    pub fn time_label(&self, format: &str) -> String {
        format_message_time(self.sent_at, format)
    }
}

/// Where the conversation is positioned in the dialogue graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "topic", rename_all = "snake_case")]
pub enum Stage {
    #[default]
    NotStarted,
    Menu,
    Topic(String),
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::NotStarted => "not_started",
            Stage::Menu => "menu",
            Stage::Topic(id) => id,
        }
    }

    pub fn is_started(&self) -> bool {
        !matches!(self, Stage::NotStarted)
    }
}

/// Session state owned by one widget instance
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    stage: Stage,
    transcript: Vec<ChatMessage>,
    options: Vec<OptionLink>,
    options_visible: bool,
    typing: bool,
    /// Bumped on every reset; steps scheduled under an older value are stale
    generation: u64,
    updated_at: DateTime<Utc>,
}

impl SessionState {
    /// Create a fresh, not-started session offering the cold-open options
    pub fn new(cold_open: &[OptionLink]) -> Self {
        Self {
            stage: Stage::NotStarted,
            transcript: Vec::new(),
            options: cold_open.to_vec(),
            options_visible: true,
            typing: false,
            generation: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// The offered option set, whether or not it is currently shown
    pub fn options(&self) -> &[OptionLink] {
        &self.options
    }

    pub fn options_visible(&self) -> bool {
        self.options_visible
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Options a host may render right now; empty while the bot is typing
    pub fn visible_options(&self) -> &[OptionLink] {
        if self.options_visible && !self.typing {
            &self.options
        } else {
            &[]
        }
    }

    /// Find a currently selectable option by id
    pub fn offered(&self, option_id: &str) -> Option<&OptionLink> {
        self.visible_options().iter().find(|o| o.id == option_id)
    }

    pub(crate) fn hide_options(&mut self) {
        self.options_visible = false;
        self.touch();
    }

    pub(crate) fn push_user(&mut self, text: &str) -> ChatMessage {
        let message = ChatMessage::user(text);
        self.transcript.push(message.clone());
        self.touch();
        message
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
        self.touch();
    }

    /// Apply a deferred script action
    ///
    /// Returns the bot message appended by `DeliverBot`, if any.
    pub fn apply(&mut self, action: &Action) -> Option<ChatMessage> {
        let delivered = match action {
            Action::StartTyping => {
                self.typing = true;
                None
            }
            Action::DeliverBot(text) => {
                let message = ChatMessage::bot(text.as_str());
                self.typing = false;
                self.transcript.push(message.clone());
                Some(message)
            }
            Action::RevealOptions(options) => {
                self.options = options.clone();
                self.options_visible = true;
                None
            }
            Action::Navigate(_) => None,
        };
        self.touch();
        delivered
    }

    /// Discard the conversation and go back to the cold open
    pub(crate) fn reset(&mut self, cold_open: &[OptionLink]) {
        self.stage = Stage::NotStarted;
        self.transcript.clear();
        self.options = cold_open.to_vec();
        self.options_visible = true;
        self.typing = false;
        self.generation += 1;
        self.touch();
    }

    /// Create a summary of the session for logging
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            stage: self.stage.as_str().to_string(),
            transcript_len: self.transcript.len(),
            option_ids: self.options.iter().map(|o| o.id.clone()).collect(),
            options_visible: self.options_visible,
            typing: self.typing,
            generation: self.generation,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Session summary for logging and debugging
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub stage: String,
    pub transcript_len: usize,
    pub option_ids: Vec<String>,
    pub options_visible: bool,
    pub typing: bool,
    pub generation: u64,
    pub updated_at: DateTime<Utc>,
}

/// Whether the conversation surface is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Closed,
    Open,
    /// Close requested, animation still running
    Closing,
}

impl Visibility {
    /// Closing still counts as shown until the animation completes
    pub fn is_shown(self) -> bool {
        !matches!(self, Visibility::Closed)
    }
}

/// Read model rendered by hosts
#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    pub stage: Stage,
    pub transcript: Vec<ChatMessage>,
    pub typing: bool,
    pub options: Vec<OptionLink>,
    pub options_visible: bool,
    pub visibility: Visibility,
    pub open: bool,
    pub unread: bool,
    pub launcher_visible: bool,
}
