//! State management module
//!
//! This module handles the conversation session, the engine that advances it
//! and the widget that runs it on the timer

pub mod session;
pub mod script;
pub mod engine;
pub mod events;
pub mod navigator;
pub mod widget;
pub mod registry;

// Re-export commonly used state components
pub use session::{ChatMessage, ChatSnapshot, Sender, SessionState, SessionSummary, Stage, Visibility};
pub use script::{run_script, Action, Flow, Script, Step};
pub use engine::{ConversationEngine, IgnoreReason, Outcome, Timing};
pub use events::WidgetEvent;
pub use navigator::{LogNavigator, Navigator, RecordingNavigator};
pub use widget::ChatWidget;
pub use registry::{NavigatorFactory, SessionRegistry};
