//! Test data helpers for creating test objects
//!
//! This module builds engines and widgets over the embedded dialogue, with a
//! recording navigator so outbound links can be asserted on.

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use ChatBuddy::config::ChatConfig;
use ChatBuddy::dialogue::DialogueGraph;
use ChatBuddy::state::{
    ChatWidget, ConversationEngine, Navigator, RecordingNavigator, Sender, Timing, WidgetEvent,
};

use super::simple_test::init_test_env;

/// Minimal dialogue used by file loading tests
pub const SMALL_DIALOGUE: &str = r#"{
    "cold_open": [{"id": "start", "label": "Hi"}],
    "menu": {
        "message": "Pick one",
        "options": [{"id": "faq", "label": "FAQ"}]
    },
    "menu_ack": "Back at the menu.",
    "topics": [
        {
            "id": "faq",
            "message": "*Answers* live here.",
            "options": [{"id": "menu", "label": "Menu"}],
            "external_link": {"label": "Docs", "url": "https://docs.example.com"}
        }
    ]
}"#;

pub fn test_chat_config() -> ChatConfig {
    ChatConfig::default()
}

pub fn test_graph() -> Arc<DialogueGraph> {
    Arc::new(DialogueGraph::embedded().expect("embedded dialogue is valid"))
}

pub fn test_engine() -> ConversationEngine {
    let config = test_chat_config();
    ConversationEngine::new(test_graph(), Timing::from_config(&config))
}

/// Widget plus the navigator it reports to
pub struct TestWidget {
    pub widget: ChatWidget,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn test_widget() -> TestWidget {
    init_test_env();

    let navigator = Arc::new(RecordingNavigator::new());
    let widget = ChatWidget::new(
        "test-session",
        test_engine(),
        test_chat_config(),
        navigator.clone() as Arc<dyn Navigator>,
    );
    TestWidget { widget, navigator }
}

/// Wait for a turn to finish, if one was accepted
pub async fn settle(handle: Option<JoinHandle<()>>) {
    if let Some(handle) = handle {
        handle.await.expect("turn task panicked");
    }
}

/// Open the widget and play the opening turn to completion
pub async fn started_widget() -> TestWidget {
    let test = test_widget();
    test.widget.open();
    settle(test.widget.start()).await;
    test
}

/// Select an option that must be accepted and wait for the turn
pub async fn select(widget: &ChatWidget, option_id: &str) {
    let handle = widget.select_option(option_id);
    assert!(handle.is_some(), "option '{}' was not accepted", option_id);
    settle(handle).await;
}

/// Everything published so far
pub fn drain_events(events: &mut broadcast::Receiver<WidgetEvent>) -> Vec<WidgetEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Transcript as (sender, text) pairs for compact assertions
pub fn transcript_pairs(widget: &ChatWidget) -> Vec<(Sender, String)> {
    widget
        .snapshot()
        .transcript
        .into_iter()
        .map(|message| (message.sender, message.text))
        .collect()
}
