//! Dialogue file loading tests

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use ChatBuddy::config::ChatConfig;
use ChatBuddy::dialogue::{DialogueGraph, EXTERNAL_LINK_OPTION_ID};
use ChatBuddy::{ChatBuddyError, DialogueError};

#[tokio::test]
async fn test_load_dialogue_from_file() {
    let ctx = SimpleTestContext::new().expect("Failed to create test context");
    let path = ctx.write_file("dialogue.json", SMALL_DIALOGUE).unwrap();

    let graph = DialogueGraph::load(&path).await.unwrap();
    assert_eq!(graph.topic_count(), 1);
    assert_eq!(graph.menu_ack(), "Back at the menu.");

    let faq = graph.topic("faq").unwrap();
    let options = faq.rendered_options();
    let ids: Vec<&str> = options.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["menu", EXTERNAL_LINK_OPTION_ID]);
    assert_eq!(options[1].label, "Docs");
    assert!(faq.follow_up.is_none());
}

#[tokio::test]
async fn test_from_config_prefers_configured_path() {
    let ctx = SimpleTestContext::new().expect("Failed to create test context");
    let path = ctx.write_file("custom.json", SMALL_DIALOGUE).unwrap();

    let config = ChatConfig {
        dialogue_path: Some(path.to_string_lossy().into_owned()),
        ..ChatConfig::default()
    };
    let graph = DialogueGraph::from_config(&config).await.unwrap();
    assert_eq!(graph.topic_count(), 1);

    let embedded = DialogueGraph::from_config(&ChatConfig::default()).await.unwrap();
    assert_eq!(embedded.topic_count(), 7);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let ctx = SimpleTestContext::new().expect("Failed to create test context");
    let path = ctx.temp_path().unwrap().join("absent.json");

    let result = DialogueGraph::load(&path).await;
    assert_matches!(result, Err(ChatBuddyError::Io(_)));
}

#[tokio::test]
async fn test_dangling_option_is_rejected() {
    let ctx = SimpleTestContext::new().expect("Failed to create test context");
    let broken = SMALL_DIALOGUE.replace(r#"{"id": "menu", "label": "Menu"}"#, r#"{"id": "pricing", "label": "Pricing"}"#);
    let path = ctx.write_file("broken.json", &broken).unwrap();

    let result = DialogueGraph::load(&path).await;
    assert_matches!(
        result,
        Err(ChatBuddyError::Dialogue(DialogueError::UnknownTarget { node, option }))
            if node == "faq" && option == "pricing"
    );
}

#[tokio::test]
async fn test_bad_link_is_rejected() {
    let broken = SMALL_DIALOGUE.replace("https://docs.example.com", "ftp://docs.example.com");
    let result = DialogueGraph::from_json_str(&broken);
    assert_matches!(
        result,
        Err(ChatBuddyError::Dialogue(DialogueError::InvalidExternalLink { .. }))
    );
}
