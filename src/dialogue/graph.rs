//! Dialogue graph
//!
//! Topic nodes, option links and the immutable graph the conversation engine
//! walks. The graph is directed and cyclic: most topics link back to the main
//! menu, and the menu links to every topic.

use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use url::Url;
use crate::utils::errors::{DialogueError, DialogueResult};

/// Option id of the single cold-open option
pub const START_OPTION_ID: &str = "start";
/// Option id of the synthetic "return to menu" action
pub const MENU_OPTION_ID: &str = "menu";
/// Option id of the synthetic "open external link" action
pub const EXTERNAL_LINK_OPTION_ID: &str = "ext_link";

const RESERVED_IDS: [&str; 3] = [START_OPTION_ID, MENU_OPTION_ID, EXTERNAL_LINK_OPTION_ID];

/// A selectable option: target id plus the label shown on the button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLink {
    pub id: String,
    pub label: String,
}

impl OptionLink {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Whether this option triggers the external navigation action
    pub fn is_external_link(&self) -> bool {
        self.id == EXTERNAL_LINK_OPTION_ID
    }
}

/// Outbound link attached to a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub label: String,
    pub url: Url,
}

/// A named vertex of the dialogue graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub follow_up: Option<String>,
    pub options: Vec<OptionLink>,
    #[serde(default)]
    pub external_link: Option<ExternalLink>,
}

impl TopicNode {
    /// Options offered once this topic has been answered: the declared
    /// options, plus the synthetic external-link option when one is declared.
    pub fn rendered_options(&self) -> Vec<OptionLink> {
        let mut options = self.options.clone();
        if let Some(link) = &self.external_link {
            options.push(OptionLink::new(EXTERNAL_LINK_OPTION_ID, link.label.clone()));
        }
        options
    }
}

/// The welcome / main menu node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub message: String,
    pub options: Vec<OptionLink>,
}

/// What an option id points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Start,
    Menu,
    ExternalLink,
    Topic(&'a TopicNode),
    Unknown,
}

/// Immutable dialogue graph, built once and shared by every session
#[derive(Debug, Clone)]
pub struct DialogueGraph {
    cold_open: Vec<OptionLink>,
    menu: MenuNode,
    menu_ack: String,
    topics: HashMap<String, TopicNode>,
    topic_order: Vec<String>,
}

impl DialogueGraph {
    /// Build and validate a graph
    pub fn new(
        cold_open: Vec<OptionLink>,
        menu: MenuNode,
        menu_ack: String,
        topics: Vec<TopicNode>,
    ) -> DialogueResult<Self> {
        let mut topic_order = Vec::with_capacity(topics.len());
        let mut by_id = HashMap::with_capacity(topics.len());

        for topic in topics {
            if RESERVED_IDS.contains(&topic.id.as_str()) {
                return Err(DialogueError::ReservedTopicId(topic.id));
            }
            if by_id.contains_key(&topic.id) {
                return Err(DialogueError::DuplicateTopic(topic.id));
            }
            topic_order.push(topic.id.clone());
            by_id.insert(topic.id.clone(), topic);
        }

        let graph = Self {
            cold_open,
            menu,
            menu_ack,
            topics: by_id,
            topic_order,
        };
        graph.validate()?;
        Ok(graph)
    }

    /// Check that every edge of the graph resolves
    pub fn validate(&self) -> DialogueResult<()> {
        match self.cold_open.as_slice() {
            [only] if only.id == START_OPTION_ID => {}
            _ => {
                return Err(DialogueError::InvalidColdOpen {
                    expected: START_OPTION_ID.to_string(),
                })
            }
        }

        if self.menu.message.trim().is_empty() {
            return Err(DialogueError::EmptyMessage(MENU_OPTION_ID.to_string()));
        }
        if self.menu_ack.trim().is_empty() {
            return Err(DialogueError::EmptyMessage("menu_ack".to_string()));
        }
        self.validate_options(MENU_OPTION_ID, &self.menu.options)?;

        for id in &self.topic_order {
            let topic = &self.topics[id];
            if topic.message.trim().is_empty() {
                return Err(DialogueError::EmptyMessage(topic.id.clone()));
            }
            if topic.follow_up.as_deref().is_some_and(|f| f.trim().is_empty()) {
                return Err(DialogueError::EmptyMessage(topic.id.clone()));
            }
            if let Some(link) = &topic.external_link {
                if !matches!(link.url.scheme(), "http" | "https") {
                    return Err(DialogueError::InvalidExternalLink {
                        node: topic.id.clone(),
                        url: link.url.to_string(),
                    });
                }
            }
            self.validate_options(&topic.id, &topic.options)?;
        }

        Ok(())
    }

    fn validate_options(&self, node: &str, options: &[OptionLink]) -> DialogueResult<()> {
        if options.is_empty() {
            return Err(DialogueError::NoOptions(node.to_string()));
        }

        let mut seen = HashSet::new();
        for option in options {
            if !seen.insert(option.id.as_str()) {
                return Err(DialogueError::DuplicateOption {
                    node: node.to_string(),
                    option: option.id.clone(),
                });
            }
            // Declared options may only point at topics or back to the menu;
            // the external-link option is appended at render time.
            let valid = option.id == MENU_OPTION_ID || self.topics.contains_key(&option.id);
            if !valid {
                return Err(DialogueError::UnknownTarget {
                    node: node.to_string(),
                    option: option.id.clone(),
                });
            }
        }

        Ok(())
    }

    /// Classify an option id
    pub fn resolve(&self, option_id: &str) -> Target<'_> {
        match option_id {
            START_OPTION_ID => Target::Start,
            MENU_OPTION_ID => Target::Menu,
            EXTERNAL_LINK_OPTION_ID => Target::ExternalLink,
            id => self.topics.get(id).map_or(Target::Unknown, Target::Topic),
        }
    }

    pub fn cold_open(&self) -> &[OptionLink] {
        &self.cold_open
    }

    pub fn menu(&self) -> &MenuNode {
        &self.menu
    }

    /// Acknowledgement sent when the user returns to the main menu
    pub fn menu_ack(&self) -> &str {
        &self.menu_ack
    }

    pub fn topic(&self, id: &str) -> Option<&TopicNode> {
        self.topics.get(id)
    }

    /// Topics in declaration order
    pub fn topics(&self) -> impl Iterator<Item = &TopicNode> {
        self.topic_order.iter().map(move |id| &self.topics[id])
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn topic(id: &str, options: &[&str]) -> TopicNode {
        TopicNode {
            id: id.to_string(),
            message: format!("About *{}*", id),
            follow_up: None,
            options: options.iter().map(|o| OptionLink::new(*o, o.to_uppercase())).collect(),
            external_link: None,
        }
    }

    fn menu(options: &[&str]) -> MenuNode {
        MenuNode {
            message: "Welcome".to_string(),
            options: options.iter().map(|o| OptionLink::new(*o, *o)).collect(),
        }
    }

    fn cold_open() -> Vec<OptionLink> {
        vec![OptionLink::new(START_OPTION_ID, "Start")]
    }

    #[test]
    fn test_cyclic_graph_is_valid() {
        let graph = DialogueGraph::new(
            cold_open(),
            menu(&["a", "b"]),
            "Back".to_string(),
            vec![topic("a", &["b", "menu"]), topic("b", &["a", "menu"])],
        )
        .unwrap();

        assert_eq!(graph.topic_count(), 2);
        assert_matches!(graph.resolve("a"), Target::Topic(t) if t.id == "a");
        assert_eq!(graph.resolve("menu"), Target::Menu);
        assert_eq!(graph.resolve("start"), Target::Start);
        assert_eq!(graph.resolve("ext_link"), Target::ExternalLink);
        assert_eq!(graph.resolve("nope"), Target::Unknown);
    }

    #[test]
    fn test_unknown_target_rejected() {
        let result = DialogueGraph::new(
            cold_open(),
            menu(&["a"]),
            "Back".to_string(),
            vec![topic("a", &["ghost"])],
        );
        assert_matches!(result, Err(DialogueError::UnknownTarget { ref node, ref option }) if node == "a" && option == "ghost");
    }

    #[test]
    fn test_declared_external_link_option_rejected() {
        let result = DialogueGraph::new(
            cold_open(),
            menu(&["a"]),
            "Back".to_string(),
            vec![topic("a", &["ext_link"])],
        );
        assert_matches!(result, Err(DialogueError::UnknownTarget { .. }));
    }

    #[test]
    fn test_duplicate_option_rejected() {
        let result = DialogueGraph::new(
            cold_open(),
            menu(&["a", "a"]),
            "Back".to_string(),
            vec![topic("a", &["menu"])],
        );
        assert_matches!(result, Err(DialogueError::DuplicateOption { .. }));
    }

    #[test]
    fn test_reserved_and_duplicate_topics_rejected() {
        let reserved = DialogueGraph::new(
            cold_open(),
            menu(&["menu"]),
            "Back".to_string(),
            vec![topic("menu", &["menu"])],
        );
        assert_matches!(reserved, Err(DialogueError::ReservedTopicId(_)));

        let duplicate = DialogueGraph::new(
            cold_open(),
            menu(&["a"]),
            "Back".to_string(),
            vec![topic("a", &["menu"]), topic("a", &["menu"])],
        );
        assert_matches!(duplicate, Err(DialogueError::DuplicateTopic(_)));
    }

    #[test]
    fn test_cold_open_must_be_single_start() {
        let result = DialogueGraph::new(
            vec![OptionLink::new("go", "Go")],
            menu(&["a"]),
            "Back".to_string(),
            vec![topic("a", &["menu"])],
        );
        assert_matches!(result, Err(DialogueError::InvalidColdOpen { .. }));
    }

    #[test]
    fn test_rendered_options_append_external_link() {
        let mut node = topic("site", &["menu"]);
        assert_eq!(node.rendered_options(), node.options);

        node.external_link = Some(ExternalLink {
            label: "Open".to_string(),
            url: Url::parse("https://example.com").unwrap(),
        });
        let rendered = node.rendered_options();
        assert_eq!(rendered.len(), 2);
        assert!(rendered[1].is_external_link());
        assert_eq!(rendered[1].label, "Open");
    }

    #[test]
    fn test_non_http_external_link_rejected() {
        let mut node = topic("site", &["menu"]);
        node.external_link = Some(ExternalLink {
            label: "Open".to_string(),
            url: Url::parse("javascript:alert(1)").unwrap(),
        });
        let result = DialogueGraph::new(cold_open(), menu(&["site"]), "Back".to_string(), vec![node]);
        assert_matches!(result, Err(DialogueError::InvalidExternalLink { .. }));
    }
}
