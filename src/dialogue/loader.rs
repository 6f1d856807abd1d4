//! Dialogue file loading
//!
//! The dialogue ships as JSON embedded in the binary and can be replaced by a
//! file on disk, so content edits never touch engine code.

use std::path::Path;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};
use crate::config::ChatConfig;
use crate::utils::errors::Result;
use super::graph::{DialogueGraph, MenuNode, OptionLink, TopicNode};

const EMBEDDED_DIALOGUE: &str = include_str!("../../dialogue/techkohl.json");

/// On-disk dialogue format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueFile {
    pub cold_open: Vec<OptionLink>,
    pub menu: MenuNode,
    pub menu_ack: String,
    pub topics: Vec<TopicNode>,
}

impl DialogueGraph {
    /// Parse and validate a dialogue from JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: DialogueFile = serde_json::from_str(content)?;
        let graph = DialogueGraph::new(file.cold_open, file.menu, file.menu_ack, file.topics)?;
        debug!(topics = graph.topic_count(), "Dialogue parsed");
        Ok(graph)
    }

    /// The dialogue compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_DIALOGUE)
    }

    /// Load a dialogue file from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let graph = Self::from_json_str(&content)?;
        info!(path = %path.display(), topics = graph.topic_count(), "Loaded dialogue file");
        Ok(graph)
    }

    /// Load the dialogue configured for the widget
    pub async fn from_config(config: &ChatConfig) -> Result<Self> {
        match &config.dialogue_path {
            Some(path) => Self::load(path).await,
            None => {
                info!("Using embedded dialogue");
                Self::embedded()
            }
        }
    }
}
