//! Dialogue module
//!
//! This module holds the static dialogue graph the chat widget walks:
//! topic nodes, option links, the data file loader and message markup.

pub mod graph;
pub mod loader;
pub mod markup;

// Re-export commonly used dialogue components
pub use graph::{
    DialogueGraph, ExternalLink, MenuNode, OptionLink, Target, TopicNode,
    EXTERNAL_LINK_OPTION_ID, MENU_OPTION_ID, START_OPTION_ID,
};
pub use loader::DialogueFile;
pub use markup::{RichText, Segment};
