//! Markup Reader Module
//!
//! - `pull`: the streaming node state machine (`MarkupReader`)
//! - `values`: text collection and typed value/attribute reads
//! - `marker`: depth markers for subtree loops
//! - `node`: node kinds and the borrowed node view
//! - `config`: per-reader options

pub mod config;
pub mod marker;
pub mod node;
pub mod pull;
pub mod values;

pub use config::ReaderConfig;
pub use marker::Marker;
pub use node::{Node, NodeKind};
pub use pull::{MarkupReader, Nodes};
