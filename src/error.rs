//! Error types for synthesis, the target document and font loading.

use thiserror::Error;

use crate::document::{Axis, NodeId};

/// Failure of a whole synthesis run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesisError {
    #[error("no elements to synthesize")]
    NoElements,

    #[error("font {family} {style} unavailable and every fallback failed")]
    FontExhausted { family: String, style: String },

    #[error("attachment root {0:?} is not in the document")]
    UnknownParent(NodeId),
}

/// A call the target document refused. The synthesizer treats these as
/// advisory and carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("node {0:?} is not attached to a parent")]
    NotAttached(NodeId),

    #[error("parent of node {0:?} has no auto-layout")]
    NotAutoLayout(NodeId),

    #[error("node {node:?} cannot hug on the {axis:?} axis")]
    HugUnsupported { node: NodeId, axis: Axis },

    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("cannot attach node {0:?} inside its own subtree")]
    Cycle(NodeId),

    #[error("layout failed: {0}")]
    Layout(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("font {family} {style} is not registered")]
    NotFound { family: String, style: String },

    #[error("failed to parse font face: {0}")]
    Parse(String),
}

/// Errors surfaced by the end-to-end pipeline and the CLI.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
