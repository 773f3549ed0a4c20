//! # frame-forge – inline-styled HTML → auto-layout frames
//!
//! This crate converts a tree of elements carrying CSS-like inline styles
//! into a tree of auto-layout boxes (frames and text nodes with FIXED / HUG /
//! FILL sizing), the model used by design tools. The pipeline stages are:
//!
//! 1. **Parse** – markup string → DOM tree ([`dom`])
//! 2. **Style** – inline `style` declarations → typed styles ([`style`], [`values`])
//! 3. **Synthesize** – element tree → boxes in a target [`document`] ([`layout`])
//! 4. **Snapshot** – resolved boxes → JSON ([`snapshot`])
//!
//! Text is measured through the [`fonts::FontProvider`] trait; stacking of
//! positioned boxes lives in [`stacking`] and text-leaf decisions in [`text`].

pub mod document;
pub mod dom;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod pipeline;
pub mod snapshot;
pub mod stacking;
pub mod style;
pub mod templates;
pub mod text;
pub mod values;

// Re-exports for convenience
pub use document::{Document, NodeId};
pub use error::{PipelineError, SynthesisError};
pub use layout::{synthesize, SynthesisOptions, SynthesizedFrame};
pub use pipeline::{snapshot_json, synthesize_html, PipelineConfig};
