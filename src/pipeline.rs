//! Pipeline – ties together markup splitting, styling and synthesis into a
//! single function call.

use serde::Deserialize;

use crate::document::Document;
use crate::dom::{body_children, parse_html};
use crate::error::PipelineError;
use crate::fonts::{FontManager, FontProvider, DEFAULT_FAMILY};
use crate::layout::{synthesize, SynthesisOptions, SynthesizedFrame};
use crate::snapshot::NodeSnapshot;
use crate::style::build_element_tree;

/// Configuration for a synthesis run. Every field has a default, so a
/// config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name of the top-level frame (default: "Frame").
    pub name: String,
    /// Width the top level lays out against; unconstrained when absent.
    pub viewport_width: Option<f32>,
    /// Family for text that declares none (default: Inter).
    pub default_font_family: String,
    /// Size for text that declares none (default: 16).
    pub default_font_size: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "Frame".to_string(),
            viewport_width: None,
            default_font_family: DEFAULT_FAMILY.to_string(),
            default_font_size: 16.0,
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON config.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    fn options(&self) -> SynthesisOptions {
        SynthesisOptions {
            name: self.name.clone(),
            parent: None,
            viewport_width: self.viewport_width,
            default_font_family: self.default_font_family.clone(),
            default_font_size: self.default_font_size,
        }
    }
}

/// Full pipeline: markup string → target document.
///
/// Returns the document and the top-level frame synthesized on its canvas.
pub fn synthesize_html(
    html: &str,
    config: &PipelineConfig,
    fonts: &mut dyn FontProvider,
) -> Result<(Document, SynthesizedFrame), PipelineError> {
    // 1. Split markup
    let dom = parse_html(html);
    let dom_nodes = body_children(&dom);

    // 2. Build the element tree
    let elements = build_element_tree(&dom_nodes);

    // 3. Synthesize
    let mut doc = Document::new();
    let frame = synthesize(&mut doc, &elements, &config.options(), fonts)?;
    log::info!(
        "synthesized '{}' ({}x{}, {} boxes)",
        frame.name,
        frame.width,
        frame.height,
        doc.descendants(frame.id).len()
    );
    Ok((doc, frame))
}

/// Synthesize with the builtin fonts and return the snapshot as JSON.
pub fn snapshot_json(html: &str, config: &PipelineConfig) -> Result<String, PipelineError> {
    let mut fonts = FontManager::default();
    let (doc, frame) = synthesize_html(html, config, &mut fonts)?;
    let snapshot = NodeSnapshot::capture(&doc, frame.id)
        .ok_or(crate::error::SynthesisError::UnknownParent(frame.id))?;
    Ok(snapshot.to_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthesisError;

    #[test]
    fn pipeline_basic() {
        let html = r#"<h1>Hello</h1><p style="color: #333">World</p>"#;
        let mut fonts = FontManager::default();
        let (doc, frame) = synthesize_html(html, &PipelineConfig::default(), &mut fonts).unwrap();
        assert_eq!(frame.name, "Frame");
        assert_eq!(doc.children(frame.id).len(), 2);
        assert!(frame.height > 0.0);
    }

    #[test]
    fn config_defaults_fill_missing_keys() {
        let config = PipelineConfig::from_json(r#"{ "viewport_width": 390 }"#).unwrap();
        assert_eq!(config.viewport_width, Some(390.0));
        assert_eq!(config.name, "Frame");
        assert_eq!(config.default_font_size, 16.0);
        assert!(PipelineConfig::from_json("{ nope").is_err());
    }

    #[test]
    fn empty_markup_is_an_error() {
        let err = snapshot_json("<!-- nothing -->", &PipelineConfig::default());
        assert!(matches!(
            err,
            Err(PipelineError::Synthesis(SynthesisError::NoElements))
        ));
    }
}
