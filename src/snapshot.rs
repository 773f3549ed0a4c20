//! Snapshot – a serialisable copy of a synthesized subtree.
//!
//! This is the frozen form of the target document: every box with its
//! resolved geometry, sizing and paint, nested as in the document. The CLI
//! writes it as JSON and the integration tests hash it.

use serde::{Deserialize, Serialize};

use crate::document::{
    CornerRadii, CounterAlign, Document, Effect, LayoutMode, NodeId, NodeKind, Padding, Paint,
    Positioning, PrimaryAlign, Role, SizingMode, StrokeWeights, TextData,
};

/// One box and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default = "NodeSnapshot::default_role")]
    pub role: Role,

    /// Position relative to the parent, and size, in px.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    pub layout_mode: LayoutMode,
    pub sizing: [SizingMode; 2],
    pub positioning: Positioning,
    pub primary_align: PrimaryAlign,
    pub counter_align: CounterAlign,
    pub item_spacing: f32,
    pub padding: Padding,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_weights: Option<StrokeWeights>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radii: Option<CornerRadii>,
    #[serde(default = "NodeSnapshot::default_opacity")]
    pub opacity: f32,
    #[serde(default = "NodeSnapshot::default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub clips_content: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextData>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Snapshot the subtree rooted at `id`. `None` if the node is unknown.
    pub fn capture(doc: &Document, id: NodeId) -> Option<Self> {
        let node = doc.node(id)?;
        let children = node
            .children
            .iter()
            .filter_map(|c| Self::capture(doc, *c))
            .collect();
        let has_radius = node.corner_radii != CornerRadii::default();
        Some(Self {
            id: node.id,
            name: node.name.clone(),
            kind: node.kind,
            role: node.role,
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
            layout_mode: node.layout_mode,
            sizing: [node.sizing_horizontal, node.sizing_vertical],
            positioning: node.positioning,
            primary_align: node.primary_align,
            counter_align: node.counter_align,
            item_spacing: node.item_spacing,
            padding: node.padding,
            fills: node.fills.clone(),
            strokes: node.strokes.clone(),
            stroke_weights: (!node.strokes.is_empty()).then_some(node.stroke_weights),
            effects: node.effects.clone(),
            corner_radii: has_radius.then_some(node.corner_radii),
            opacity: node.opacity,
            visible: node.visible,
            rotation: node.rotation,
            clips_content: node.clips_content,
            text: node.text.clone(),
            children,
        })
    }

    fn default_role() -> Role {
        Role::Content
    }

    fn default_opacity() -> f32 {
        1.0
    }

    fn default_visible() -> bool {
        true
    }

    /// Number of boxes in the subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    /// First box named `name`, depth first.
    pub fn find(&self, name: &str) -> Option<&NodeSnapshot> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Color;

    #[test]
    fn capture_nests_children() {
        let mut doc = Document::new();
        let parent = doc.create_frame("parent");
        doc.set_layout_mode(parent, LayoutMode::Vertical).unwrap();
        doc.append_child(doc.root(), parent).unwrap();
        let child = doc.create_frame("child");
        doc.node_mut(child).unwrap().fills = vec![Paint::Solid { color: Color::WHITE }];
        doc.append_child(parent, child).unwrap();

        let snap = NodeSnapshot::capture(&doc, parent).unwrap();
        assert_eq!(snap.count(), 2);
        assert_eq!(snap.find("child").unwrap().fills.len(), 1);
        assert!(snap.find("missing").is_none());
        assert!(NodeSnapshot::capture(&doc, NodeId(99)).is_none());
    }

    #[test]
    fn json_round_trip() {
        let mut doc = Document::new();
        let frame = doc.create_frame("card");
        doc.node_mut(frame).unwrap().corner_radii = CornerRadii {
            top_left: 4.0,
            top_right: 4.0,
            bottom_right: 4.0,
            bottom_left: 4.0,
        };
        let snap = NodeSnapshot::capture(&doc, frame).unwrap();
        let json = snap.to_json();
        assert!(json.contains("\"corner_radii\""));
        assert!(!json.contains("\"children\""));
        assert_eq!(NodeSnapshot::from_json(&json).unwrap(), snap);
    }
}
