//! Target document – an arena of auto-layout boxes.
//!
//! Boxes declare per-axis sizing (FIXED / HUG / FILL) and the document
//! enforces the legality rules of the auto-layout model: FILL needs an
//! auto-layout parent, HUG needs an auto-layout frame or a text node, and
//! absolute positioning needs an auto-layout parent. Geometry is resolved on
//! demand with Taffy by [`Document::compute_layout`].

use serde::{Deserialize, Serialize};
use taffy::{
    AlignItems, AvailableSpace, Dimension, FlexDirection, FlexWrap, JustifyContent,
    LengthPercentage, LengthPercentageAuto, Rect, Size, TaffyTree,
};

use crate::error::DocumentError;
use crate::fonts::FontName;
use crate::values::{Color, ColorStop};

// ---------------------------------------------------------------------------
// Node model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    None,
    Horizontal,
    Vertical,
}

impl LayoutMode {
    pub fn primary_axis(self) -> Option<Axis> {
        match self {
            LayoutMode::None => None,
            LayoutMode::Horizontal => Some(Axis::Horizontal),
            LayoutMode::Vertical => Some(Axis::Vertical),
        }
    }

    pub fn is_auto_layout(self) -> bool {
        self != LayoutMode::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizingMode {
    Fixed,
    Hug,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryAlign {
    Min,
    Center,
    Max,
    SpaceBetween,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterAlign {
    Min,
    Center,
    Max,
    Baseline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Positioning {
    Auto,
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Frame,
    Text,
}

/// Why a box exists. Everything but `Content` is synthetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Content,
    Spacer,
    GrowSpacer,
    Wrapper,
    Placeholder,
}

impl Role {
    pub fn is_synthetic(self) -> bool {
        self != Role::Content
    }
}

/// 2x3 affine transform mapping the unit square onto the gradient space.
pub type GradientTransform = [[f32; 3]; 2];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Paint {
    Solid {
        color: Color,
    },
    LinearGradient {
        transform: GradientTransform,
        stops: Vec<ColorStop>,
    },
    RadialGradient {
        transform: GradientTransform,
        stops: Vec<ColorStop>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    DropShadow {
        color: Color,
        offset: (f32, f32),
        radius: f32,
        spread: f32,
    },
    InnerShadow {
        color: Color,
        offset: (f32, f32),
        radius: f32,
        spread: f32,
    },
    LayerBlur {
        radius: f32,
    },
    BackgroundBlur {
        radius: f32,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.left + self.right,
            Axis::Vertical => self.top + self.bottom,
        }
    }
}

/// Per-side stroke weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeWeights {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LineHeightValue {
    Auto,
    Pixels(f32),
    Percent(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlignHorizontal {
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDecorationKind {
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAutoResize {
    /// Fixed box.
    None,
    /// Fixed width, height follows the wrapped lines.
    Height,
    /// Single line sized to its content.
    WidthAndHeight,
    /// Fixed box, overflowing text ends in an ellipsis.
    Truncate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub characters: String,
    pub font_name: FontName,
    pub font_size: f32,
    pub line_height: LineHeightValue,
    pub letter_spacing: f32,
    pub align: TextAlignHorizontal,
    pub decoration: TextDecorationKind,
    pub auto_resize: TextAutoResize,
}

/// One box in the target document.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub role: Role,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    // Geometry, relative to the parent.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,

    // Auto layout
    pub layout_mode: LayoutMode,
    pub sizing_horizontal: SizingMode,
    pub sizing_vertical: SizingMode,
    pub positioning: Positioning,
    pub primary_align: PrimaryAlign,
    pub counter_align: CounterAlign,
    pub wrap: bool,
    pub item_spacing: f32,
    pub counter_axis_spacing: f32,
    pub padding: Padding,

    // Paint
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weights: StrokeWeights,
    pub dash_pattern: Vec<f32>,
    pub effects: Vec<Effect>,
    pub corner_radii: CornerRadii,
    pub opacity: f32,
    pub visible: bool,
    /// Counter-clockwise degrees.
    pub rotation: f32,
    pub clips_content: bool,

    pub text: Option<TextData>,
}

impl Node {
    fn new(id: NodeId, name: String, kind: NodeKind) -> Self {
        let (width, height) = match kind {
            NodeKind::Frame => (100.0, 100.0),
            NodeKind::Text => (0.0, 0.0),
        };
        Self {
            id,
            name,
            kind,
            role: Role::Content,
            parent: None,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width,
            height,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            layout_mode: LayoutMode::None,
            sizing_horizontal: SizingMode::Fixed,
            sizing_vertical: SizingMode::Fixed,
            positioning: Positioning::Auto,
            primary_align: PrimaryAlign::Min,
            counter_align: CounterAlign::Min,
            wrap: false,
            item_spacing: 0.0,
            counter_axis_spacing: 0.0,
            padding: Padding::default(),
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weights: StrokeWeights::default(),
            dash_pattern: Vec::new(),
            effects: Vec::new(),
            corner_radii: CornerRadii::default(),
            opacity: 1.0,
            visible: true,
            rotation: 0.0,
            clips_content: false,
            text: None,
        }
    }

    pub fn sizing(&self, axis: Axis) -> SizingMode {
        match axis {
            Axis::Horizontal => self.sizing_horizontal,
            Axis::Vertical => self.sizing_vertical,
        }
    }

    pub fn size(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Arena of nodes. Node 0 is the canvas, a free-form root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut canvas = Node::new(NodeId(0), "Canvas".to_string(), NodeKind::Frame);
        canvas.width = 0.0;
        canvas.height = 0.0;
        Self {
            nodes: vec![canvas],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    fn get(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.nodes.get(id.0).ok_or(DocumentError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, DocumentError> {
        self.nodes.get_mut(id.0).ok_or(DocumentError::UnknownNode(id))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Pre-order list of `id` and all its descendants.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if !self.contains(next) {
                continue;
            }
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    pub fn find_by_name(&self, under: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(under)
            .into_iter()
            .find(|id| self.node(*id).is_some_and(|n| n.name == name))
    }

    // ---------------------------------------------------------------------
    // Creation and tree edits
    // ---------------------------------------------------------------------

    /// A detached 100×100 frame with no auto-layout.
    pub fn create_frame(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, name.into(), NodeKind::Frame));
        id
    }

    /// A detached text node sized to nothing until the caller resizes it.
    pub fn create_text(&mut self, name: impl Into<String>, text: TextData) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(id, name.into(), NodeKind::Text);
        node.text = Some(text);
        self.nodes.push(node);
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        let index = self.get(parent)?.children.len();
        self.insert_child(parent, index, child)
    }

    /// Insert `child` at `index` (clamped), moving it out of any previous
    /// parent.
    ///
    /// Appending into a FIXED space-between frame re-expands its primary axis
    /// to HUG; callers that need the fixed size must assert it again.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), DocumentError> {
        self.get(parent)?;
        self.get(child)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(DocumentError::Cycle(child));
        }
        if let Some(old) = self.get(child)?.parent {
            self.get_mut(old)?.children.retain(|c| *c != child);
        }
        let p = self.get_mut(parent)?;
        let index = index.min(p.children.len());
        p.children.insert(index, child);
        if let Some(axis) = p.layout_mode.primary_axis() {
            if p.primary_align == PrimaryAlign::SpaceBetween && p.sizing(axis) == SizingMode::Fixed
            {
                match axis {
                    Axis::Horizontal => p.sizing_horizontal = SizingMode::Hug,
                    Axis::Vertical => p.sizing_vertical = SizingMode::Hug,
                }
            }
        }
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Index of `child` among its parent's children.
    pub fn index_in_parent(&self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|c| *c == child)
    }

    fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        while let Some(p) = self.parent(node) {
            if p == ancestor {
                return true;
            }
            node = p;
        }
        false
    }

    // ---------------------------------------------------------------------
    // Sizing and positioning
    // ---------------------------------------------------------------------

    pub fn resize(&mut self, id: NodeId, width: f32, height: f32) -> Result<(), DocumentError> {
        let node = self.get_mut(id)?;
        node.width = width.max(0.0);
        node.height = height.max(0.0);
        Ok(())
    }

    pub fn set_layout_mode(&mut self, id: NodeId, mode: LayoutMode) -> Result<(), DocumentError> {
        let node = self.get_mut(id)?;
        node.layout_mode = mode;
        if mode == LayoutMode::None {
            // HUG has nothing to measure without auto-layout.
            if node.sizing_horizontal == SizingMode::Hug {
                node.sizing_horizontal = SizingMode::Fixed;
            }
            if node.sizing_vertical == SizingMode::Hug {
                node.sizing_vertical = SizingMode::Fixed;
            }
        }
        Ok(())
    }

    /// Declare the sizing behaviour of one axis.
    pub fn set_layout_sizing(
        &mut self,
        id: NodeId,
        axis: Axis,
        mode: SizingMode,
    ) -> Result<(), DocumentError> {
        let node = self.get(id)?;
        match mode {
            SizingMode::Fixed => {}
            SizingMode::Hug => {
                if !(node.is_text() || node.layout_mode.is_auto_layout()) {
                    return Err(DocumentError::HugUnsupported { node: id, axis });
                }
            }
            SizingMode::Fill => {
                let parent = node.parent.ok_or(DocumentError::NotAttached(id))?;
                if !self.get(parent)?.layout_mode.is_auto_layout() {
                    return Err(DocumentError::NotAutoLayout(id));
                }
            }
        }
        let node = self.get_mut(id)?;
        match axis {
            Axis::Horizontal => node.sizing_horizontal = mode,
            Axis::Vertical => node.sizing_vertical = mode,
        }
        Ok(())
    }

    pub fn set_positioning(
        &mut self,
        id: NodeId,
        positioning: Positioning,
    ) -> Result<(), DocumentError> {
        if positioning == Positioning::Absolute {
            let parent = self.get(id)?.parent.ok_or(DocumentError::NotAttached(id))?;
            if !self.get(parent)?.layout_mode.is_auto_layout() {
                return Err(DocumentError::NotAutoLayout(id));
            }
        }
        self.get_mut(id)?.positioning = positioning;
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, x: f32, y: f32) -> Result<(), DocumentError> {
        let node = self.get_mut(id)?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    pub fn set_alignment(
        &mut self,
        id: NodeId,
        primary: PrimaryAlign,
        counter: CounterAlign,
    ) -> Result<(), DocumentError> {
        let node = self.get_mut(id)?;
        node.primary_align = primary;
        node.counter_align = counter;
        Ok(())
    }

    pub fn set_padding(&mut self, id: NodeId, padding: Padding) -> Result<(), DocumentError> {
        self.get_mut(id)?.padding = padding;
        Ok(())
    }

    pub fn set_item_spacing(&mut self, id: NodeId, spacing: f32) -> Result<(), DocumentError> {
        self.get_mut(id)?.item_spacing = spacing;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    /// Resolve sizes and positions of the subtree at `id` and write them
    /// back. `available_width` bounds a FILL root; without it a FILL root
    /// keeps its current width.
    pub fn compute_layout(
        &mut self,
        id: NodeId,
        available_width: Option<f32>,
    ) -> Result<(), DocumentError> {
        self.get(id)?;
        let mut tree: TaffyTree<()> = TaffyTree::new();
        let mut mapping = Vec::new();
        let root = self.build_taffy(&mut tree, id, None, available_width, &mut mapping)?;
        tree.compute_layout(
            root,
            Size {
                width: AvailableSpace::MaxContent,
                height: AvailableSpace::MaxContent,
            },
        )
        .map_err(|e| DocumentError::Layout(e.to_string()))?;

        for (node_id, taffy_id) in mapping {
            let layout = *tree
                .layout(taffy_id)
                .map_err(|e| DocumentError::Layout(e.to_string()))?;
            let node = self.get_mut(node_id)?;
            node.width = layout.size.width;
            node.height = layout.size.height;
            if node_id != id {
                node.x = layout.location.x;
                node.y = layout.location.y;
            }
        }
        log::trace!("resolved layout of {id:?}");
        Ok(())
    }

    fn build_taffy(
        &self,
        tree: &mut TaffyTree<()>,
        id: NodeId,
        parent_mode: Option<LayoutMode>,
        available_width: Option<f32>,
        mapping: &mut Vec<(NodeId, taffy::NodeId)>,
    ) -> Result<taffy::NodeId, DocumentError> {
        let node = self.get(id)?;
        let style = self.taffy_style(node, parent_mode, available_width);
        let taffy_id = if node.is_text() || node.children.is_empty() {
            tree.new_leaf(style)
        } else {
            let mut kids = Vec::with_capacity(node.children.len());
            for child in &node.children {
                kids.push(self.build_taffy(
                    tree,
                    *child,
                    Some(node.layout_mode),
                    None,
                    mapping,
                )?);
            }
            tree.new_with_children(style, &kids)
        }
        .map_err(|e| DocumentError::Layout(e.to_string()))?;
        // Hidden boxes keep their own geometry.
        if node.visible {
            mapping.push((id, taffy_id));
        }
        Ok(taffy_id)
    }

    fn taffy_style(
        &self,
        node: &Node,
        parent_mode: Option<LayoutMode>,
        available_width: Option<f32>,
    ) -> taffy::Style {
        let mut ts = taffy::Style {
            display: taffy::Display::Flex,
            flex_shrink: 0.0,
            ..Default::default()
        };
        if !node.visible {
            ts.display = taffy::Display::None;
            return ts;
        }

        if let Some(axis) = node.layout_mode.primary_axis() {
            ts.flex_direction = match axis {
                Axis::Horizontal => FlexDirection::Row,
                Axis::Vertical => FlexDirection::Column,
            };
            ts.flex_wrap = if node.wrap {
                FlexWrap::Wrap
            } else {
                FlexWrap::NoWrap
            };
            ts.justify_content = Some(match node.primary_align {
                PrimaryAlign::Min => JustifyContent::Start,
                PrimaryAlign::Center => JustifyContent::Center,
                PrimaryAlign::Max => JustifyContent::End,
                PrimaryAlign::SpaceBetween => JustifyContent::SpaceBetween,
            });
            ts.align_items = Some(match node.counter_align {
                CounterAlign::Min => AlignItems::Start,
                CounterAlign::Center => AlignItems::Center,
                CounterAlign::Max => AlignItems::End,
                CounterAlign::Baseline => AlignItems::Baseline,
            });
            ts.align_content = Some(taffy::AlignContent::Start);
            let (main, cross) = (
                LengthPercentage::Length(node.item_spacing),
                LengthPercentage::Length(node.counter_axis_spacing),
            );
            ts.gap = match axis {
                Axis::Horizontal => Size {
                    width: main,
                    height: cross,
                },
                Axis::Vertical => Size {
                    width: cross,
                    height: main,
                },
            };
            ts.padding = Rect {
                top: LengthPercentage::Length(node.padding.top),
                right: LengthPercentage::Length(node.padding.right),
                bottom: LengthPercentage::Length(node.padding.bottom),
                left: LengthPercentage::Length(node.padding.left),
            };
        }

        // Children of a free-form frame, and absolute children, sit at x/y.
        let in_flow = match parent_mode {
            Some(mode) => mode.is_auto_layout() && node.positioning == Positioning::Auto,
            None => true,
        };
        if !in_flow {
            ts.position = taffy::Position::Absolute;
            ts.inset = Rect {
                left: LengthPercentageAuto::Length(node.x),
                top: LengthPercentageAuto::Length(node.y),
                right: LengthPercentageAuto::Auto,
                bottom: LengthPercentageAuto::Auto,
            };
        }
        let parent_axis = parent_mode
            .filter(|_| in_flow)
            .and_then(LayoutMode::primary_axis);

        for axis in [Axis::Horizontal, Axis::Vertical] {
            let current = Dimension::Length(node.size(axis));
            let dim = match node.sizing(axis) {
                SizingMode::Fixed => current,
                // Text is measured by the caller; its box is always known.
                SizingMode::Hug if node.is_text() => current,
                SizingMode::Hug => Dimension::Auto,
                SizingMode::Fill => match parent_axis {
                    Some(main) if main == axis => {
                        ts.flex_grow = 1.0;
                        ts.flex_basis = Dimension::Length(0.0);
                        Dimension::Auto
                    }
                    Some(_) => {
                        ts.align_self = Some(AlignItems::Stretch);
                        Dimension::Auto
                    }
                    None => match (parent_mode, axis, available_width) {
                        (None, Axis::Horizontal, Some(w)) => Dimension::Length(w),
                        _ => current,
                    },
                },
            };
            let (min, max) = match axis {
                Axis::Horizontal => (node.min_width, node.max_width),
                Axis::Vertical => (node.min_height, node.max_height),
            };
            let min = match (node.sizing(axis), parent_axis) {
                (SizingMode::Fill, Some(main)) if main == axis => {
                    Dimension::Length(min.unwrap_or(0.0))
                }
                _ => min.map(Dimension::Length).unwrap_or(Dimension::Auto),
            };
            let max = max.map(Dimension::Length).unwrap_or(Dimension::Auto);
            match axis {
                Axis::Horizontal => {
                    ts.size.width = dim;
                    ts.min_size.width = min;
                    ts.max_size.width = max;
                }
                Axis::Vertical => {
                    ts.size.height = dim;
                    ts.min_size.height = min;
                    ts.max_size.height = max;
                }
            }
        }
        ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto_frame(doc: &mut Document, mode: LayoutMode) -> NodeId {
        let id = doc.create_frame("frame");
        doc.set_layout_mode(id, mode).unwrap();
        id
    }

    #[test]
    fn fill_requires_attachment_and_auto_layout() {
        let mut doc = Document::new();
        let parent = auto_frame(&mut doc, LayoutMode::Vertical);
        let child = doc.create_frame("child");
        assert_eq!(
            doc.set_layout_sizing(child, Axis::Horizontal, SizingMode::Fill),
            Err(DocumentError::NotAttached(child))
        );
        doc.append_child(parent, child).unwrap();
        assert!(doc
            .set_layout_sizing(child, Axis::Horizontal, SizingMode::Fill)
            .is_ok());

        let free = doc.create_frame("free");
        let orphan = doc.create_frame("orphan");
        doc.append_child(free, orphan).unwrap();
        assert_eq!(
            doc.set_layout_sizing(orphan, Axis::Horizontal, SizingMode::Fill),
            Err(DocumentError::NotAutoLayout(orphan))
        );
    }

    #[test]
    fn hug_requires_auto_layout_frame() {
        let mut doc = Document::new();
        let plain = doc.create_frame("plain");
        assert!(matches!(
            doc.set_layout_sizing(plain, Axis::Vertical, SizingMode::Hug),
            Err(DocumentError::HugUnsupported { .. })
        ));
        let auto = auto_frame(&mut doc, LayoutMode::Horizontal);
        assert!(doc
            .set_layout_sizing(auto, Axis::Vertical, SizingMode::Hug)
            .is_ok());
    }

    #[test]
    fn appending_into_fixed_space_between_rehugs() {
        let mut doc = Document::new();
        let row = auto_frame(&mut doc, LayoutMode::Horizontal);
        doc.set_alignment(row, PrimaryAlign::SpaceBetween, CounterAlign::Min)
            .unwrap();
        let child = doc.create_frame("a");
        doc.append_child(row, child).unwrap();
        assert_eq!(doc.node(row).unwrap().sizing_horizontal, SizingMode::Hug);
        assert_eq!(doc.node(row).unwrap().sizing_vertical, SizingMode::Fixed);
    }

    #[test]
    fn reparenting_moves_and_rejects_cycles() {
        let mut doc = Document::new();
        let a = doc.create_frame("a");
        let b = doc.create_frame("b");
        let c = doc.create_frame("c");
        doc.append_child(a, c).unwrap();
        doc.append_child(b, c).unwrap();
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[c]);
        assert_eq!(doc.append_child(c, b), Err(DocumentError::Cycle(c)));
        doc.append_child(c, a).unwrap();
        assert_eq!(doc.append_child(a, b), Err(DocumentError::Cycle(a)));
    }

    #[test]
    fn absolute_needs_auto_layout_parent() {
        let mut doc = Document::new();
        let child = doc.create_frame("child");
        assert_eq!(
            doc.set_positioning(child, Positioning::Absolute),
            Err(DocumentError::NotAttached(child))
        );
        let col = auto_frame(&mut doc, LayoutMode::Vertical);
        doc.append_child(col, child).unwrap();
        assert!(doc.set_positioning(child, Positioning::Absolute).is_ok());
    }

    #[test]
    fn hug_column_resolves_from_children() {
        let mut doc = Document::new();
        let col = auto_frame(&mut doc, LayoutMode::Vertical);
        doc.set_padding(
            col,
            Padding {
                top: 10.0,
                right: 10.0,
                bottom: 10.0,
                left: 10.0,
            },
        )
        .unwrap();
        doc.set_item_spacing(col, 5.0).unwrap();
        let a = doc.create_frame("a");
        let b = doc.create_frame("b");
        doc.resize(a, 50.0, 20.0).unwrap();
        doc.resize(b, 80.0, 30.0).unwrap();
        doc.append_child(col, a).unwrap();
        doc.append_child(col, b).unwrap();
        doc.set_layout_sizing(col, Axis::Horizontal, SizingMode::Hug)
            .unwrap();
        doc.set_layout_sizing(col, Axis::Vertical, SizingMode::Hug)
            .unwrap();
        doc.compute_layout(col, None).unwrap();

        let n = doc.node(col).unwrap();
        assert_eq!((n.width, n.height), (100.0, 75.0));
        let b = doc.node(b).unwrap();
        assert_eq!((b.x, b.y), (10.0, 35.0));
    }

    #[test]
    fn fill_children_share_the_main_axis() {
        let mut doc = Document::new();
        let row = auto_frame(&mut doc, LayoutMode::Horizontal);
        doc.resize(row, 300.0, 50.0).unwrap();
        let fixed = doc.create_frame("fixed");
        doc.resize(fixed, 100.0, 10.0).unwrap();
        doc.append_child(row, fixed).unwrap();
        let fill = doc.create_frame("fill");
        doc.append_child(row, fill).unwrap();
        doc.set_layout_sizing(fill, Axis::Horizontal, SizingMode::Fill)
            .unwrap();
        doc.set_layout_sizing(fill, Axis::Vertical, SizingMode::Fill)
            .unwrap();
        doc.compute_layout(row, None).unwrap();
        let f = doc.node(fill).unwrap();
        assert_eq!((f.x, f.width, f.height), (100.0, 200.0, 50.0));
    }

    #[test]
    fn absolute_children_keep_their_offsets() {
        let mut doc = Document::new();
        let col = auto_frame(&mut doc, LayoutMode::Vertical);
        doc.resize(col, 200.0, 200.0).unwrap();
        let flow = doc.create_frame("flow");
        let abs = doc.create_frame("abs");
        doc.append_child(col, flow).unwrap();
        doc.append_child(col, abs).unwrap();
        doc.set_positioning(abs, Positioning::Absolute).unwrap();
        doc.set_position(abs, 30.0, 40.0).unwrap();
        doc.compute_layout(col, None).unwrap();
        let a = doc.node(abs).unwrap();
        assert_eq!((a.x, a.y), (30.0, 40.0));
        assert_eq!(doc.node(flow).unwrap().y, 0.0);
    }

    #[test]
    fn hidden_nodes_skip_layout() {
        let mut doc = Document::new();
        let col = auto_frame(&mut doc, LayoutMode::Vertical);
        let hidden = doc.create_frame("hidden");
        doc.node_mut(hidden).unwrap().visible = false;
        let shown = doc.create_frame("shown");
        doc.append_child(col, hidden).unwrap();
        doc.append_child(col, shown).unwrap();
        doc.set_layout_sizing(col, Axis::Vertical, SizingMode::Hug)
            .unwrap();
        doc.compute_layout(col, None).unwrap();
        assert_eq!(doc.node(col).unwrap().height, 100.0);
        assert_eq!(doc.node(shown).unwrap().y, 0.0);
        assert_eq!(doc.node(hidden).unwrap().width, 100.0);
    }
}
