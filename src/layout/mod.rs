//! Layout synthesis: element tree → auto-layout boxes in a [`Document`].
//!
//! Each element becomes a frame or a text node. Sizing is decided per axis
//! before attachment and applied right after it; margins turn into spacers
//! and wrappers; weighted flex growth, out-of-flow stacking and relative
//! offsets are resolved once a container's children are in place.

use std::collections::HashMap;

use log::{debug, trace, warn};
use serde::Serialize;

use crate::document::{
    Axis, CounterAlign, Document, NodeId, Padding, Paint, Positioning, PrimaryAlign,
    Role, SizingMode, TextAutoResize, TextData,
};
use crate::dom::Tag;
use crate::error::{DocumentError, SynthesisError};
use crate::fonts::{FontName, FontProvider, DEFAULT_FAMILY};
use crate::stacking::{self, Placement, StackOrder};
use crate::style::{
    AlignItems, Dimension, Display, Element, FlexWrap, JustifyContent, Style, TextAlign,
};
use crate::text::{self, TextDefaults, TextSpec};
use crate::values::Color;

mod flex;
mod margins;
pub mod paint;
mod sizing;

use flex::{FlexItem, FlexLedger};
use sizing::IntendedSize;
pub use sizing::{PendingSizing, SizeIntent};

/// Fill of replaced elements that paint nothing themselves.
const REPLACED_PLACEHOLDER: Color = Color {
    r: 0.85,
    g: 0.85,
    b: 0.85,
    a: 1.0,
};

/// Longest text-node name taken from its characters.
const TEXT_NAME_LEN: usize = 40;

// ---------------------------------------------------------------------------
// Public surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Name of the top-level box.
    pub name: String,
    /// Where to attach; the canvas when `None`.
    pub parent: Option<NodeId>,
    /// Width the top level lays out against.
    pub viewport_width: Option<f32>,
    pub default_font_family: String,
    pub default_font_size: f32,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            name: "Frame".to_string(),
            parent: None,
            viewport_width: None,
            default_font_family: DEFAULT_FAMILY.to_string(),
            default_font_size: 16.0,
        }
    }
}

/// The top-level box of a synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedFrame {
    pub id: NodeId,
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// Leaf-local problems that were worked around (font fallbacks).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Build boxes for `elements` under `options.parent` (or the canvas).
///
/// A single top-level element becomes the returned box; several are
/// gathered in a vertical frame. Nothing is created when there is nothing
/// to render.
pub fn synthesize(
    doc: &mut Document,
    elements: &[Element],
    options: &SynthesisOptions,
    fonts: &mut dyn FontProvider,
) -> Result<SynthesizedFrame, SynthesisError> {
    let renderable: Vec<&Element> = elements.iter().filter(|e| !e.is_skipped()).collect();
    if renderable.is_empty() {
        return Err(SynthesisError::NoElements);
    }
    let parent = options.parent.unwrap_or_else(|| doc.root());
    let Some(parent_node) = doc.node(parent) else {
        return Err(SynthesisError::UnknownParent(parent));
    };

    let content_w = if parent == doc.root() || parent_node.sizing_horizontal != SizingMode::Fixed {
        options.viewport_width
    } else {
        Some((parent_node.width - parent_node.padding.along(Axis::Horizontal)).max(0.0))
    };
    let ctx = ParentContext {
        id: parent,
        axis: parent_node.layout_mode.primary_axis(),
        content: (content_w, None),
        available_width: content_w,
        align_items: None,
        text_color: None,
        style: None,
    };

    let gathered;
    let top: &Element = if renderable.len() == 1 {
        renderable[0]
    } else {
        let mut root = Element::new(Tag::Div).named(options.name.clone());
        root.style.width = Some(options.viewport_width.map_or(Dimension::Auto, Dimension::Px));
        root.children = renderable.iter().map(|e| (*e).clone()).collect();
        gathered = root;
        &gathered
    };

    let mut synth = Synthesizer::new(doc, fonts, options);
    let placed = synth
        .process_element(top, &ctx, Attach::Flow, ctx.available_width)
        .ok_or(SynthesisError::NoElements)?;
    let warnings = std::mem::take(&mut synth.warnings);

    if let Some(node) = doc.node_mut(placed.node) {
        node.name = options.name.clone();
    }
    if let Err(e) = doc.compute_layout(placed.node, options.viewport_width) {
        warn!("final layout of {:?} failed: {e}", placed.node);
    }
    let node = doc
        .node(placed.node)
        .ok_or(SynthesisError::UnknownParent(placed.node))?;
    debug!(
        "synthesized {:?} '{}' {}x{}",
        node.id, node.name, node.width, node.height
    );
    Ok(SynthesizedFrame {
        id: node.id,
        name: node.name.clone(),
        width: node.width,
        height: node.height,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Synthesizer state
// ---------------------------------------------------------------------------

/// Whether a box takes part in its parent's flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    InFlow,
    OutOfFlow,
}

#[derive(Debug, Clone, Copy)]
enum Attach {
    /// Append with margins emulated.
    Flow,
    /// Insert at a child index, for out-of-flow boxes.
    At(usize),
}

/// A created box and the node that holds its place in the parent (itself,
/// or a margin wrapper).
#[derive(Debug, Clone, Copy)]
struct Placed {
    node: NodeId,
    slot: NodeId,
}

/// What a child needs to know about the box it goes into.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParentContext<'e> {
    pub id: NodeId,
    pub axis: Option<Axis>,
    /// Definite content size, where known.
    pub content: (Option<f32>, Option<f32>),
    /// Width text may wrap against. Hugging boxes pass their ancestor's on.
    pub available_width: Option<f32>,
    pub align_items: Option<AlignItems>,
    /// Inherited text colour.
    pub text_color: Option<Color>,
    /// Typography for anonymous text runs.
    pub style: Option<&'e Style>,
}

impl ParentContext<'_> {
    pub fn content(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.content.0,
            Axis::Vertical => self.content.1,
        }
    }
}

/// Per-box bookkeeping kept outside the document.
#[derive(Debug, Default)]
struct SideTables {
    /// Intents waiting for attachment.
    pending: HashMap<NodeId, PendingSizing>,
    /// Intents as applied.
    applied: HashMap<NodeId, PendingSizing>,
    intended: HashMap<NodeId, IntendedSize>,
    ledgers: HashMap<NodeId, FlexLedger>,
    /// Typography of text leaves, for re-wrapping.
    text: HashMap<NodeId, TextSpec>,
}

pub(crate) struct Synthesizer<'a> {
    doc: &'a mut Document,
    fonts: &'a mut dyn FontProvider,
    defaults: TextDefaults,
    tables: SideTables,
    warnings: Vec<String>,
}

/// Document calls here are advisory: a refusal is logged and synthesis
/// carries on with what the target accepted.
pub(crate) fn advisory(result: Result<(), DocumentError>) {
    if let Err(e) = result {
        trace!("{e}");
    }
}

fn text_name(characters: &str) -> String {
    characters.chars().take(TEXT_NAME_LEN).collect()
}

impl<'a> Synthesizer<'a> {
    fn new(
        doc: &'a mut Document,
        fonts: &'a mut dyn FontProvider,
        options: &SynthesisOptions,
    ) -> Self {
        Self {
            doc,
            fonts,
            defaults: TextDefaults {
                font_family: options.default_font_family.clone(),
                font_size: options.default_font_size,
            },
            tables: SideTables::default(),
            warnings: Vec::new(),
        }
    }

    fn process_element(
        &mut self,
        el: &Element,
        ctx: &ParentContext,
        attach: Attach,
        available: Option<f32>,
    ) -> Option<Placed> {
        if el.is_skipped() {
            return None;
        }
        let flow = match attach {
            Attach::Flow => Flow::InFlow,
            Attach::At(_) => Flow::OutOfFlow,
        };
        let is_leaf = text::is_text_leaf(el);
        let id = if is_leaf {
            self.create_leaf(el, ctx, flow, available)?
        } else {
            self.create_box(el, ctx, flow)
        };

        let slot = match attach {
            Attach::Flow => self.attach_in_flow(el, id, ctx),
            Attach::At(index) => {
                advisory(self.doc.insert_child(ctx.id, index, id));
                id
            }
        };
        self.apply_pending(id);

        if let (Flow::InFlow, Some(main)) = (flow, ctx.axis) {
            if let Some(weight) = el.style.flex_grow.filter(|g| *g > 0.0) {
                let basis = sizing::growth_basis(el, main, ctx, flow);
                self.register_flex(
                    ctx.id,
                    main,
                    FlexItem {
                        node: slot,
                        weight,
                        basis,
                    },
                );
            }
        }
        if !is_leaf {
            self.synthesize_children(el, id, ctx, available);
        }
        debug!(
            "{} {id:?} in {:?}: {:?}",
            el.name,
            ctx.id,
            self.tables.applied.get(&id)
        );
        Some(Placed { node: id, slot })
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    fn create_box(&mut self, el: &Element, ctx: &ParentContext, flow: Flow) -> NodeId {
        let style = &el.style;
        let id = self.doc.create_frame(el.name.clone());
        let mode = sizing::layout_mode_for(el);
        advisory(self.doc.set_layout_mode(id, mode));

        let p = style.padding.resolved();
        advisory(self.doc.set_padding(
            id,
            Padding {
                top: p.top,
                right: p.right,
                bottom: p.bottom,
                left: p.left,
            },
        ));

        if let Some(axis) = mode.primary_axis() {
            let (main_gap, cross_gap) = match axis {
                Axis::Horizontal => (style.column_gap, style.row_gap),
                Axis::Vertical => (style.row_gap, style.column_gap),
            };
            advisory(self.doc.set_item_spacing(id, main_gap.unwrap_or(0.0)));
            let primary = match style.justify_content {
                Some(JustifyContent::Center) => PrimaryAlign::Center,
                Some(JustifyContent::End) => PrimaryAlign::Max,
                Some(JustifyContent::SpaceBetween) => PrimaryAlign::SpaceBetween,
                _ => PrimaryAlign::Min,
            };
            let counter = match style.align_items {
                Some(AlignItems::Center) => CounterAlign::Center,
                Some(AlignItems::End) => CounterAlign::Max,
                Some(AlignItems::Baseline) => CounterAlign::Baseline,
                Some(AlignItems::Start | AlignItems::Stretch) => CounterAlign::Min,
                // Inline content follows text-align.
                None if axis == Axis::Vertical => match style.text_align {
                    Some(TextAlign::Center) => CounterAlign::Center,
                    Some(TextAlign::Right) => CounterAlign::Max,
                    _ => CounterAlign::Min,
                },
                None => CounterAlign::Min,
            };
            advisory(self.doc.set_alignment(id, primary, counter));
            if let Some(node) = self.doc.node_mut(id) {
                node.wrap = axis == Axis::Horizontal && style.flex_wrap == Some(FlexWrap::Wrap);
                node.counter_axis_spacing = if node.wrap {
                    cross_gap.unwrap_or(0.0)
                } else {
                    0.0
                };
            }
        }

        if let Some(node) = self.doc.node_mut(id) {
            (node.min_width, node.max_width) = sizing::outer_bounds(style, Axis::Horizontal);
            (node.min_height, node.max_height) = sizing::outer_bounds(style, Axis::Vertical);
        }

        let pending = sizing::resolve_box_intents(el, ctx, flow);
        self.record_intended(id, &pending, ctx);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if let Some(v) = pending.fixed(axis) {
                self.resize_axis(id, axis, v);
            }
        }

        let size = (
            self.intended(id, Axis::Horizontal),
            self.intended(id, Axis::Vertical),
        );
        paint::apply_box_paint(self.doc, id, style, style.color.or(ctx.text_color), size);
        if el.is_replaced() {
            if let Some(node) = self.doc.node_mut(id) {
                if node.fills.is_empty() {
                    node.fills.push(Paint::Solid {
                        color: REPLACED_PLACEHOLDER,
                    });
                }
            }
        }
        self.tables.pending.insert(id, pending);
        id
    }

    fn synthesize_children(
        &mut self,
        el: &Element,
        id: NodeId,
        ctx: &ParentContext,
        available: Option<f32>,
    ) {
        let Some(node) = self.doc.node(id) else {
            return;
        };
        let axis = node.layout_mode.primary_axis();
        let gap = node.item_spacing;
        let pad_h = node.padding.along(Axis::Horizontal);
        let pad_v = node.padding.along(Axis::Vertical);
        let content_w = self.intended(id, Axis::Horizontal).map(|w| (w - pad_h).max(0.0));
        let content_h = self.intended(id, Axis::Vertical).map(|h| (h - pad_v).max(0.0));
        let own_available = content_w.or(available.map(|a| (a - pad_h).max(0.0)));

        let child_ctx = ParentContext {
            id,
            axis,
            content: (content_w, content_h),
            available_width: own_available,
            align_items: el.style.align_items,
            text_color: el.style.color.or(ctx.text_color),
            style: Some(&el.style),
        };

        // Direct text of a painted box becomes its single text child.
        if let Some(t) = el.text.as_deref().filter(|t| !t.trim().is_empty()) {
            let mut run = Element::text_run(t);
            let hugs = self
                .tables
                .applied
                .get(&id)
                .is_some_and(|p| p.horizontal == SizeIntent::Hug);
            if !hugs {
                run.style.display = Some(Display::Block);
            }
            self.process_element(&run, &child_ctx, Attach::Flow, own_available);
        }

        let (flow, out_of_flow) = stacking::partition(&el.children);
        let n = flow.len();
        let child_available = match axis {
            Some(Axis::Horizontal) if n > 0 => own_available
                .map(|w| ((w - gap * (n - 1) as f32) / n as f32).max(0.0)),
            _ => own_available,
        };

        let mut shifted = Vec::new();
        for i in flow {
            let child = &el.children[i];
            let placed = self.process_element(child, &child_ctx, Attach::Flow, child_available);
            let Some(placed) = placed else {
                continue;
            };
            let translate = child
                .style
                .transform
                .map_or((0.0, 0.0), |t| (t.translate_x, t.translate_y));
            let container = (content_w.unwrap_or(0.0), content_h.unwrap_or(0.0));
            let shift = stacking::relative_shift(
                child.style.position,
                &child.style.inset,
                translate,
                container,
            );
            if let Some(shift) = shift {
                shifted.push((placed.slot, shift));
            }
        }

        self.distribute(id);
        if let Some(justify) = el.style.justify_content {
            self.distribute_around(id, justify);
        }
        if !out_of_flow.is_empty() {
            self.place_out_of_flow(el, id, &out_of_flow, &child_ctx);
        }
        for (child, shift) in shifted {
            self.offset_relative(id, child, shift);
        }
        self.restore_space_between(id);
    }

    // -----------------------------------------------------------------------
    // Text leaves
    // -----------------------------------------------------------------------

    fn create_leaf(
        &mut self,
        el: &Element,
        ctx: &ParentContext,
        flow: Flow,
        available: Option<f32>,
    ) -> Option<NodeId> {
        let raw = el.text.as_deref()?;
        let typography = match ctx.style {
            Some(parent) if el.tag == Tag::Text => parent,
            _ => &el.style,
        };
        let color = el.style.color.or(ctx.text_color);
        let mut spec = text::text_spec(raw, typography, color, &self.defaults);
        if spec.characters.is_empty() {
            return None;
        }
        let family = &self.defaults.font_family;
        spec.font_name = match text::load_with_fallback(&mut *self.fonts, &spec.font_name, family) {
            Ok(name) => name,
            Err(e) => {
                warn!("{e}; measuring with {family} Regular");
                self.warnings.push(e.to_string());
                FontName::regular(family.clone())
            }
        };

        // Block text fills a column of known width; elsewhere it hugs.
        let fills_width = flow == Flow::InFlow
            && !el.is_inline_level()
            && ctx.axis == Some(Axis::Vertical)
            && ctx.content.0.is_some();
        let width = if fills_width { ctx.content.0 } else { None };
        let geometry = text::measure_leaf(&spec, &*self.fonts, width, available);
        let auto_resize = match geometry.auto_resize {
            TextAutoResize::WidthAndHeight if fills_width => TextAutoResize::Height,
            other => other,
        };

        let name = if el.tag == Tag::Text {
            text_name(&geometry.characters)
        } else {
            el.name.clone()
        };
        let id = self.doc.create_text(
            name,
            TextData {
                characters: geometry.characters.clone(),
                font_name: spec.font_name.clone(),
                font_size: spec.font_size,
                line_height: text::line_height_value(spec.line_height),
                letter_spacing: spec.letter_spacing,
                align: spec.align,
                decoration: spec.decoration,
                auto_resize,
            },
        );
        advisory(self.doc.resize(id, geometry.width, geometry.height));
        if let Some(node) = self.doc.node_mut(id) {
            node.fills = vec![Paint::Solid { color: spec.color }];
        }
        paint::apply_common_paint(self.doc, id, &el.style);

        let mut pending = PendingSizing {
            horizontal: if fills_width {
                SizeIntent::Fill
            } else if geometry.auto_resize == TextAutoResize::WidthAndHeight {
                SizeIntent::Hug
            } else {
                SizeIntent::Fixed(geometry.width)
            },
            vertical: if geometry.auto_resize == TextAutoResize::Truncate {
                SizeIntent::Fixed(geometry.height)
            } else {
                SizeIntent::Hug
            },
        };
        let mut intended = IntendedSize {
            width: Some(geometry.width),
            height: Some(geometry.height),
        };
        if let (Flow::InFlow, Some(main)) = (flow, ctx.axis) {
            if el.style.flex_grow.is_some_and(|g| g > 0.0) {
                pending.set(main, SizeIntent::Fill);
                intended.set(main, None);
            }
        }
        trace!("text '{}' {:?}", text_name(&geometry.characters), geometry.auto_resize);
        self.tables.intended.insert(id, intended);
        self.tables.text.insert(id, spec);
        self.tables.pending.insert(id, pending);
        Some(id)
    }

    // -----------------------------------------------------------------------
    // Positioned boxes
    // -----------------------------------------------------------------------

    /// Insert out-of-flow children by stacking order and place them against
    /// the container's resolved box.
    fn place_out_of_flow(
        &mut self,
        el: &Element,
        container: NodeId,
        indices: &[usize],
        ctx: &ParentContext,
    ) {
        advisory(
            self.doc
                .compute_layout(container, self.intended(container, Axis::Horizontal)),
        );
        let Some(node) = self.doc.node(container) else {
            return;
        };
        let (w, h) = (node.width, node.height);
        let oof_ctx = ParentContext {
            content: (Some(w), Some(h)),
            available_width: Some(w),
            ..*ctx
        };

        let mut order = StackOrder::default();
        for &i in indices {
            let child = &el.children[i];
            let z = child.style.z_index.unwrap_or(0);
            let at = order.insertion_index(z, self.doc.children(container).len());
            let Some(placed) = self.process_element(child, &oof_ctx, Attach::At(at), Some(w)) else {
                continue;
            };
            order.record(z);
            self.place_absolute(&child.style, placed.node, (w, h));
        }
    }

    fn place_absolute(&mut self, style: &Style, id: NodeId, container: (f32, f32)) {
        advisory(self.doc.set_positioning(id, Positioning::Absolute));
        if self.doc.node(id).is_some_and(|n| !n.is_text()) {
            advisory(self.doc.compute_layout(id, None));
        }
        let Some(node) = self.doc.node(id) else {
            return;
        };
        let (own_w, own_h) = (node.width, node.height);
        let explicit =
            |d: Option<Dimension>| matches!(d, Some(Dimension::Px(_) | Dimension::Percent(_)));
        let horizontal = stacking::place_axis(
            style.inset.left,
            style.inset.right,
            container.0,
            explicit(style.width),
        );
        let vertical = stacking::place_axis(
            style.inset.top,
            style.inset.bottom,
            container.1,
            explicit(style.height),
        );
        let (x, width) = horizontal.resolve(own_w, container.0);
        let (y, height) = vertical.resolve(own_h, container.1);
        for (axis, placement, size) in [
            (Axis::Horizontal, horizontal, width),
            (Axis::Vertical, vertical, height),
        ] {
            if matches!(placement, Placement::Stretch { .. }) {
                self.resize_axis(id, axis, size);
                advisory(self.doc.set_layout_sizing(id, axis, SizingMode::Fixed));
                self.refit(id, axis, size);
            }
        }
        advisory(self.doc.set_position(id, x, y));
        trace!("{id:?} placed at ({x}, {y}) {width}x{height}");
    }

    /// Move a relatively offset box out of the flow, leaving a same-size
    /// placeholder in its slot.
    fn offset_relative(&mut self, container: NodeId, child: NodeId, (dx, dy): (f32, f32)) {
        advisory(
            self.doc
                .compute_layout(container, self.intended(container, Axis::Horizontal)),
        );
        let (Some(parent), Some(index)) = (self.doc.parent(child), self.doc.index_in_parent(child))
        else {
            return;
        };
        let Some(node) = self.doc.node(child) else {
            return;
        };
        let (x, y, w, h) = (node.x, node.y, node.width, node.height);
        let sizing = [
            (Axis::Horizontal, node.sizing_horizontal),
            (Axis::Vertical, node.sizing_vertical),
        ];
        let name = format!("{} placeholder", node.name);
        let parent_is_auto = self
            .doc
            .node(parent)
            .is_some_and(|p| p.layout_mode.is_auto_layout());
        if !parent_is_auto {
            advisory(self.doc.set_position(child, x + dx, y + dy));
            return;
        }

        let placeholder = self.doc.create_frame(name);
        if let Some(p) = self.doc.node_mut(placeholder) {
            p.role = Role::Placeholder;
        }
        advisory(self.doc.resize(placeholder, w, h));
        advisory(self.doc.insert_child(parent, index, placeholder));
        for (axis, mode) in sizing {
            let mode = if mode == SizingMode::Fill {
                SizingMode::Fill
            } else {
                SizingMode::Fixed
            };
            advisory(self.doc.set_layout_sizing(placeholder, axis, mode));
        }
        self.set_intended(placeholder, Axis::Horizontal, w);
        self.set_intended(placeholder, Axis::Vertical, h);
        if let Some(ledger) = self.tables.ledgers.get_mut(&parent) {
            ledger.substitute(child, placeholder);
        }

        advisory(self.doc.append_child(parent, child));
        advisory(self.doc.set_positioning(child, Positioning::Absolute));
        for axis in [Axis::Horizontal, Axis::Vertical] {
            advisory(self.doc.set_layout_sizing(child, axis, SizingMode::Fixed));
        }
        advisory(self.doc.set_position(child, x + dx, y + dy));
        trace!("{child:?} shifted by ({dx}, {dy})");
    }
}
