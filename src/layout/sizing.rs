//! Per-axis sizing intents.
//!
//! An intent is decided before the box is attached (so FIXED sizes can be
//! applied right away) and the rest is applied by [`Synthesizer::apply_pending`]
//! right after attachment, when HUG and FILL become legal.

use crate::document::{Axis, LayoutMode, NodeId, SizingMode};
use crate::style::{AlignItems, BoxSizing, Dimension, Display, Element, FlexDirection, Style};

use super::{advisory, Flow, ParentContext, Synthesizer};

/// Size of replaced elements (images, embeds) that declare none.
const DEFAULT_REPLACED_SIZE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeIntent {
    Fixed(f32),
    Hug,
    Fill,
}

/// Sizing waiting for attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSizing {
    pub horizontal: SizeIntent,
    pub vertical: SizeIntent,
}

impl PendingSizing {
    pub fn get(&self, axis: Axis) -> SizeIntent {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn set(&mut self, axis: Axis, intent: SizeIntent) {
        match axis {
            Axis::Horizontal => self.horizontal = intent,
            Axis::Vertical => self.vertical = intent,
        }
    }

    pub fn fixed(&self, axis: Axis) -> Option<f32> {
        match self.get(axis) {
            SizeIntent::Fixed(v) => Some(v),
            _ => None,
        }
    }
}

/// Known sizes of a box, filled in as they become known.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct IntendedSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl IntendedSize {
    pub fn get(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn set(&mut self, axis: Axis, value: Option<f32>) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }
}

/// Auto-layout direction of an element's box.
pub(crate) fn layout_mode_for(el: &Element) -> LayoutMode {
    if el.is_replaced() {
        return LayoutMode::None;
    }
    match el.display() {
        Display::Flex | Display::InlineFlex => match el.style.flex_direction {
            Some(FlexDirection::Column) => LayoutMode::Vertical,
            _ => LayoutMode::Horizontal,
        },
        Display::Inline => {
            if el.children.is_empty() && el.text.is_none() {
                LayoutMode::None
            } else {
                LayoutMode::Vertical
            }
        }
        Display::Block | Display::InlineBlock | Display::Grid | Display::None => {
            LayoutMode::Vertical
        }
    }
}

fn dimension(style: &Style, axis: Axis) -> Option<Dimension> {
    match axis {
        Axis::Horizontal => style.width,
        Axis::Vertical => style.height,
    }
}

fn padding_along(style: &Style, axis: Axis) -> f32 {
    let p = style.padding.resolved();
    match axis {
        Axis::Horizontal => p.left + p.right,
        Axis::Vertical => p.top + p.bottom,
    }
}

/// Content size to outer size, clamped by min/max.
fn outer_size(style: &Style, axis: Axis, content: f32) -> f32 {
    let (min, max) = match axis {
        Axis::Horizontal => (style.min_width, style.max_width),
        Axis::Vertical => (style.min_height, style.max_height),
    };
    let pad = padding_along(style, axis);
    let mut v = content;
    if let Some(max) = max {
        v = v.min(max);
    }
    if let Some(min) = min {
        v = v.max(min);
    }
    match style.box_sizing {
        Some(BoxSizing::BorderBox) => v.max(pad),
        _ => v + pad,
    }
}

/// Outer min/max bounds to hand to the target for FILL boxes.
pub(crate) fn outer_bounds(style: &Style, axis: Axis) -> (Option<f32>, Option<f32>) {
    let (min, max) = match axis {
        Axis::Horizontal => (style.min_width, style.max_width),
        Axis::Vertical => (style.min_height, style.max_height),
    };
    let pad = match style.box_sizing {
        Some(BoxSizing::BorderBox) => 0.0,
        _ => padding_along(style, axis),
    };
    (min.map(|v| v + pad), max.map(|v| v + pad))
}

/// Intent of one axis from the element's own declarations.
fn declared_intent(el: &Element, axis: Axis, ctx: &ParentContext, flow: Flow) -> SizeIntent {
    let style = &el.style;
    match dimension(style, axis) {
        Some(Dimension::Px(v)) => SizeIntent::Fixed(outer_size(style, axis, v)),
        Some(Dimension::Fill) => SizeIntent::Fill,
        Some(Dimension::Percent(p)) if (p - 100.0).abs() < f32::EPSILON => SizeIntent::Fill,
        Some(Dimension::Percent(p)) => match ctx.content(axis) {
            Some(c) => SizeIntent::Fixed(outer_size(style, axis, c * p / 100.0)),
            None => SizeIntent::Hug,
        },
        Some(Dimension::Auto) => SizeIntent::Hug,
        None => {
            if el.is_replaced() || flow == Flow::OutOfFlow || el.is_inline_level() {
                SizeIntent::Hug
            } else if axis == Axis::Horizontal && ctx.axis != Some(Axis::Horizontal) {
                SizeIntent::Fill
            } else {
                SizeIntent::Hug
            }
        }
    }
}

/// True when the parent's alignment stretches this child on its cross axis.
fn stretches(el: &Element, ctx: &ParentContext) -> bool {
    match el.style.align_self {
        Some(AlignItems::Stretch) => true,
        Some(_) => false,
        None => {
            !el.is_inline_level()
                && matches!(ctx.align_items, None | Some(AlignItems::Stretch))
        }
    }
}

/// Decide both axes for a box.
pub(crate) fn resolve_box_intents(el: &Element, ctx: &ParentContext, flow: Flow) -> PendingSizing {
    let mut pending = PendingSizing {
        horizontal: declared_intent(el, Axis::Horizontal, ctx, flow),
        vertical: declared_intent(el, Axis::Vertical, ctx, flow),
    };

    if let Some(scale) = el.style.transform.and_then(|t| t.uniform_scale()) {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if let SizeIntent::Fixed(v) = pending.get(axis) {
                pending.set(axis, SizeIntent::Fixed(v * scale));
            }
        }
    }

    if let Some(ratio) = el.style.aspect_ratio {
        apply_aspect_ratio(&mut pending, ratio);
    }

    if el.is_replaced() {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if pending.get(axis) == SizeIntent::Hug {
                pending.set(
                    axis,
                    SizeIntent::Fixed(outer_size(&el.style, axis, DEFAULT_REPLACED_SIZE)),
                );
            }
        }
    }

    adjust_for_parent(el, &mut pending, ctx, flow);
    pending
}

/// With exactly one FIXED axis, derive the other from the ratio.
pub(crate) fn apply_aspect_ratio(pending: &mut PendingSizing, ratio: f32) {
    if ratio <= 0.0 {
        return;
    }
    match (pending.horizontal, pending.vertical) {
        (SizeIntent::Fixed(w), SizeIntent::Hug | SizeIntent::Fill) => {
            pending.vertical = SizeIntent::Fixed(w / ratio)
        }
        (SizeIntent::Hug | SizeIntent::Fill, SizeIntent::Fixed(h)) => {
            pending.horizontal = SizeIntent::Fixed(h * ratio)
        }
        _ => {}
    }
}

/// Parent-dependent rules: flex growth, default cross-axis stretch, and
/// FILL under a parent that cannot honour it.
pub(crate) fn adjust_for_parent(
    el: &Element,
    pending: &mut PendingSizing,
    ctx: &ParentContext,
    flow: Flow,
) {
    match (flow, ctx.axis) {
        (Flow::InFlow, Some(main)) => {
            if el.style.flex_grow.is_some_and(|g| g > 0.0) {
                pending.set(main, SizeIntent::Fill);
            }
            let cross = main.other();
            let explicit = matches!(
                dimension(&el.style, cross),
                Some(Dimension::Px(_) | Dimension::Percent(_))
            );
            let derived = matches!(pending.get(cross), SizeIntent::Fixed(_));
            if !explicit && !derived && dimension(&el.style, cross).is_none() {
                let intent = if stretches(el, ctx) {
                    SizeIntent::Fill
                } else {
                    SizeIntent::Hug
                };
                pending.set(cross, intent);
            } else if !explicit && el.style.align_self == Some(AlignItems::Stretch) {
                pending.set(cross, SizeIntent::Fill);
            }
        }
        _ => {
            for axis in [Axis::Horizontal, Axis::Vertical] {
                if pending.get(axis) == SizeIntent::Fill {
                    let intent = match ctx.content(axis) {
                        Some(size) => SizeIntent::Fixed(size),
                        None => SizeIntent::Hug,
                    };
                    pending.set(axis, intent);
                }
            }
        }
    }
}

/// Main-axis size a growing child falls back to when its container has no
/// free space to share: its declared length, else its content.
pub(crate) fn growth_basis(
    el: &Element,
    axis: Axis,
    ctx: &ParentContext,
    flow: Flow,
) -> SizeIntent {
    match declared_intent(el, axis, ctx, flow) {
        SizeIntent::Fixed(v) => SizeIntent::Fixed(v),
        _ if el.is_replaced() => {
            SizeIntent::Fixed(outer_size(&el.style, axis, DEFAULT_REPLACED_SIZE))
        }
        _ => SizeIntent::Hug,
    }
}

impl Synthesizer<'_> {
    /// Record what is known about a box's size from its intents.
    pub(super) fn record_intended(
        &mut self,
        id: NodeId,
        pending: &PendingSizing,
        ctx: &ParentContext,
    ) {
        let mut intended = IntendedSize::default();
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let value = match pending.get(axis) {
                SizeIntent::Fixed(v) => Some(v),
                SizeIntent::Fill if ctx.axis != Some(axis) => ctx.content(axis),
                SizeIntent::Fill | SizeIntent::Hug => None,
            };
            intended.set(axis, value);
        }
        self.tables.intended.insert(id, intended);
    }

    pub(super) fn intended(&self, id: NodeId, axis: Axis) -> Option<f32> {
        self.tables.intended.get(&id).and_then(|i| i.get(axis))
    }

    pub(super) fn set_intended(&mut self, id: NodeId, axis: Axis, value: f32) {
        self.tables
            .intended
            .entry(id)
            .or_default()
            .set(axis, Some(value));
    }

    pub(super) fn resize_axis(&mut self, id: NodeId, axis: Axis, value: f32) {
        let Some(node) = self.doc.node(id) else {
            return;
        };
        let (w, h) = match axis {
            Axis::Horizontal => (value, node.height),
            Axis::Vertical => (node.width, value),
        };
        advisory(self.doc.resize(id, w, h));
    }

    /// Apply and clear the pending sizing of a freshly attached box.
    pub(super) fn apply_pending(&mut self, id: NodeId) {
        let Some(pending) = self.tables.pending.remove(&id) else {
            return;
        };
        for axis in [Axis::Horizontal, Axis::Vertical] {
            self.apply_intent(id, axis, pending.get(axis));
        }
        self.tables.applied.insert(id, pending);
    }

    pub(super) fn apply_intent(&mut self, id: NodeId, axis: Axis, intent: SizeIntent) {
        match intent {
            SizeIntent::Fixed(v) => {
                self.resize_axis(id, axis, v);
                let r = self.doc.set_layout_sizing(id, axis, SizingMode::Fixed);
                advisory(r);
            }
            SizeIntent::Hug => {
                if let Err(e) = self.doc.set_layout_sizing(id, axis, SizingMode::Hug) {
                    log::trace!("{e}; sizing to padding");
                    let pad = self
                        .doc
                        .node(id)
                        .map(|n| n.padding.along(axis))
                        .unwrap_or(0.0);
                    self.resize_axis(id, axis, pad);
                }
            }
            SizeIntent::Fill => {
                if let Some(v) = self.intended(id, axis) {
                    self.resize_axis(id, axis, v);
                }
                let r = self.doc.set_layout_sizing(id, axis, SizingMode::Fill);
                advisory(r);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Tag;

    fn ctx(axis: Option<Axis>, width: Option<f32>) -> ParentContext<'static> {
        ParentContext {
            id: NodeId(0),
            axis,
            content: (width, None),
            available_width: width,
            align_items: None,
            text_color: None,
            style: None,
        }
    }

    fn intents(css: &str, ctx: &ParentContext) -> PendingSizing {
        resolve_box_intents(&Element::new(Tag::Div).with_style(css), ctx, Flow::InFlow)
    }

    #[test]
    fn explicit_size_is_content_box() {
        let p = intents("width: 200px; padding: 20px", &ctx(Some(Axis::Vertical), Some(500.0)));
        assert_eq!(p.horizontal, SizeIntent::Fixed(240.0));
        let p = intents(
            "width: 200px; padding: 20px; box-sizing: border-box",
            &ctx(Some(Axis::Vertical), Some(500.0)),
        );
        assert_eq!(p.horizontal, SizeIntent::Fixed(200.0));
    }

    #[test]
    fn block_width_fills_column_but_hugs_in_row() {
        let p = intents("", &ctx(Some(Axis::Vertical), Some(500.0)));
        assert_eq!((p.horizontal, p.vertical), (SizeIntent::Fill, SizeIntent::Hug));
        let p = intents("", &ctx(Some(Axis::Horizontal), Some(500.0)));
        // Main axis hugs; cross axis stretches by default.
        assert_eq!((p.horizontal, p.vertical), (SizeIntent::Hug, SizeIntent::Fill));
    }

    #[test]
    fn explicit_alignment_disables_default_stretch() {
        let mut c = ctx(Some(Axis::Vertical), Some(500.0));
        c.align_items = Some(AlignItems::Center);
        let p = intents("", &c);
        assert_eq!(p.horizontal, SizeIntent::Hug);
        let p = intents("align-self: stretch", &c);
        assert_eq!(p.horizontal, SizeIntent::Fill);
    }

    #[test]
    fn percentages_resolve_or_hug() {
        let p = intents("width: 50%", &ctx(Some(Axis::Vertical), Some(400.0)));
        assert_eq!(p.horizontal, SizeIntent::Fixed(200.0));
        let p = intents("width: 50%", &ctx(Some(Axis::Vertical), None));
        assert_eq!(p.horizontal, SizeIntent::Hug);
        let p = intents("width: 100%", &ctx(Some(Axis::Vertical), None));
        assert_eq!(p.horizontal, SizeIntent::Fill);
    }

    #[test]
    fn fill_without_auto_layout_parent_becomes_fixed() {
        let p = intents("", &ctx(None, Some(320.0)));
        assert_eq!(p.horizontal, SizeIntent::Fixed(320.0));
        let p = intents("", &ctx(None, None));
        assert_eq!(p.horizontal, SizeIntent::Hug);
    }

    #[test]
    fn flex_growth_fills_main_axis() {
        let p = intents("flex: 1; width: 10px", &ctx(Some(Axis::Horizontal), Some(400.0)));
        assert_eq!(p.horizontal, SizeIntent::Fill);
    }

    #[test]
    fn aspect_ratio_and_scale() {
        let p = intents("width: 100px; aspect-ratio: 2", &ctx(Some(Axis::Vertical), None));
        assert_eq!(p.vertical, SizeIntent::Fixed(50.0));
        let p = intents("height: 30px; aspect-ratio: 2 / 1", &ctx(Some(Axis::Horizontal), None));
        assert_eq!(p.horizontal, SizeIntent::Fixed(60.0));
        let p = intents("width: 10px; height: 10px; transform: scale(3)", &ctx(None, None));
        assert_eq!((p.horizontal, p.vertical), (SizeIntent::Fixed(30.0), SizeIntent::Fixed(30.0)));
    }

    #[test]
    fn min_max_clamp_explicit_sizes() {
        let p = intents("width: 50px; min-width: 80px", &ctx(Some(Axis::Vertical), None));
        assert_eq!(p.horizontal, SizeIntent::Fixed(80.0));
        let p = intents(
            "width: 500px; max-width: 300px; padding: 0 10px",
            &ctx(Some(Axis::Vertical), None),
        );
        assert_eq!(p.horizontal, SizeIntent::Fixed(320.0));
    }

    #[test]
    fn replaced_elements_default_to_fixed() {
        let img = Element::new(Tag::Img).with_style("width: 40px");
        let p = resolve_box_intents(&img, &ctx(Some(Axis::Vertical), Some(500.0)), Flow::InFlow);
        assert_eq!((p.horizontal, p.vertical), (SizeIntent::Fixed(40.0), SizeIntent::Fixed(100.0)));
    }

    #[test]
    fn growth_falls_back_to_declared_or_content_size() {
        let row = ctx(Some(Axis::Horizontal), Some(100.0));
        let sized = Element::new(Tag::Div).with_style("flex: 1; width: 30px");
        let basis = |el: &Element| growth_basis(el, Axis::Horizontal, &row, Flow::InFlow);
        assert_eq!(basis(&sized), SizeIntent::Fixed(30.0));
        let bare = Element::new(Tag::Div).with_style("flex: 1");
        assert_eq!(basis(&bare), SizeIntent::Hug);
        let img = Element::new(Tag::Img).with_style("flex: 1");
        assert_eq!(basis(&img), SizeIntent::Fixed(100.0));
    }

    #[test]
    fn layout_modes() {
        let row = Element::new(Tag::Div).with_style("display: flex");
        assert_eq!(layout_mode_for(&row), LayoutMode::Horizontal);
        let col = Element::new(Tag::Div).with_style("display: flex; flex-direction: column");
        assert_eq!(layout_mode_for(&col), LayoutMode::Vertical);
        assert_eq!(layout_mode_for(&Element::new(Tag::Span)), LayoutMode::None);
        assert_eq!(layout_mode_for(&Element::new(Tag::Div)), LayoutMode::Vertical);
    }
}
