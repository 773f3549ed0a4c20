//! Stacking and ordering policy.
//!
//! Children split into normal flow and out-of-flow boxes. Out-of-flow boxes
//! with `z-index < 1` sit behind the flow (before it in child order), the
//! rest on top of it. Within each group the order is by z-index, then by
//! document order.

use crate::style::{Dimension, Element, Position, Sides};

/// Where an out-of-flow box goes relative to the flow children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Overlay,
}

pub fn layer_for(z_index: Option<i32>) -> Layer {
    if z_index.unwrap_or(0) < 1 {
        Layer::Background
    } else {
        Layer::Overlay
    }
}

/// Indices of the flow and out-of-flow children, in document order.
pub fn partition(children: &[Element]) -> (Vec<usize>, Vec<usize>) {
    let mut flow = Vec::new();
    let mut out_of_flow = Vec::new();
    for (i, child) in children.iter().enumerate() {
        if child.is_skipped() {
            continue;
        }
        if child.is_out_of_flow() {
            out_of_flow.push(i);
        } else {
            flow.push(i);
        }
    }
    (flow, out_of_flow)
}

/// Tracks z-indices already placed so later boxes land after equal ones.
#[derive(Debug, Default)]
pub struct StackOrder {
    background: Vec<i32>,
    overlay: Vec<i32>,
}

impl StackOrder {
    /// Child index for a new out-of-flow box given the current child count.
    /// Call [`StackOrder::record`] once the box is inserted.
    pub fn insertion_index(&self, z: i32, child_count: usize) -> usize {
        match layer_for(Some(z)) {
            Layer::Background => self.background.iter().filter(|b| **b <= z).count(),
            Layer::Overlay => {
                let above = self.overlay.iter().filter(|o| **o > z).count();
                child_count - above
            }
        }
    }

    pub fn record(&mut self, z: i32) {
        let list = match layer_for(Some(z)) {
            Layer::Background => &mut self.background,
            Layer::Overlay => &mut self.overlay,
        };
        let at = list.iter().filter(|v| **v <= z).count();
        list.insert(at, z);
    }
}

/// Horizontal or vertical placement of an out-of-flow box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Stretch between two offsets: start position and size.
    Stretch { start: f32, size: f32 },
    /// Keep the box's own size, starting at this offset.
    Start(f32),
    /// Keep the box's own size, ending this far from the far edge.
    End(f32),
    /// No offset on this axis.
    Static,
}

impl Placement {
    /// Final (position, size) given the box's own size on this axis.
    pub fn resolve(self, own_size: f32, container: f32) -> (f32, f32) {
        match self {
            Placement::Stretch { start, size } => (start, size),
            Placement::Start(start) => (start, own_size),
            Placement::End(end) => (container - end - own_size, own_size),
            Placement::Static => (0.0, own_size),
        }
    }
}

fn offset(d: Option<Dimension>, container: f32) -> Option<f32> {
    match d? {
        Dimension::Px(v) => Some(v),
        Dimension::Percent(p) => Some(container * p / 100.0),
        Dimension::Auto | Dimension::Fill => None,
    }
}

/// Resolve `left/right` (or `top/bottom`) against the container extent.
/// Both offsets stretch the box unless it has an explicit size.
pub fn place_axis(
    start: Option<Dimension>,
    end: Option<Dimension>,
    container: f32,
    explicit_size: bool,
) -> Placement {
    match (offset(start, container), offset(end, container)) {
        (Some(s), Some(e)) if !explicit_size => Placement::Stretch {
            start: s,
            size: (container - s - e).max(0.0),
        },
        (Some(s), _) => Placement::Start(s),
        (None, Some(e)) => Placement::End(e),
        (None, None) => Placement::Static,
    }
}

/// The visual shift of a `position: relative` box, including transform
/// translation. `None` when the box does not move.
pub fn relative_shift(
    position: Option<Position>,
    inset: &Sides<Option<Dimension>>,
    translate: (f32, f32),
    container: (f32, f32),
) -> Option<(f32, f32)> {
    let (mut dx, mut dy) = translate;
    if position == Some(Position::Relative) {
        dx += match (offset(inset.left, container.0), offset(inset.right, container.0)) {
            (Some(l), _) => l,
            (None, Some(r)) => -r,
            (None, None) => 0.0,
        };
        dy += match (offset(inset.top, container.1), offset(inset.bottom, container.1)) {
            (Some(t), _) => t,
            (None, Some(b)) => -b,
            (None, None) => 0.0,
        };
    }
    (dx != 0.0 || dy != 0.0).then_some((dx, dy))
}
