//! Flex-grow distribution and the nested re-resolution pass.
//!
//! The target's FILL shares free space equally, so weighted growth is
//! resolved here: each container keeps a ledger of its growing children,
//! and once the container's main size is known the free space is split by
//! weight and written back as FIXED sizes. A container whose size changes
//! later re-runs its ledger and refits the descendants that fill it.

use crate::document::{Axis, NodeId, Positioning, PrimaryAlign, Role, SizingMode, TextAutoResize};
use crate::style::{JustifyContent, WhiteSpace};
use crate::text;

use super::{advisory, SizeIntent, Synthesizer};

/// One growing child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FlexItem {
    pub node: NodeId,
    pub weight: f32,
    /// Main-axis sizing when there is nothing to distribute.
    pub basis: SizeIntent,
}

/// Growing children of one container along its main axis.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FlexLedger {
    pub axis: Axis,
    pub entries: Vec<FlexItem>,
}

impl FlexLedger {
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.iter().any(|e| e.node == id)
    }

    /// Replace `old` with `new`, keeping its weight and basis.
    pub fn substitute(&mut self, old: NodeId, new: NodeId) {
        for entry in &mut self.entries {
            if entry.node == old {
                entry.node = new;
            }
        }
    }
}

/// Split `available` by weight.
pub(crate) fn shares(available: f32, weights: &[f32]) -> Vec<f32> {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 || available <= 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|w| available * w / total).collect()
}

impl Synthesizer<'_> {
    pub(super) fn register_flex(&mut self, container: NodeId, axis: Axis, item: FlexItem) {
        let ledger = self
            .tables
            .ledgers
            .entry(container)
            .or_insert_with(|| FlexLedger {
                axis,
                entries: Vec::new(),
            });
        if ledger.axis == axis && !ledger.contains(item.node) {
            ledger.entries.push(item);
        }
    }

    /// In-flow children: visible and not absolutely positioned.
    fn flow_children(&self, container: NodeId) -> Vec<NodeId> {
        self.doc
            .children(container)
            .iter()
            .copied()
            .filter(|c| {
                self.doc
                    .node(*c)
                    .is_some_and(|n| n.visible && n.positioning == Positioning::Auto)
            })
            .collect()
    }

    /// Main-axis size a non-growing child takes.
    fn main_size_of(&mut self, child: NodeId, axis: Axis) -> f32 {
        let Some(node) = self.doc.node(child) else {
            return 0.0;
        };
        match node.sizing(axis) {
            SizingMode::Fixed => node.size(axis),
            SizingMode::Fill => 0.0,
            SizingMode::Hug if node.is_text() => node.size(axis),
            SizingMode::Hug => {
                advisory(self.doc.compute_layout(child, None));
                self.doc.node(child).map(|n| n.size(axis)).unwrap_or(0.0)
            }
        }
    }

    /// Content extent of a container along `axis`, when its size is known.
    pub(super) fn content_extent(&self, container: NodeId, axis: Axis) -> Option<f32> {
        let size = self.intended(container, axis)?;
        let pad = self.doc.node(container)?.padding.along(axis);
        Some((size - pad).max(0.0))
    }

    /// Distribute free main-axis space to the container's growing children.
    pub(super) fn distribute(&mut self, container: NodeId) {
        let Some(ledger) = self.tables.ledgers.get(&container).cloned() else {
            return;
        };
        let axis = ledger.axis;
        let Some(content) = self.content_extent(container, axis) else {
            log::trace!("{container:?}: main size unknown, growing children keep their basis");
            self.release_growth(&ledger);
            return;
        };
        let flow = self.flow_children(container);
        let spacing = self.doc.node(container).map(|n| n.item_spacing).unwrap_or(0.0);
        let gaps = spacing * flow.len().saturating_sub(1) as f32;
        let mut used = 0.0;
        for child in flow.iter().copied().filter(|c| !ledger.contains(*c)) {
            used += self.main_size_of(child, axis);
        }
        let available = content - used - gaps;
        if available <= 0.0 {
            log::debug!("{container:?}: no free space to distribute");
            self.release_growth(&ledger);
            return;
        }
        let weights: Vec<f32> = ledger.entries.iter().map(|e| e.weight).collect();
        let sizes = shares(available, &weights);
        for (item, size) in ledger.entries.iter().zip(sizes) {
            log::trace!("{:?}: grow {} -> {size}px", item.node, item.weight);
            self.settle_main(item.node, axis, SizeIntent::Fixed(size));
            self.refit(item.node, axis, size);
        }
    }

    /// Nothing to share: growing children fall back to their basis so the
    /// target does not shrink them to zero.
    fn release_growth(&mut self, ledger: &FlexLedger) {
        for item in &ledger.entries {
            self.settle_main(item.node, ledger.axis, item.basis);
            if let SizeIntent::Fixed(v) = item.basis {
                self.refit(item.node, ledger.axis, v);
            }
        }
    }

    /// Replace a growing child's main-axis FILL with `intent`.
    fn settle_main(&mut self, id: NodeId, axis: Axis, intent: SizeIntent) {
        self.apply_intent(id, axis, intent);
        if let Some(applied) = self.tables.applied.get_mut(&id) {
            applied.set(axis, intent);
        }
    }

    /// A box got a definite size on `axis`: re-wrap text, re-run its own
    /// ledger and carry the size into children that fill it.
    pub(super) fn refit(&mut self, id: NodeId, axis: Axis, size: f32) {
        self.set_intended(id, axis, size);
        let Some(node) = self.doc.node(id) else {
            return;
        };
        if node.is_text() {
            if axis == Axis::Horizontal {
                self.rewrap(id, size);
            }
            return;
        }
        let primary = node.layout_mode.primary_axis();
        let padding = node.padding.along(axis);
        self.resize_axis(id, axis, size);

        let ledger_axis = self.tables.ledgers.get(&id).map(|l| l.axis);
        if ledger_axis == Some(axis) {
            self.distribute(id);
        }
        if primary == Some(axis) {
            return;
        }
        let content = (size - padding).max(0.0);
        for child in self.flow_children(id) {
            let fills = self.doc.node(child).is_some_and(|c| {
                c.sizing(axis) == SizingMode::Fill && c.role != Role::GrowSpacer
            });
            if fills {
                self.refit(child, axis, content);
            }
        }
    }

    /// Re-measure a wrapping text leaf at a new width.
    fn rewrap(&mut self, id: NodeId, width: f32) {
        let Some(spec) = self.tables.text.get(&id) else {
            return;
        };
        if matches!(spec.white_space, WhiteSpace::NoWrap | WhiteSpace::Pre) {
            return;
        }
        let geometry = text::wrap_at(spec, &*self.fonts, width);
        if let Some(node) = self.doc.node_mut(id) {
            node.width = geometry.width;
            node.height = geometry.height;
            if let Some(data) = node.text.as_mut() {
                if data.auto_resize != TextAutoResize::Truncate {
                    data.auto_resize = TextAutoResize::Height;
                }
            }
        }
    }

    /// `space-around` and `space-evenly` become equal spacing with half a
    /// gap of padding at both ends. Without a known size the items centre.
    pub(super) fn distribute_around(&mut self, container: NodeId, justify: JustifyContent) {
        if !matches!(justify, JustifyContent::SpaceAround | JustifyContent::SpaceEvenly) {
            return;
        }
        let Some(node) = self.doc.node(container) else {
            return;
        };
        let Some(axis) = node.layout_mode.primary_axis() else {
            return;
        };
        let counter = node.counter_align;
        let flow = self.flow_children(container);
        let content = self.content_extent(container, axis);
        let Some(content) = content.filter(|_| !flow.is_empty()) else {
            advisory(self.doc.set_alignment(container, PrimaryAlign::Center, counter));
            return;
        };
        let mut used = 0.0;
        for child in &flow {
            used += self.main_size_of(*child, axis);
        }
        let free = content - used;
        if free <= 0.0 {
            advisory(self.doc.set_alignment(container, PrimaryAlign::Center, counter));
            return;
        }
        let gap = free / flow.len() as f32;
        advisory(self.doc.set_item_spacing(container, gap));
        if let Some(node) = self.doc.node_mut(container) {
            match axis {
                Axis::Horizontal => {
                    node.padding.left += gap / 2.0;
                    node.padding.right += gap / 2.0;
                }
                Axis::Vertical => {
                    node.padding.top += gap / 2.0;
                    node.padding.bottom += gap / 2.0;
                }
            }
        }
        advisory(self.doc.set_alignment(container, PrimaryAlign::Min, counter));
    }

    /// Appending children into a FIXED space-between frame re-expands it to
    /// HUG; assert the intended size again once all children are in.
    pub(super) fn restore_space_between(&mut self, container: NodeId) {
        let Some(node) = self.doc.node(container) else {
            return;
        };
        if node.primary_align != PrimaryAlign::SpaceBetween {
            return;
        }
        let Some(axis) = node.layout_mode.primary_axis() else {
            return;
        };
        let counter = node.counter_align;
        let Some(size) = self
            .tables
            .applied
            .get(&container)
            .and_then(|p| p.fixed(axis))
        else {
            return;
        };
        self.resize_axis(container, axis, size);
        advisory(self.doc.set_layout_sizing(container, axis, SizingMode::Fixed));
        advisory(self.doc.set_alignment(container, PrimaryAlign::Min, counter));
        advisory(self.doc.set_alignment(container, PrimaryAlign::SpaceBetween, counter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_follow_weights() {
        assert_eq!(shares(400.0, &[1.0, 1.0, 2.0]), vec![100.0, 100.0, 200.0]);
        assert_eq!(shares(90.0, &[1.0, 2.0]), vec![30.0, 60.0]);
    }

    #[test]
    fn no_space_no_growth() {
        assert_eq!(shares(-10.0, &[1.0, 1.0]), vec![0.0, 0.0]);
        assert_eq!(shares(10.0, &[0.0]), vec![0.0]);
    }

    #[test]
    fn ledger_substitution_keeps_weight() {
        let item = |n, weight| FlexItem {
            node: NodeId(n),
            weight,
            basis: SizeIntent::Hug,
        };
        let mut ledger = FlexLedger {
            axis: Axis::Horizontal,
            entries: vec![item(3, 2.0), item(4, 1.0)],
        };
        ledger.substitute(NodeId(3), NodeId(9));
        assert!(ledger.contains(NodeId(9)));
        assert!(!ledger.contains(NodeId(3)));
        assert_eq!(ledger.entries[0], item(9, 2.0));
    }
}
