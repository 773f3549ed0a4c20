//! Margin emulation.
//!
//! The target has no margins. Along the parent's main axis a margin becomes
//! a fixed spacer sibling (or a growing one for `auto`). Across it, the box
//! is wrapped in a frame laid out along the cross axis with spacers on
//! either side.

use crate::document::{Axis, LayoutMode, NodeId, Role, SizingMode};
use crate::style::{Element, Margin, Style};

use super::flex::FlexItem;
use super::sizing::{PendingSizing, SizeIntent};
use super::{advisory, ParentContext, Synthesizer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MarginSize {
    Fixed(f32),
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct AxisMargins {
    pub leading: Option<MarginSize>,
    pub trailing: Option<MarginSize>,
}

impl AxisMargins {
    pub fn is_empty(&self) -> bool {
        self.leading.is_none() && self.trailing.is_none()
    }

    pub fn has_auto(&self) -> bool {
        self.leading == Some(MarginSize::Auto) || self.trailing == Some(MarginSize::Auto)
    }

    /// Sum of the fixed margins.
    pub fn fixed_total(&self) -> f32 {
        [self.leading, self.trailing]
            .into_iter()
            .map(|m| match m {
                Some(MarginSize::Fixed(v)) => v,
                _ => 0.0,
            })
            .sum()
    }
}

fn margin_size(m: Option<Margin>) -> Option<MarginSize> {
    match m? {
        Margin::Px(v) if v > 0.0 => Some(MarginSize::Fixed(v)),
        Margin::Px(_) => None,
        Margin::Auto => Some(MarginSize::Auto),
    }
}

/// Margins before and after the box along `axis`. Zero and negative
/// margins are dropped.
pub(crate) fn margins_along(style: &Style, axis: Axis) -> AxisMargins {
    let m = &style.margin;
    let (leading, trailing) = match axis {
        Axis::Horizontal => (m.left, m.right),
        Axis::Vertical => (m.top, m.bottom),
    };
    AxisMargins {
        leading: margin_size(leading),
        trailing: margin_size(trailing),
    }
}

impl Synthesizer<'_> {
    /// Attach a flow box to its parent with its margins emulated. Returns
    /// the slot that now stands for the box in the parent: the box itself,
    /// or the wrapper holding it.
    pub(super) fn attach_in_flow(
        &mut self,
        el: &Element,
        id: NodeId,
        ctx: &ParentContext,
    ) -> NodeId {
        let Some(main) = ctx.axis else {
            advisory(self.doc.append_child(ctx.id, id));
            let m = &el.style.margin;
            let px = |m: Option<Margin>| match m {
                Some(Margin::Px(v)) => v,
                _ => 0.0,
            };
            advisory(self.doc.set_position(id, px(m.left), px(m.top)));
            return id;
        };

        let along = margins_along(&el.style, main);
        let across = margins_along(&el.style, main.other());

        if let Some(m) = along.leading {
            self.attach_spacer(ctx.id, main, m);
        }
        let slot = if across.is_empty() {
            advisory(self.doc.append_child(ctx.id, id));
            id
        } else {
            self.attach_wrapped(el, id, ctx, main.other(), across)
        };
        if let Some(m) = along.trailing {
            self.attach_spacer(ctx.id, main, m);
        }
        slot
    }

    /// Add a spacer of `margin` along `axis` to the end of `parent`.
    fn attach_spacer(&mut self, parent: NodeId, axis: Axis, margin: MarginSize) -> NodeId {
        let (name, role, main) = match margin {
            MarginSize::Fixed(v) => ("spacer", Role::Spacer, v),
            MarginSize::Auto => ("auto spacer", Role::GrowSpacer, 0.0),
        };
        let spacer = self.doc.create_frame(name);
        if let Some(node) = self.doc.node_mut(spacer) {
            node.role = role;
        }
        let (w, h) = match axis {
            Axis::Horizontal => (main, 0.0),
            Axis::Vertical => (0.0, main),
        };
        advisory(self.doc.resize(spacer, w, h));
        advisory(self.doc.append_child(parent, spacer));
        if role == Role::GrowSpacer {
            advisory(self.doc.set_layout_sizing(spacer, axis, SizingMode::Fill));
        }
        log::trace!("{name} {main}px on {axis:?} in {parent:?}");
        spacer
    }

    /// Wrap `id` in a frame along `cross` carrying its cross-axis margins.
    fn attach_wrapped(
        &mut self,
        el: &Element,
        id: NodeId,
        ctx: &ParentContext,
        cross: Axis,
        margins: AxisMargins,
    ) -> NodeId {
        let main = cross.other();
        let wrapper = self.doc.create_frame(format!("{} margin", el.name));
        if let Some(node) = self.doc.node_mut(wrapper) {
            node.role = Role::Wrapper;
        }
        let mode = match cross {
            Axis::Horizontal => LayoutMode::Horizontal,
            Axis::Vertical => LayoutMode::Vertical,
        };
        advisory(self.doc.set_layout_mode(wrapper, mode));
        advisory(self.doc.append_child(ctx.id, wrapper));

        let Some(mut child) = self.tables.pending.remove(&id) else {
            advisory(self.doc.append_child(wrapper, id));
            return wrapper;
        };

        // The wrapper takes over the box's place in the parent.
        let mut outer = PendingSizing {
            horizontal: SizeIntent::Hug,
            vertical: SizeIntent::Hug,
        };
        outer.set(main, child.get(main));
        let centred = margins.has_auto();
        outer.set(
            cross,
            match child.get(cross) {
                _ if centred => SizeIntent::Fill,
                SizeIntent::Fixed(v) => SizeIntent::Fixed(v + margins.fixed_total()),
                other => other,
            },
        );

        let wrapper_cross = match outer.get(cross) {
            SizeIntent::Fixed(v) => Some(v),
            SizeIntent::Fill => ctx.content(cross),
            SizeIntent::Hug => None,
        };
        let fills_wrapper = !centred && child.get(cross) != SizeIntent::Hug;
        let basis = match child.get(cross) {
            SizeIntent::Fixed(v) => SizeIntent::Fixed(v),
            _ => SizeIntent::Hug,
        };
        if fills_wrapper {
            child.set(cross, SizeIntent::Fill);
        }

        if let Some(w) = wrapper_cross {
            self.set_intended(wrapper, cross, w);
            if fills_wrapper {
                self.set_intended(id, cross, (w - margins.fixed_total()).max(0.0));
            }
        }
        if let Some(v) = self.intended(id, main) {
            self.set_intended(wrapper, main, v);
        }
        self.tables.pending.insert(wrapper, outer);
        self.apply_pending(wrapper);

        if let Some(m) = margins.leading {
            self.attach_spacer(wrapper, cross, m);
        }
        advisory(self.doc.append_child(wrapper, id));
        if let Some(m) = margins.trailing {
            self.attach_spacer(wrapper, cross, m);
        }
        if fills_wrapper {
            self.register_flex(
                wrapper,
                cross,
                FlexItem {
                    node: id,
                    weight: 1.0,
                    basis,
                },
            );
        }
        self.tables.pending.insert(id, child);
        wrapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_drop_zero_and_negative() {
        let style = Style::parse("margin: 10px 0 -4px auto");
        let v = margins_along(&style, Axis::Vertical);
        assert_eq!(v.leading, Some(MarginSize::Fixed(10.0)));
        assert_eq!(v.trailing, None);
        let h = margins_along(&style, Axis::Horizontal);
        assert_eq!(h.leading, Some(MarginSize::Auto));
        assert_eq!(h.trailing, None);
        assert!(h.has_auto());
    }

    #[test]
    fn fixed_total_ignores_auto() {
        let style = Style::parse("margin: 0 8px 0 auto");
        let h = margins_along(&style, Axis::Horizontal);
        assert_eq!(h.fixed_total(), 8.0);
        assert!(!margins_along(&style, Axis::Vertical).has_auto());
        assert!(margins_along(&style, Axis::Vertical).is_empty());
    }
}
