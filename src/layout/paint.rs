//! Visual properties: fills, strokes, effects, radii and the rest of the
//! paint-only state of a box.

use crate::document::{
    CornerRadii, Document, Effect, GradientTransform, NodeId, Paint, StrokeWeights,
};
use crate::style::{BorderStyle, Dimension, Style, Visibility};
use crate::values::{Color, Gradient, LinearGradient, RadialGradient, RadialShape};

/// Radius used for percentage corners when the box size is not yet known.
/// The target clamps radii to half the shorter side.
const PILL_RADIUS: f32 = 9999.0;

/// Map a CSS gradient angle (0 = up, 90 = right) to the 2x3 transform of
/// the target's unit gradient space.
pub fn linear_transform(angle_deg: f32) -> GradientTransform {
    let phi = (angle_deg - 90.0).to_radians();
    let (s, c) = phi.sin_cos();
    [
        [c, s, 0.5 - 0.5 * c - 0.5 * s],
        [-s, c, 0.5 + 0.5 * s - 0.5 * c],
    ]
}

/// Centre/scale transform of a radial gradient sized to the farthest side.
pub fn radial_transform(g: &RadialGradient) -> GradientTransform {
    let (cx, cy) = g.center;
    let mut rx = cx.max(1.0 - cx).max(f32::EPSILON);
    let mut ry = cy.max(1.0 - cy).max(f32::EPSILON);
    if g.shape == RadialShape::Circle {
        let r = rx.max(ry);
        rx = r;
        ry = r;
    }
    [
        [1.0 / (2.0 * rx), 0.0, 0.5 - cx / (2.0 * rx)],
        [0.0, 1.0 / (2.0 * ry), 0.5 - cy / (2.0 * ry)],
    ]
}

pub fn gradient_paint(g: &Gradient) -> Paint {
    match g {
        Gradient::Linear(LinearGradient { angle, stops }) => Paint::LinearGradient {
            transform: linear_transform(*angle),
            stops: stops.clone(),
        },
        Gradient::Radial(r) => Paint::RadialGradient {
            transform: radial_transform(r),
            stops: r.stops.clone(),
        },
    }
}

/// Fills bottom to top: the background colour, then the gradient layers
/// from the last declared to the first.
pub fn fills(style: &Style) -> Vec<Paint> {
    let mut out = Vec::new();
    if let Some(color) = style.background_color.filter(|c| !c.is_transparent()) {
        out.push(Paint::Solid { color });
    }
    out.extend(style.background_gradients.iter().rev().map(gradient_paint));
    out
}

/// Border paint and per-side weights. The border colour defaults to the
/// text colour, else black.
pub fn strokes(style: &Style, text_color: Option<Color>) -> Option<(Paint, StrokeWeights)> {
    if !style.has_border() {
        return None;
    }
    let w = style.border_width.resolved();
    let color = style.border_color.or(text_color).unwrap_or(Color::BLACK);
    Some((
        Paint::Solid { color },
        StrokeWeights {
            top: w.top,
            right: w.right,
            bottom: w.bottom,
            left: w.left,
        },
    ))
}

pub fn dash_pattern(style: &Style) -> Vec<f32> {
    let w = style.border_width.resolved();
    let weight = w.top.max(w.right).max(w.bottom).max(w.left).max(1.0);
    match style.border_style {
        Some(BorderStyle::Dashed) => vec![weight * 3.0, weight * 2.0],
        Some(BorderStyle::Dotted) => vec![weight, weight],
        _ => Vec::new(),
    }
}

pub fn effects(style: &Style) -> Vec<Effect> {
    let mut out: Vec<Effect> = style
        .box_shadow
        .iter()
        .flatten()
        .map(|s| {
            let (color, offset, radius, spread) =
                (s.color, (s.offset_x, s.offset_y), s.blur, s.spread);
            if s.inset {
                Effect::InnerShadow {
                    color,
                    offset,
                    radius,
                    spread,
                }
            } else {
                Effect::DropShadow {
                    color,
                    offset,
                    radius,
                    spread,
                }
            }
        })
        .collect();
    if let Some(radius) = style.blur.filter(|r| *r > 0.0) {
        out.push(Effect::LayerBlur { radius });
    }
    if let Some(radius) = style.backdrop_blur.filter(|r| *r > 0.0) {
        out.push(Effect::BackgroundBlur { radius });
    }
    out
}

/// Corner radii; percentages resolve against the shorter side.
pub fn corner_radii(style: &Style, size: (Option<f32>, Option<f32>)) -> CornerRadii {
    let shorter = match size {
        (Some(w), Some(h)) => Some(w.min(h)),
        _ => None,
    };
    let resolve = |d: Option<Dimension>| match d {
        Some(Dimension::Px(px)) => px,
        Some(Dimension::Percent(p)) => match shorter {
            Some(side) => side * p.min(50.0) / 100.0,
            None if p >= 50.0 => PILL_RADIUS,
            None => 0.0,
        },
        _ => 0.0,
    };
    let r = &style.border_radius;
    CornerRadii {
        top_left: resolve(r.top_left),
        top_right: resolve(r.top_right),
        bottom_right: resolve(r.bottom_right),
        bottom_left: resolve(r.bottom_left),
    }
}

/// Apply everything paint-related to a frame. `size` is the intended box
/// size where known.
pub fn apply_box_paint(
    doc: &mut Document,
    id: NodeId,
    style: &Style,
    text_color: Option<Color>,
    size: (Option<f32>, Option<f32>),
) {
    let Some(node) = doc.node_mut(id) else {
        return;
    };
    node.fills = fills(style);
    if let Some((paint, weights)) = strokes(style, text_color) {
        node.strokes = vec![paint];
        node.stroke_weights = weights;
        node.dash_pattern = dash_pattern(style);
    }
    node.corner_radii = corner_radii(style, size);
    node.clips_content = style.overflow_hidden.unwrap_or(false);
    apply_common_paint(doc, id, style);
}

/// Paint state shared by frames and text nodes.
pub fn apply_common_paint(doc: &mut Document, id: NodeId, style: &Style) {
    let Some(node) = doc.node_mut(id) else {
        return;
    };
    node.effects = effects(style);
    node.opacity = style.opacity.unwrap_or(1.0);
    node.visible = style.visibility != Some(Visibility::Hidden);
    if let Some(t) = style.transform {
        // The target measures rotation counter-clockwise.
        node.rotation = -t.rotate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::parse_gradient;

    fn close(a: GradientTransform, b: GradientTransform) -> bool {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn ninety_degrees_is_identity() {
        assert!(close(linear_transform(90.0), [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]));
    }

    #[test]
    fn to_bottom_rotates_quarter_turn() {
        // 180deg: phi = 90deg, c = 0, s = 1
        assert!(close(linear_transform(180.0), [[0.0, 1.0, 0.0], [-1.0, 0.0, 1.0]]));
    }

    #[test]
    fn centred_radial_scales_to_unit() {
        let Some(Gradient::Radial(g)) = parse_gradient("radial-gradient(circle, red, blue)") else {
            panic!("expected radial");
        };
        assert!(close(radial_transform(&g), [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]));
    }

    #[test]
    fn fills_put_color_below_reversed_layers() {
        let style = Style::parse(
            "background: linear-gradient(red, blue), radial-gradient(red, blue), #00ff00",
        );
        let f = fills(&style);
        assert_eq!(f.len(), 3);
        assert!(matches!(f[0], Paint::Solid { .. }));
        assert!(matches!(f[1], Paint::RadialGradient { .. }));
        assert!(matches!(f[2], Paint::LinearGradient { .. }));
    }

    #[test]
    fn radii_resolve_percentages() {
        let style = Style::parse("border-radius: 50%");
        assert_eq!(corner_radii(&style, (Some(40.0), Some(60.0))).top_left, 20.0);
        assert_eq!(corner_radii(&style, (None, None)).top_left, PILL_RADIUS);
        let style = Style::parse("border-radius: 1px 2px 3px 4px");
        let r = corner_radii(&style, (None, None));
        assert_eq!((r.top_left, r.top_right, r.bottom_right, r.bottom_left), (1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn strokes_and_effects() {
        let style = Style::parse(
            "border-bottom: 2px dashed; box-shadow: inset 0 1px 2px #000, 0 4px 8px red; filter: blur(2px)",
        );
        let (paint, w) = strokes(&style, Some(Color::WHITE)).unwrap();
        assert_eq!(paint, Paint::Solid { color: Color::WHITE });
        assert_eq!((w.top, w.bottom), (0.0, 2.0));
        let e = effects(&style);
        assert_eq!(e.len(), 3);
        assert!(matches!(e[0], Effect::InnerShadow { .. }));
        assert!(matches!(e[2], Effect::LayerBlur { radius } if radius == 2.0));
    }
}
