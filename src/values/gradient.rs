//! Gradients – `linear-gradient()` and `radial-gradient()` with colour stops.

use serde::{Deserialize, Serialize};

use super::{
    function_parts, parse_angle, parse_color, parse_percentage, split_top_level,
    split_whitespace_top_level, Color,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gradient {
    Linear(LinearGradient),
    Radial(RadialGradient),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    /// CSS angle in degrees: 0 points up, 90 points right.
    pub angle: f32,
    pub stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadialShape {
    Circle,
    Ellipse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub shape: RadialShape,
    /// Centre as fractions of the box (0.5, 0.5 is the middle).
    pub center: (f32, f32),
    pub stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: Color,
    /// Position along the gradient line, 0.0 – 1.0.
    pub position: f32,
}

impl Gradient {
    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Gradient::Linear(g) => &g.stops,
            Gradient::Radial(g) => &g.stops,
        }
    }
}

/// `to <side>` keyword angles.
const DIRECTIONS: &[(&str, f32)] = &[
    ("to top", 0.0),
    ("to top right", 45.0),
    ("to right", 90.0),
    ("to bottom right", 135.0),
    ("to bottom", 180.0),
    ("to bottom left", 225.0),
    ("to left", 270.0),
    ("to top left", 315.0),
];

fn direction_angle(input: &str) -> Option<f32> {
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.first() != Some(&"to") {
        return parse_angle(input);
    }
    // Corners may be written in either order ("to right top").
    let mut sides: Vec<&str> = words[1..].to_vec();
    sides.sort_by_key(|s| match *s {
        "top" | "bottom" => 0,
        _ => 1,
    });
    let normalised = format!("to {}", sides.join(" "));
    DIRECTIONS
        .iter()
        .find(|(k, _)| *k == normalised)
        .map(|(_, a)| *a)
}

/// Parse a gradient function. Returns `None` when the syntax is not
/// recognised or fewer than two valid stops remain.
pub fn parse_gradient(input: &str) -> Option<Gradient> {
    let (name, args) = function_parts(input)?;
    let name = name.to_ascii_lowercase();
    let name = name.strip_prefix("repeating-").unwrap_or(&name);
    let parts = split_top_level(args, ',');
    match name {
        "linear-gradient" => {
            let angle = parts
                .first()
                .and_then(|p| direction_angle(&p.to_ascii_lowercase()));
            let (angle, stop_parts) = match angle {
                Some(angle) => (angle, &parts[1..]),
                None => (180.0, &parts[..]),
            };
            let stops = parse_stops(stop_parts)?;
            Some(Gradient::Linear(LinearGradient { angle, stops }))
        }
        "radial-gradient" => {
            let prelude = parts.first().and_then(|p| parse_radial_prelude(p));
            let (shape, center, stop_parts) = match prelude {
                Some((shape, center)) => (shape, center, &parts[1..]),
                None => (RadialShape::Ellipse, (0.5, 0.5), &parts[..]),
            };
            let stops = parse_stops(stop_parts)?;
            Some(Gradient::Radial(RadialGradient {
                shape,
                center,
                stops,
            }))
        }
        _ => None,
    }
}

/// `circle at 30% 70%`, `ellipse`, `at top left`, `closest-side`…
fn parse_radial_prelude(input: &str) -> Option<(RadialShape, (f32, f32))> {
    let lower = input.to_ascii_lowercase();
    let (shape_part, position_part) = match lower.split_once("at ") {
        Some((s, p)) if s.is_empty() || s.ends_with(' ') => (s.trim(), Some(p.trim())),
        _ => (lower.trim(), None),
    };
    let mut shape = None;
    for word in shape_part.split_whitespace() {
        match word {
            "circle" => shape = Some(RadialShape::Circle),
            "ellipse" => shape = Some(RadialShape::Ellipse),
            "closest-side" | "closest-corner" | "farthest-side" | "farthest-corner" => {}
            _ => return None,
        }
    }
    if shape.is_none() && position_part.is_none() && shape_part.is_empty() {
        return None;
    }
    let center = match position_part {
        Some(p) => parse_position(p)?,
        None => (0.5, 0.5),
    };
    Some((shape.unwrap_or(RadialShape::Ellipse), center))
}

/// A `<position>`: a percentage pair or composable side keywords.
fn parse_position(input: &str) -> Option<(f32, f32)> {
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.is_empty() || words.len() > 2 {
        return None;
    }
    if let Some(x) = parse_percentage(words[0]) {
        let y = match words.get(1) {
            Some(w) => parse_percentage(w)?,
            None => 50.0,
        };
        return Some((x / 100.0, y / 100.0));
    }
    let (mut x, mut y) = (None, None);
    for word in &words {
        match *word {
            "left" => x = Some(0.0),
            "right" => x = Some(1.0),
            "top" => y = Some(0.0),
            "bottom" => y = Some(1.0),
            "center" => {}
            _ => return None,
        }
    }
    Some((x.unwrap_or(0.5), y.unwrap_or(0.5)))
}

/// Parse the stop list, then resolve missing positions.
fn parse_stops(parts: &[&str]) -> Option<Vec<ColorStop>> {
    let mut raw: Vec<(Color, Option<f32>)> = Vec::new();
    for part in parts {
        let tokens = split_whitespace_top_level(part);
        let Some(color) = tokens.iter().find_map(|t| parse_color(t)) else {
            continue;
        };
        let positions: Vec<f32> = tokens
            .iter()
            .filter_map(|t| parse_percentage(t))
            .map(|p| p / 100.0)
            .collect();
        match positions.as_slice() {
            [] => raw.push((color, None)),
            [p] => raw.push((color, Some(*p))),
            [a, b, ..] => {
                raw.push((color, Some(*a)));
                raw.push((color, Some(*b)));
            }
        }
    }
    if raw.len() < 2 {
        return None;
    }
    let positions = resolve_positions(&raw.iter().map(|(_, p)| *p).collect::<Vec<_>>());
    Some(
        raw.into_iter()
            .zip(positions)
            .map(|((color, _), position)| ColorStop { color, position })
            .collect(),
    )
}

/// Fill in stop positions: the first defaults to 0 and the last to 1,
/// explicit positions are clamped and never decrease, and runs of missing
/// positions are spread evenly between their explicit neighbours.
pub fn resolve_positions(explicit: &[Option<f32>]) -> Vec<f32> {
    let n = explicit.len();
    let mut known: Vec<Option<f32>> = explicit.to_vec();
    if let Some(first) = known.first_mut() {
        first.get_or_insert(0.0);
    }
    if let Some(last) = known.last_mut() {
        last.get_or_insert(1.0);
    }
    let mut floor = 0.0f32;
    for p in known.iter_mut().flatten() {
        *p = p.clamp(0.0, 1.0).max(floor);
        floor = *p;
    }

    let mut out = vec![0.0; n];
    let mut i = 0;
    while i < n {
        match known[i] {
            Some(p) => {
                out[i] = p;
                i += 1;
            }
            None => {
                let start = i - 1;
                let end = (i..n).find(|&j| known[j].is_some()).unwrap_or(n - 1);
                let (from, to) = (out[start], known[end].unwrap_or(1.0));
                let span = (end - start) as f32;
                for (k, slot) in out.iter_mut().enumerate().take(end).skip(i) {
                    *slot = from + (to - from) * (k - start) as f32 / span;
                }
                i = end;
            }
        }
    }
    out
}
