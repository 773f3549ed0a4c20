//! Shadow lists – `box-shadow: [inset] x y [blur [spread]] [color], …`.

use serde::{Deserialize, Serialize};

use super::{parse_color, parse_length, split_top_level, split_whitespace_top_level, Color};

/// Colour used when a shadow does not name one.
pub const DEFAULT_SHADOW_COLOR: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.25,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub spread: f32,
    pub color: Color,
    pub inset: bool,
}

/// Parse a comma-separated shadow list. `none` is an empty list; shadows
/// without both offsets are skipped, and a list with nothing usable is
/// `None`.
pub fn parse_shadow_list(input: &str) -> Option<Vec<Shadow>> {
    if input.trim().eq_ignore_ascii_case("none") {
        return Some(Vec::new());
    }
    let shadows: Vec<Shadow> = split_top_level(input, ',')
        .into_iter()
        .filter_map(parse_shadow)
        .collect();
    (!shadows.is_empty()).then_some(shadows)
}

fn parse_shadow(input: &str) -> Option<Shadow> {
    let mut lengths = Vec::new();
    let mut color = None;
    let mut inset = false;
    for token in split_whitespace_top_level(input) {
        if token.eq_ignore_ascii_case("inset") {
            inset = true;
        } else if let Some(px) = parse_length(token) {
            lengths.push(px);
        } else if let Some(c) = parse_color(token) {
            color = Some(c);
        } else {
            return None;
        }
    }
    let [offset_x, offset_y, rest @ ..] = lengths.as_slice() else {
        return None;
    };
    Some(Shadow {
        offset_x: *offset_x,
        offset_y: *offset_y,
        blur: rest.first().copied().unwrap_or(0.0).max(0.0),
        spread: rest.get(1).copied().unwrap_or(0.0),
        color: color.unwrap_or(DEFAULT_SHADOW_COLOR),
        inset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_shadow_with_defaults() {
        let shadows = parse_shadow_list("2px 4px").unwrap();
        assert_eq!(shadows.len(), 1);
        let s = shadows[0];
        assert_eq!((s.offset_x, s.offset_y, s.blur, s.spread), (2.0, 4.0, 0.0, 0.0));
        assert_eq!(s.color, DEFAULT_SHADOW_COLOR);
        assert!(!s.inset);
    }

    #[test]
    fn list_with_functional_colors() {
        let shadows =
            parse_shadow_list("0 1px 3px rgba(0, 0, 0, 0.1), inset 0 0 0 1px #e5e7eb").unwrap();
        assert_eq!(shadows.len(), 2);
        assert_eq!(shadows[0].blur, 3.0);
        assert!((shadows[0].color.a - 0.1).abs() < 0.01);
        assert!(shadows[1].inset);
        assert_eq!(shadows[1].spread, 1.0);
    }

    #[test]
    fn color_may_lead() {
        let shadows = parse_shadow_list("red 1px 1px 2px").unwrap();
        assert_eq!(shadows[0].color, Color::rgba(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn needs_two_offsets() {
        assert_eq!(parse_shadow_list("4px red"), None);
        assert_eq!(parse_shadow_list("none"), Some(Vec::new()));
        let shadows = parse_shadow_list("4px red, 1px 2px").unwrap();
        assert_eq!(shadows.len(), 1);
    }
}
