//! Transforms – `rotate`, `translate`, `scale` and `skew` functions folded
//! into one record.

use serde::{Deserialize, Serialize};

use super::{parse_angle, parse_length, parse_number, split_top_level};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Clockwise degrees, as CSS writes them.
    pub rotate: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub skew_x: f32,
    pub skew_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotate: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
        }
    }
}

impl Transform {
    /// The common scale factor when both axes scale alike.
    pub fn uniform_scale(&self) -> Option<f32> {
        ((self.scale_x - self.scale_y).abs() < f32::EPSILON).then_some(self.scale_x)
    }

    pub fn has_translation(&self) -> bool {
        self.translate_x != 0.0 || self.translate_y != 0.0
    }
}

/// Parse a transform list such as `rotate(45deg) scale(2)`.
///
/// Functions with arguments that cannot be resolved (percent translations,
/// 3D forms, `matrix()`) are skipped. Returns `None` when nothing in the
/// list was understood.
pub fn parse_transform(input: &str) -> Option<Transform> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("none") {
        return Some(Transform::default());
    }
    let mut t = Transform::default();
    let mut recognised = false;
    for (name, args) in functions(input) {
        let args = split_top_level(args, ',');
        if apply_function(&mut t, &name.to_ascii_lowercase(), &args).is_some() {
            recognised = true;
        }
    }
    recognised.then_some(t)
}

/// Iterate `name(args)` pairs in a space-separated function list.
fn functions(input: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut rest = input;
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        let name = rest[..open].trim();
        out.push((name, &rest[open + 1..open + close]));
        rest = &rest[open + close + 1..];
    }
    out
}

fn apply_function(t: &mut Transform, name: &str, args: &[&str]) -> Option<()> {
    match (name, args) {
        ("rotate" | "rotatez", [a]) => t.rotate += parse_angle(a)?,
        ("translate", [x]) => t.translate_x += parse_length(x)?,
        ("translate", [x, y]) => {
            let (x, y) = (parse_length(x)?, parse_length(y)?);
            t.translate_x += x;
            t.translate_y += y;
        }
        ("translatex", [x]) => t.translate_x += parse_length(x)?,
        ("translatey", [y]) => t.translate_y += parse_length(y)?,
        ("scale", [s]) => {
            let s = parse_number(s)?;
            t.scale_x *= s;
            t.scale_y *= s;
        }
        ("scale", [x, y]) => {
            let (x, y) = (parse_number(x)?, parse_number(y)?);
            t.scale_x *= x;
            t.scale_y *= y;
        }
        ("scalex", [x]) => t.scale_x *= parse_number(x)?,
        ("scaley", [y]) => t.scale_y *= parse_number(y)?,
        ("skew", [x]) => t.skew_x += parse_angle(x)?,
        ("skew", [x, y]) => {
            let (x, y) = (parse_angle(x)?, parse_angle(y)?);
            t.skew_x += x;
            t.skew_y += y;
        }
        ("skewx", [x]) => t.skew_x += parse_angle(x)?,
        ("skewy", [y]) => t.skew_y += parse_angle(y)?,
        _ => return None,
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_and_scale() {
        let t = parse_transform("rotate(45deg) scale(2)").unwrap();
        assert_eq!(t.rotate, 45.0);
        assert_eq!(t.uniform_scale(), Some(2.0));
    }

    #[test]
    fn translate_forms() {
        let t = parse_transform("translate(10px, 5px) translateY(1rem)").unwrap();
        assert_eq!((t.translate_x, t.translate_y), (10.0, 21.0));
        assert!(t.has_translation());
    }

    #[test]
    fn non_uniform_scale_and_skew() {
        let t = parse_transform("scale(2, 3) skewX(10deg)").unwrap();
        assert_eq!(t.uniform_scale(), None);
        assert_eq!(t.skew_x, 10.0);
    }

    #[test]
    fn unresolvable_functions_are_skipped() {
        let t = parse_transform("translate(-50%, -50%) rotate(0.25turn)").unwrap();
        assert_eq!(t.rotate, 90.0);
        assert!(!t.has_translation());
        assert_eq!(parse_transform("matrix(1, 0, 0, 1, 0, 0)"), None);
        assert_eq!(parse_transform("none"), Some(Transform::default()));
    }
}
