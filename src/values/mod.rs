//! Value parsers – turn a single CSS property value into a typed value.
//!
//! Every parser here is lenient: it returns `None` for anything it does not
//! recognise and never panics. Callers drop unrecognised declarations.

pub mod color;
pub mod gradient;
pub mod length;
pub mod shadow;
pub mod transform;

pub use color::{parse_color, Color};
pub use gradient::{
    parse_gradient, ColorStop, Gradient, LinearGradient, RadialGradient, RadialShape,
};
pub use length::{canonicalize, parse_length};
pub use shadow::{parse_shadow_list, Shadow};
pub use transform::{parse_transform, Transform};

// ---------------------------------------------------------------------------
// Shared tokenising helpers
// ---------------------------------------------------------------------------

/// Split `input` on `sep`, ignoring separators nested inside parentheses.
///
/// `rgba(0, 0, 0, 0.5) 10%, red` split on `,` yields two parts. Parts are
/// trimmed and empty parts are dropped.
pub fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = (depth - 1).max(0),
            c if c == sep && depth == 0 => {
                let part = input[start..i].trim();
                if !part.is_empty() {
                    parts.push(part);
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    let tail = input[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }
    parts
}

/// Split on whitespace at parenthesis depth zero.
pub fn split_whitespace_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start: Option<usize> = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => {
                depth = (depth - 1).max(0);
                start.get_or_insert(i);
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&input[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        parts.push(&input[s..]);
    }
    parts
}

/// Split `name(args)` into `(name, args)`. The name is lower-cased by the
/// caller when needed; `args` excludes the outer parentheses.
pub fn function_parts(input: &str) -> Option<(&str, &str)> {
    let input = input.trim();
    let open = input.find('(')?;
    if !input.ends_with(')') {
        return None;
    }
    let name = input[..open].trim();
    if name.is_empty() {
        return None;
    }
    Some((name, &input[open + 1..input.len() - 1]))
}

/// Strict decimal number: digits with an optional sign and fraction.
/// Rejects the `inf`/`nan` spellings `str::parse` would accept.
pub fn parse_number(input: &str) -> Option<f32> {
    let s = input.trim();
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if !body.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// `50%` → `50.0`.
pub fn parse_percentage(input: &str) -> Option<f32> {
    parse_number(input.trim().strip_suffix('%')?)
}

/// Parse an angle into degrees. Accepts `deg`, `rad`, `turn`, `grad` and a
/// bare `0`.
pub fn parse_angle(input: &str) -> Option<f32> {
    let s = input.trim().to_ascii_lowercase();
    if let Some(v) = s.strip_suffix("deg") {
        return parse_number(v);
    }
    if let Some(v) = s.strip_suffix("grad") {
        return parse_number(v).map(|g| g * 0.9);
    }
    if let Some(v) = s.strip_suffix("rad") {
        return parse_number(v).map(f32::to_degrees);
    }
    if let Some(v) = s.strip_suffix("turn") {
        return parse_number(v).map(|t| t * 360.0);
    }
    match parse_number(&s) {
        Some(v) if v == 0.0 => Some(0.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_split_respects_parentheses() {
        let parts = split_top_level("rgba(0, 0, 0, 0.5) 10%, red", ',');
        assert_eq!(parts, vec!["rgba(0, 0, 0, 0.5) 10%", "red"]);
    }

    #[test]
    fn whitespace_split_respects_parentheses() {
        let parts = split_whitespace_top_level("2px 4px rgb(1, 2, 3)  inset");
        assert_eq!(parts, vec!["2px", "4px", "rgb(1, 2, 3)", "inset"]);
    }

    #[test]
    fn strict_numbers() {
        assert_eq!(parse_number("-1.5"), Some(-1.5));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("12px"), None);
    }

    #[test]
    fn angles_in_all_units() {
        assert_eq!(parse_angle("90deg"), Some(90.0));
        assert_eq!(parse_angle("0.5turn"), Some(180.0));
        assert_eq!(parse_angle("100grad"), Some(90.0));
        assert!((parse_angle("3.14159265rad").unwrap() - 180.0).abs() < 0.01);
        assert_eq!(parse_angle("0"), Some(0.0));
        assert_eq!(parse_angle("45"), None);
    }
}
