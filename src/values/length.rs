//! Lengths – normalise every supported unit to px, plus a restricted
//! two-operand `calc()` evaluator.

use super::parse_number;

/// Font size `em` and `rem` resolve against. There is no cascade, so both
/// are relative to the same root size.
pub const BASE_FONT_SIZE: f32 = 16.0;

/// px per unit for every supported absolute and font-relative unit.
fn unit_factor(unit: &str) -> Option<f32> {
    let factor = match unit {
        "" | "px" => 1.0,
        "pt" => 96.0 / 72.0,
        "pc" => 16.0,
        "in" => 96.0,
        "cm" => 96.0 / 2.54,
        "mm" => 96.0 / 25.4,
        "q" => 96.0 / 101.6,
        "em" | "rem" => BASE_FONT_SIZE,
        _ => return None,
    };
    Some(factor)
}

/// One side of a `calc()` expression.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Operand {
    /// A unitless number (the scalar in `*` and `/`).
    Number(f32),
    /// A length already converted to px.
    Length(f32),
}

impl Operand {
    fn px(self) -> f32 {
        match self {
            Operand::Number(v) | Operand::Length(v) => v,
        }
    }
}

fn parse_operand(input: &str) -> Option<Operand> {
    let s = input.trim().to_ascii_lowercase();
    if let Some(n) = parse_number(&s) {
        return Some(Operand::Number(n));
    }
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .filter(|&i| i > 0)?;
    let (number, unit) = s.split_at(split);
    let value = parse_number(number)?;
    Some(Operand::Length(value * unit_factor(unit)?))
}

/// Evaluate `a <op> b`. `+`/`-` need surrounding whitespace (as in CSS) so
/// they are not confused with a sign; `*` and `/` need a unitless operand.
fn evaluate(expr: &str) -> Option<f32> {
    let expr = expr.trim();
    for op in [" + ", " - "] {
        if let Some(i) = expr.find(op) {
            let lhs = parse_operand(&expr[..i])?.px();
            let rhs = parse_operand(&expr[i + op.len()..])?.px();
            return Some(if op == " + " { lhs + rhs } else { lhs - rhs });
        }
    }
    if let Some(i) = expr.find('*') {
        let lhs = parse_operand(&expr[..i])?;
        let rhs = parse_operand(&expr[i + 1..])?;
        return match (lhs, rhs) {
            (Operand::Length(_), Operand::Length(_)) => None,
            (a, b) => Some(a.px() * b.px()),
        };
    }
    if let Some(i) = expr.find('/') {
        let lhs = parse_operand(&expr[..i])?;
        let rhs = match parse_operand(&expr[i + 1..])? {
            Operand::Number(n) => n,
            Operand::Length(_) => return None,
        };
        if rhs == 0.0 {
            return None;
        }
        return Some(lhs.px() / rhs);
    }
    parse_operand(expr).map(Operand::px)
}

/// Parse a length to px. Accepts a plain `<number><unit>`, a bare number,
/// or a two-operand `calc(a op b)`. Percentages are not lengths here.
pub fn parse_length(input: &str) -> Option<f32> {
    let s = input.trim();
    let lower = s.to_ascii_lowercase();
    if let Some(inner) = lower
        .strip_prefix("calc(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return evaluate(inner).filter(|v| v.is_finite());
    }
    if lower.contains(' ') {
        return evaluate(&lower).filter(|v| v.is_finite());
    }
    parse_operand(&lower).map(Operand::px)
}

/// Re-render a length in the canonical unit, e.g. `1in` → `96px`.
pub fn canonicalize(input: &str) -> Option<String> {
    parse_length(input).map(|px| format!("{px}px"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f32>, b: f32) -> bool {
        a.map(|a| (a - b).abs() < 0.001).unwrap_or(false)
    }

    #[test]
    fn units_normalise_to_px() {
        assert!(close(parse_length("12px"), 12.0));
        assert!(close(parse_length("12"), 12.0));
        assert!(close(parse_length("12pt"), 16.0));
        assert!(close(parse_length("1in"), 96.0));
        assert!(close(parse_length("2.54cm"), 96.0));
        assert!(close(parse_length("1.5rem"), 24.0));
        assert!(close(parse_length("1PC"), 16.0));
        assert_eq!(parse_length("12furlongs"), None);
        assert_eq!(parse_length("50%"), None);
        assert_eq!(parse_length("px"), None);
    }

    #[test]
    fn calc_two_operands() {
        assert!(close(parse_length("calc(10px + 1rem)"), 26.0));
        assert!(close(parse_length("calc(100px - 30px)"), 70.0));
        assert!(close(parse_length("calc(4px * 3)"), 12.0));
        assert!(close(parse_length("calc(3*4px)"), 12.0));
        assert!(close(parse_length("calc(30px / 2)"), 15.0));
        assert!(close(parse_length("10px + 5px"), 15.0));
    }

    #[test]
    fn calc_rejects_bad_forms() {
        assert_eq!(parse_length("calc(10px / 0)"), None);
        assert_eq!(parse_length("calc(10px * 2px)"), None);
        assert_eq!(parse_length("calc(10px / 2px)"), None);
        assert_eq!(parse_length("calc(50% - 10px)"), None);
    }

    #[test]
    fn canonical_form_is_a_fixed_point() {
        for input in ["3px", "3pt", "1pc", "1in", "2cm", "10mm", "8q", "2em", "1.25rem", "7"] {
            let canonical = canonicalize(input).unwrap();
            assert_eq!(canonicalize(&canonical), Some(canonical.clone()), "{input}");
            assert!(close(parse_length(&canonical), parse_length(input).unwrap()));
        }
    }
}
