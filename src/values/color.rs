//! Colors – hex, `rgb()`/`rgba()`, `hsl()`/`hsla()` and named colors, all
//! normalised to an RGBA quadruple in 0.0 – 1.0.

use serde::{Deserialize, Serialize};

use super::{function_parts, parse_angle, parse_number, parse_percentage};

/// RGBA colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    fn from_rgb24(rgb: u32) -> Self {
        Self::from_bytes([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255])
    }

    pub fn from_bytes([r, g, b, a]: [u8; 4]) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Channels back as 0–255 integers.
    pub fn to_bytes(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn is_transparent(&self) -> bool {
        self.a < 0.001
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1].repeat(2), 16).ok();
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let bytes = match hex.len() {
            3 => [nibble(0)?, nibble(1)?, nibble(2)?, 255],
            4 => [nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?],
            6 => [byte(0)?, byte(2)?, byte(4)?, 255],
            8 => [byte(0)?, byte(2)?, byte(4)?, byte(6)?],
            _ => return None,
        };
        Some(Self::from_bytes(bytes))
    }

    pub fn from_named(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, rgb)| Self::from_rgb24(*rgb))
    }
}

/// Parse any supported colour syntax.
pub fn parse_color(input: &str) -> Option<Color> {
    let s = input.trim();
    if s.starts_with('#') {
        return Color::from_hex(s);
    }
    if let Some((name, args)) = function_parts(s) {
        return match name.to_ascii_lowercase().as_str() {
            "rgb" | "rgba" => parse_rgb_args(args),
            "hsl" | "hsla" => parse_hsl_args(args),
            _ => None,
        };
    }
    Color::from_named(s)
}

/// Split colour-function arguments in either the legacy comma form
/// (`1, 2, 3, 0.5`) or the modern space form (`1 2 3 / 50%`).
fn color_args(args: &str) -> Option<(Vec<&str>, Option<&str>)> {
    if args.contains(',') {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        return match parts.len() {
            3 => Some((parts, None)),
            4 => Some((parts[..3].to_vec(), Some(parts[3]))),
            _ => None,
        };
    }
    let (channels, alpha) = match args.split_once('/') {
        Some((c, a)) => (c, Some(a.trim())),
        None => (args, None),
    };
    let parts: Vec<&str> = channels.split_whitespace().collect();
    (parts.len() == 3).then_some((parts, alpha))
}

fn parse_alpha(alpha: Option<&str>) -> Option<f32> {
    match alpha {
        None => Some(1.0),
        Some(a) => parse_percentage(a)
            .map(|p| p / 100.0)
            .or_else(|| parse_number(a))
            .map(|v| v.clamp(0.0, 1.0)),
    }
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let (channels, alpha) = color_args(args)?;
    let channel = |s: &str| {
        parse_percentage(s)
            .map(|p| p / 100.0)
            .or_else(|| parse_number(s).map(|v| v / 255.0))
    };
    Some(Color::rgba(
        channel(channels[0])?,
        channel(channels[1])?,
        channel(channels[2])?,
        parse_alpha(alpha)?,
    ))
}

fn parse_hsl_args(args: &str) -> Option<Color> {
    let (channels, alpha) = color_args(args)?;
    let hue = parse_number(channels[0]).or_else(|| parse_angle(channels[0]))?;
    let saturation = parse_percentage(channels[1])? / 100.0;
    let lightness = parse_percentage(channels[2])? / 100.0;
    let (r, g, b) = hsl_to_rgb(hue, saturation.clamp(0.0, 1.0), lightness.clamp(0.0, 1.0));
    Some(Color::rgba(r, g, b, parse_alpha(alpha)?))
}

/// Hue-sector decomposition: chroma from lightness/saturation, then place
/// the chroma and the intermediate component by the 60° sector of the hue.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (f32, f32, f32) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    (r + m, g + m, b + m)
}

/// CSS named colours.
#[rustfmt::skip]
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xF0F8FF), ("antiquewhite", 0xFAEBD7), ("aqua", 0x00FFFF),
    ("aquamarine", 0x7FFFD4), ("azure", 0xF0FFFF), ("beige", 0xF5F5DC),
    ("bisque", 0xFFE4C4), ("black", 0x000000), ("blanchedalmond", 0xFFEBCD),
    ("blue", 0x0000FF), ("blueviolet", 0x8A2BE2), ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887), ("cadetblue", 0x5F9EA0), ("chartreuse", 0x7FFF00),
    ("chocolate", 0xD2691E), ("coral", 0xFF7F50), ("cornflowerblue", 0x6495ED),
    ("cornsilk", 0xFFF8DC), ("crimson", 0xDC143C), ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B), ("darkcyan", 0x008B8B), ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9), ("darkgreen", 0x006400), ("darkgrey", 0xA9A9A9),
    ("darkkhaki", 0xBDB76B), ("darkmagenta", 0x8B008B), ("darkolivegreen", 0x556B2F),
    ("darkorange", 0xFF8C00), ("darkorchid", 0x9932CC), ("darkred", 0x8B0000),
    ("darksalmon", 0xE9967A), ("darkseagreen", 0x8FBC8F), ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F), ("darkslategrey", 0x2F4F4F), ("darkturquoise", 0x00CED1),
    ("darkviolet", 0x9400D3), ("deeppink", 0xFF1493), ("deepskyblue", 0x00BFFF),
    ("dimgray", 0x696969), ("dimgrey", 0x696969), ("dodgerblue", 0x1E90FF),
    ("firebrick", 0xB22222), ("floralwhite", 0xFFFAF0), ("forestgreen", 0x228B22),
    ("fuchsia", 0xFF00FF), ("gainsboro", 0xDCDCDC), ("ghostwhite", 0xF8F8FF),
    ("gold", 0xFFD700), ("goldenrod", 0xDAA520), ("gray", 0x808080),
    ("green", 0x008000), ("greenyellow", 0xADFF2F), ("grey", 0x808080),
    ("honeydew", 0xF0FFF0), ("hotpink", 0xFF69B4), ("indianred", 0xCD5C5C),
    ("indigo", 0x4B0082), ("ivory", 0xFFFFF0), ("khaki", 0xF0E68C),
    ("lavender", 0xE6E6FA), ("lavenderblush", 0xFFF0F5), ("lawngreen", 0x7CFC00),
    ("lemonchiffon", 0xFFFACD), ("lightblue", 0xADD8E6), ("lightcoral", 0xF08080),
    ("lightcyan", 0xE0FFFF), ("lightgoldenrodyellow", 0xFAFAD2), ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90), ("lightgrey", 0xD3D3D3), ("lightpink", 0xFFB6C1),
    ("lightsalmon", 0xFFA07A), ("lightseagreen", 0x20B2AA), ("lightskyblue", 0x87CEFA),
    ("lightslategray", 0x778899), ("lightslategrey", 0x778899), ("lightsteelblue", 0xB0C4DE),
    ("lightyellow", 0xFFFFE0), ("lime", 0x00FF00), ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6), ("magenta", 0xFF00FF), ("maroon", 0x800000),
    ("mediumaquamarine", 0x66CDAA), ("mediumblue", 0x0000CD), ("mediumorchid", 0xBA55D3),
    ("mediumpurple", 0x9370DB), ("mediumseagreen", 0x3CB371), ("mediumslateblue", 0x7B68EE),
    ("mediumspringgreen", 0x00FA9A), ("mediumturquoise", 0x48D1CC), ("mediumvioletred", 0xC71585),
    ("midnightblue", 0x191970), ("mintcream", 0xF5FFFA), ("mistyrose", 0xFFE4E1),
    ("moccasin", 0xFFE4B5), ("navajowhite", 0xFFDEAD), ("navy", 0x000080),
    ("oldlace", 0xFDF5E6), ("olive", 0x808000), ("olivedrab", 0x6B8E23),
    ("orange", 0xFFA500), ("orangered", 0xFF4500), ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA), ("palegreen", 0x98FB98), ("paleturquoise", 0xAFEEEE),
    ("palevioletred", 0xDB7093), ("papayawhip", 0xFFEFD5), ("peachpuff", 0xFFDAB9),
    ("peru", 0xCD853F), ("pink", 0xFFC0CB), ("plum", 0xDDA0DD),
    ("powderblue", 0xB0E0E6), ("purple", 0x800080), ("rebeccapurple", 0x663399),
    ("red", 0xFF0000), ("rosybrown", 0xBC8F8F), ("royalblue", 0x4169E1),
    ("saddlebrown", 0x8B4513), ("salmon", 0xFA8072), ("sandybrown", 0xF4A460),
    ("seagreen", 0x2E8B57), ("seashell", 0xFFF5EE), ("sienna", 0xA0522D),
    ("silver", 0xC0C0C0), ("skyblue", 0x87CEEB), ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090), ("slategrey", 0x708090), ("snow", 0xFFFAFA),
    ("springgreen", 0x00FF7F), ("steelblue", 0x4682B4), ("tan", 0xD2B48C),
    ("teal", 0x008080), ("thistle", 0xD8BFD8), ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0), ("violet", 0xEE82EE), ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF), ("whitesmoke", 0xF5F5F5), ("yellow", 0xFFFF00),
    ("yellowgreen", 0x9ACD32),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(c: Color, r: f32, g: f32, b: f32, a: f32) -> bool {
        (c.r - r).abs() < 0.01
            && (c.g - g).abs() < 0.01
            && (c.b - b).abs() < 0.01
            && (c.a - a).abs() < 0.01
    }

    #[test]
    fn color_from_hex() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert!(approx(parse_color("#0f08").unwrap(), 0.0, 1.0, 0.0, 0.533));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#ggg"), None);
    }

    #[test]
    fn hex_round_trips_through_bytes() {
        for hex in [
            "#000", "#abc", "#fff", "#123456", "#a1b2c3", "#00000000", "#7f3e9c80", "#ffffffff",
        ] {
            let c = parse_color(hex).unwrap();
            for ch in [c.r, c.g, c.b, c.a] {
                assert!((0.0..=1.0).contains(&ch));
            }
            let digits = hex.trim_start_matches('#');
            let expanded: String = if digits.len() == 3 {
                digits.chars().flat_map(|c| [c, c]).collect()
            } else {
                digits.to_string()
            };
            let bytes = c.to_bytes();
            let back = format!("{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2]);
            assert_eq!(back, expanded[..6]);
            if expanded.len() == 8 {
                assert_eq!(format!("{:02x}", bytes[3]), expanded[6..]);
            }
        }
    }

    #[test]
    fn functional_rgb() {
        assert!(approx(parse_color("rgb(255, 0, 0)").unwrap(), 1.0, 0.0, 0.0, 1.0));
        assert!(approx(parse_color("rgba(0, 0, 255, 0.5)").unwrap(), 0.0, 0.0, 1.0, 0.5));
        assert!(approx(parse_color("rgb(0 128 0 / 25%)").unwrap(), 0.0, 0.502, 0.0, 0.25));
        assert!(approx(parse_color("rgb(100%, 50%, 0%)").unwrap(), 1.0, 0.5, 0.0, 1.0));
        assert_eq!(parse_color("rgb(1, 2)"), None);
    }

    #[test]
    fn functional_hsl() {
        assert!(approx(parse_color("hsl(0, 100%, 50%)").unwrap(), 1.0, 0.0, 0.0, 1.0));
        assert!(approx(parse_color("hsl(120, 100%, 25%)").unwrap(), 0.0, 0.5, 0.0, 1.0));
        assert!(approx(parse_color("hsla(240deg, 100%, 50%, 0.3)").unwrap(), 0.0, 0.0, 1.0, 0.3));
        assert!(approx(parse_color("hsl(0, 0%, 100%)").unwrap(), 1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn named_colors() {
        assert!(approx(parse_color("RebeccaPurple").unwrap(), 0.4, 0.2, 0.6, 1.0));
        assert!(parse_color("transparent").unwrap().is_transparent());
        assert_eq!(parse_color("blurple"), None);
    }
}
