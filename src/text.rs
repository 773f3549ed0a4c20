//! Text leaves – typography, font fallback and wrap decisions.
//!
//! A leaf is measured once when it is created and again whenever its width
//! changes during the nested re-resolution pass.

use crate::document::{LineHeightValue, TextAlignHorizontal, TextAutoResize, TextDecorationKind};
use crate::error::SynthesisError;
use crate::fonts::{wrap_text, FontName, FontProvider};
use crate::style::{
    Element, FontStyle, LineHeight, Style, TextAlign, TextDecoration, TextTransform, WhiteSpace,
};
use crate::values::Color;

const ELLIPSIS: char = '\u{2026}';

/// Typography defaults applied when a leaf does not declare them.
#[derive(Debug, Clone)]
pub struct TextDefaults {
    pub font_family: String,
    pub font_size: f32,
}

/// Everything needed to create and re-measure a text leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    pub characters: String,
    pub font_name: FontName,
    pub font_size: f32,
    pub line_height: LineHeight,
    pub letter_spacing: f32,
    pub align: TextAlignHorizontal,
    pub decoration: TextDecorationKind,
    pub color: Color,
    pub white_space: WhiteSpace,
    pub ellipsis: bool,
}

/// Resolved box of a text leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGeometry {
    pub characters: String,
    pub width: f32,
    pub height: f32,
    pub auto_resize: TextAutoResize,
    pub lines: usize,
}

/// True when the element is synthesized as a bare text node rather than a
/// box: it has text, no element children and nothing painted as a box.
pub fn is_text_leaf(el: &Element) -> bool {
    if el.tag == crate::dom::Tag::Text {
        return true;
    }
    el.text.as_deref().is_some_and(|t| !t.trim().is_empty())
        && el.children.is_empty()
        && !el.is_replaced()
        && !el.style.has_box_visuals()
}

/// Build the spec for `text` using the typography of `typography` (the
/// element's own style, or the enclosing element's for anonymous runs).
pub fn text_spec(
    text: &str,
    typography: &Style,
    color: Option<Color>,
    defaults: &TextDefaults,
) -> TextSpec {
    let white_space = typography.white_space.unwrap_or(WhiteSpace::Normal);
    let characters = apply_text_transform(
        &collapse_whitespace(text, white_space),
        typography.text_transform.unwrap_or(TextTransform::None),
    );
    let family = typography
        .font_family
        .clone()
        .unwrap_or_else(|| defaults.font_family.clone());
    let italic = typography.font_style == Some(FontStyle::Italic);
    TextSpec {
        characters,
        font_name: FontName::from_weight(family, typography.font_weight.unwrap_or(400), italic),
        font_size: typography.font_size.unwrap_or(defaults.font_size),
        line_height: typography.line_height.unwrap_or(LineHeight::Normal),
        letter_spacing: typography.letter_spacing.unwrap_or(0.0),
        align: match typography.text_align {
            Some(TextAlign::Center) => TextAlignHorizontal::Center,
            Some(TextAlign::Right) => TextAlignHorizontal::Right,
            Some(TextAlign::Justify) => TextAlignHorizontal::Justified,
            Some(TextAlign::Left) | None => TextAlignHorizontal::Left,
        },
        decoration: match typography.text_decoration {
            Some(TextDecoration::Underline) => TextDecorationKind::Underline,
            Some(TextDecoration::Strikethrough) => TextDecorationKind::Strikethrough,
            Some(TextDecoration::None) | None => TextDecorationKind::None,
        },
        color: color.unwrap_or(Color::BLACK),
        white_space,
        ellipsis: typography.text_overflow_ellipsis.unwrap_or(false),
    }
}

/// Collapse runs of whitespace unless the white-space mode preserves them.
pub fn collapse_whitespace(text: &str, mode: WhiteSpace) -> String {
    match mode {
        WhiteSpace::Pre | WhiteSpace::PreWrap => text.trim_matches('\n').to_string(),
        WhiteSpace::Normal | WhiteSpace::NoWrap => {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        }
    }
}

pub fn apply_text_transform(text: &str, transform: TextTransform) -> String {
    match transform {
        TextTransform::None => text.to_string(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
        TextTransform::Capitalize => {
            let mut out = String::with_capacity(text.len());
            let mut at_word_start = true;
            for ch in text.chars() {
                if at_word_start && ch.is_alphabetic() {
                    out.extend(ch.to_uppercase());
                } else {
                    out.push(ch);
                }
                at_word_start = ch.is_whitespace();
            }
            out
        }
    }
}

/// Load the requested face, then the default family in the same style,
/// then the default family's Regular. Returns the face that loaded.
pub fn load_with_fallback(
    fonts: &mut dyn FontProvider,
    requested: &FontName,
    default_family: &str,
) -> Result<FontName, SynthesisError> {
    let chain = [
        requested.clone(),
        FontName::new(default_family, requested.style.clone()),
        FontName::regular(default_family),
    ];
    for (tier, candidate) in chain.iter().enumerate() {
        match fonts.load_font(candidate) {
            Ok(()) => {
                if tier > 0 {
                    log::debug!(
                        "font {} {} unavailable, using {} {}",
                        requested.family,
                        requested.style,
                        candidate.family,
                        candidate.style
                    );
                }
                return Ok(candidate.clone());
            }
            Err(e) => log::trace!("{e}"),
        }
    }
    Err(SynthesisError::FontExhausted {
        family: requested.family.clone(),
        style: requested.style.clone(),
    })
}

/// Line height of one line in px.
pub fn line_height_px(spec: &TextSpec, fonts: &dyn FontProvider) -> f32 {
    match spec.line_height {
        LineHeight::Px(px) => px,
        LineHeight::Multiplier(m) => m * spec.font_size,
        LineHeight::Normal => fonts.normal_line_height(&spec.font_name, spec.font_size),
    }
}

/// The line height as the target model states it.
pub fn line_height_value(line_height: LineHeight) -> LineHeightValue {
    match line_height {
        LineHeight::Normal => LineHeightValue::Auto,
        LineHeight::Px(px) => LineHeightValue::Pixels(px),
        LineHeight::Multiplier(m) => LineHeightValue::Percent(m * 100.0),
    }
}

/// Decide the wrap mode and box of a leaf.
///
/// `width` is a width the leaf must take (it fills a known container);
/// `available` is the constraint a hugging leaf wraps against.
pub fn measure_leaf(
    spec: &TextSpec,
    fonts: &dyn FontProvider,
    width: Option<f32>,
    available: Option<f32>,
) -> TextGeometry {
    let lh = line_height_px(spec, fonts);
    let measure = |s: &str| fonts.measure(s, &spec.font_name, spec.font_size, spec.letter_spacing);
    let natural = spec
        .characters
        .split('\n')
        .map(measure)
        .fold(0.0f32, f32::max);
    let hard_lines = spec.characters.split('\n').count().max(1);

    if matches!(spec.white_space, WhiteSpace::NoWrap | WhiteSpace::Pre) {
        let limit = width.or(available);
        if let Some(limit) = limit.filter(|l| spec.ellipsis && natural > *l) {
            let characters = truncate_to_width(&spec.characters, limit, &measure);
            return TextGeometry {
                characters,
                width: limit,
                height: lh,
                auto_resize: TextAutoResize::Truncate,
                lines: 1,
            };
        }
        return TextGeometry {
            characters: spec.characters.clone(),
            width: natural,
            height: lh * hard_lines as f32,
            auto_resize: TextAutoResize::WidthAndHeight,
            lines: hard_lines,
        };
    }

    if let Some(limit) = width.or(available) {
        if spec.ellipsis && natural > limit {
            return TextGeometry {
                characters: truncate_to_width(&spec.characters, limit, &measure),
                width: limit,
                height: lh,
                auto_resize: TextAutoResize::Truncate,
                lines: 1,
            };
        }
        if width.is_some() || natural > limit {
            return wrap_at(spec, fonts, limit);
        }
    }

    TextGeometry {
        characters: spec.characters.clone(),
        width: natural,
        height: lh * hard_lines as f32,
        auto_resize: TextAutoResize::WidthAndHeight,
        lines: hard_lines,
    }
}

/// Wrap at a fixed width; the height follows the line count.
pub fn wrap_at(spec: &TextSpec, fonts: &dyn FontProvider, width: f32) -> TextGeometry {
    let lh = line_height_px(spec, fonts);
    let lines = wrap_text(
        &spec.characters,
        &spec.font_name,
        spec.font_size,
        spec.letter_spacing,
        width,
        fonts,
    )
    .len();
    TextGeometry {
        characters: spec.characters.clone(),
        width,
        height: lh * lines as f32,
        auto_resize: TextAutoResize::Height,
        lines,
    }
}

/// Cut `text` so that it plus an ellipsis fits `width`.
fn truncate_to_width(text: &str, width: f32, measure: &dyn Fn(&str) -> f32) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut keep = chars.len();
    while keep > 0 {
        let candidate: String = chars[..keep].iter().chain([ELLIPSIS].iter()).collect();
        if measure(&candidate) <= width {
            return candidate;
        }
        keep -= 1;
    }
    ELLIPSIS.to_string()
}
