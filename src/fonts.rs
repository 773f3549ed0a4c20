//! Font loading and text measurement using `ttf-parser`.
//!
//! Faces are addressed by [`FontName`] (family plus a style name such as
//! "Semi Bold Italic"). Registered TTF/OTF faces are measured from glyph
//! advances; the builtin default faces use an average-width heuristic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::FontError;

/// Family used when a requested face cannot be loaded.
pub const DEFAULT_FAMILY: &str = "Inter";

/// Family and style name of a face, e.g. `Inter` / `Semi Bold Italic`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    pub fn regular(family: impl Into<String>) -> Self {
        Self::new(family, "Regular")
    }

    /// Build the style name from a numeric weight and italic flag.
    pub fn from_weight(family: impl Into<String>, weight: u16, italic: bool) -> Self {
        Self::new(family, style_name(weight, italic))
    }
}

/// Map a CSS weight to the style names used by the target model.
pub fn style_name(weight: u16, italic: bool) -> String {
    let base = match weight {
        0..=149 => "Thin",
        150..=249 => "Extra Light",
        250..=349 => "Light",
        350..=449 => "Regular",
        450..=549 => "Medium",
        550..=649 => "Semi Bold",
        650..=749 => "Bold",
        750..=849 => "Extra Bold",
        _ => "Black",
    };
    match (italic, base) {
        (true, "Regular") => "Italic".to_string(),
        (true, _) => format!("{base} Italic"),
        (false, _) => base.to_string(),
    }
}

/// Source of font faces for text leaves. Loading is the one resource
/// acquisition made per leaf.
pub trait FontProvider {
    /// Make `name` available, or report why it cannot be.
    fn load_font(&mut self, name: &FontName) -> Result<(), FontError>;

    /// Advance width of a single line of `text` in px.
    fn measure(&self, text: &str, name: &FontName, font_size: f32, letter_spacing: f32) -> f32;

    /// Line height in px for `line-height: normal`.
    fn normal_line_height(&self, name: &FontName, font_size: f32) -> f32;
}

/// A loaded font face with metrics.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API). Empty for
    /// heuristic faces.
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
    pub descender: f32,
    pub line_gap: f32,
    /// Average advance as a fraction of the font size (heuristic faces).
    pub average_advance: f32,
}

impl FontData {
    fn heuristic(average_advance: f32) -> Self {
        Self {
            bytes: Vec::new(),
            units_per_em: 1000.0,
            ascender: 969.0,
            descender: -242.0,
            line_gap: 0.0,
            average_advance,
        }
    }
}

/// Registry of loaded faces.
pub struct FontManager {
    fonts: HashMap<FontName, FontData>,
}

impl FontManager {
    /// An empty registry. Nothing loads until faces are registered.
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    /// Register a TTF/OTF face from bytes.
    pub fn register_font(&mut self, name: FontName, bytes: Vec<u8>) -> Result<(), FontError> {
        let face =
            ttf_parser::Face::parse(&bytes, 0).map_err(|e| FontError::Parse(e.to_string()))?;
        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            descender: face.descender() as f32,
            line_gap: face.line_gap() as f32,
            average_advance: 0.5,
            bytes,
        };
        log::debug!("registered font {} {}", name.family, name.style);
        self.fonts.insert(name, data);
        Ok(())
    }

    /// Register the builtin heuristic faces of the default family. Bold
    /// faces are about 10% wider.
    pub fn ensure_default(&mut self) {
        for (style, advance) in [
            ("Regular", 0.5),
            ("Italic", 0.5),
            ("Medium", 0.52),
            ("Semi Bold", 0.53),
            ("Bold", 0.55),
            ("Bold Italic", 0.55),
        ] {
            self.fonts
                .entry(FontName::new(DEFAULT_FAMILY, style))
                .or_insert_with(|| FontData::heuristic(advance));
        }
    }

    pub fn contains(&self, name: &FontName) -> bool {
        self.fonts.contains_key(name)
    }

    /// Face data for `name`, else the default family's face of the same
    /// style, else the default Regular.
    fn face(&self, name: &FontName) -> Option<&FontData> {
        self.fonts
            .get(name)
            .or_else(|| {
                self.fonts
                    .get(&FontName::new(DEFAULT_FAMILY, name.style.clone()))
            })
            .or_else(|| self.fonts.get(&FontName::regular(DEFAULT_FAMILY)))
    }

    /// All registered faces, sorted.
    pub fn names(&self) -> Vec<FontName> {
        let mut names: Vec<FontName> = self.fonts.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for FontManager {
    fn default() -> Self {
        let mut mgr = Self::new();
        mgr.ensure_default();
        mgr
    }
}

impl FontProvider for FontManager {
    fn load_font(&mut self, name: &FontName) -> Result<(), FontError> {
        if self.fonts.contains_key(name) {
            Ok(())
        } else {
            Err(FontError::NotFound {
                family: name.family.clone(),
                style: name.style.clone(),
            })
        }
    }

    /// If we have actual font bytes, we sum glyph advances. Otherwise we use
    /// the face's average advance (0.5 × font_size per char by default).
    fn measure(&self, text: &str, name: &FontName, font_size: f32, letter_spacing: f32) -> f32 {
        let chars = text.chars().count() as f32;
        let spacing = letter_spacing * chars;
        let Some(data) = self.face(name) else {
            return chars * font_size * 0.5 + spacing;
        };
        if data.bytes.is_empty() {
            return chars * font_size * data.average_advance + spacing;
        }
        match ttf_parser::Face::parse(&data.bytes, 0) {
            Ok(face) => {
                let scale = font_size / data.units_per_em;
                let width: f32 = text
                    .chars()
                    .map(|ch| match face.glyph_index(ch) {
                        Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                        // Missing glyph
                        None => font_size * 0.5,
                    })
                    .sum();
                width + spacing
            }
            Err(_) => chars * font_size * 0.5 + spacing,
        }
    }

    fn normal_line_height(&self, name: &FontName, font_size: f32) -> f32 {
        match self.face(name) {
            Some(data) => {
                (data.ascender - data.descender + data.line_gap) / data.units_per_em * font_size
            }
            None => font_size * 1.2,
        }
    }
}

/// Word-wrap text to fit within `max_width` pixels. Returns a vec of lines.
pub fn wrap_text(
    text: &str,
    name: &FontName,
    font_size: f32,
    letter_spacing: f32,
    max_width: f32,
    fonts: &dyn FontProvider,
) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    // Hard breaks first
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in &words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{current_line} {word}")
            };
            let w = fonts.measure(&candidate, name, font_size, letter_spacing);
            if w > max_width && !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                current_line = candidate;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_text_width() {
        let mgr = FontManager::default();
        let w = mgr.measure("Hello", &FontName::regular(DEFAULT_FAMILY), 16.0, 0.0);
        // 5 chars × 16 × 0.5 = 40
        assert!((w - 40.0).abs() < 0.1);
        let spaced = mgr.measure("Hello", &FontName::regular(DEFAULT_FAMILY), 16.0, 1.0);
        assert!((spaced - 45.0).abs() < 0.1);
    }

    #[test]
    fn unknown_family_measures_with_default() {
        let mgr = FontManager::default();
        let w = mgr.measure("Hello", &FontName::new("Nope", "Bold"), 10.0, 0.0);
        assert!((w - 27.5).abs() < 0.1);
    }

    #[test]
    fn load_reports_missing_faces() {
        let mut mgr = FontManager::default();
        assert!(mgr.load_font(&FontName::new(DEFAULT_FAMILY, "Semi Bold")).is_ok());
        assert_eq!(
            mgr.load_font(&FontName::new("Roboto", "Regular")),
            Err(FontError::NotFound {
                family: "Roboto".into(),
                style: "Regular".into()
            })
        );
        assert!(mgr.register_font(FontName::regular("Broken"), vec![0, 1, 2]).is_err());
    }

    #[test]
    fn weight_to_style_names() {
        assert_eq!(style_name(100, false), "Thin");
        assert_eq!(style_name(400, false), "Regular");
        assert_eq!(style_name(400, true), "Italic");
        assert_eq!(style_name(600, false), "Semi Bold");
        assert_eq!(style_name(700, true), "Bold Italic");
        assert_eq!(style_name(900, false), "Black");
    }

    #[test]
    fn word_wrap_basic() {
        let mgr = FontManager::default();
        let lines = wrap_text(
            "Hello world foo bar",
            &FontName::regular(DEFAULT_FAMILY),
            16.0,
            0.0,
            60.0,
            &mgr,
        );
        assert!(lines.len() >= 2, "Expected wrapping, got {:?}", lines);
    }

    #[test]
    fn normal_line_height_from_metrics() {
        let mgr = FontManager::default();
        let h = mgr.normal_line_height(&FontName::regular(DEFAULT_FAMILY), 10.0);
        assert!((h - 12.11).abs() < 0.01);
    }
}
