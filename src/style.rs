//! Style model – parses inline `style` declarations into a sparse [`Style`]
//! record and pairs it with the element tree consumed by the synthesizer.
//!
//! Every field is optional: `None` means "not specified", which is not the
//! same as the default value. Several synthesis rules (default stretch,
//! default fill) depend on whether a property was written at all.

use crate::dom::{DomNode, ElementNode, Tag, TagCategory};
use crate::values::{
    parse_color, parse_gradient, parse_length, parse_number, parse_percentage, parse_shadow_list,
    parse_transform, split_top_level, split_whitespace_top_level, Color, Gradient, Shadow,
    Transform,
};

/// Sparse style for a single element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    // Display / layout
    pub display: Option<Display>,
    pub flex_direction: Option<FlexDirection>,
    pub flex_wrap: Option<FlexWrap>,
    pub flex_grow: Option<f32>,
    pub justify_content: Option<JustifyContent>,
    pub align_items: Option<AlignItems>,
    pub align_self: Option<AlignItems>,
    pub row_gap: Option<f32>,
    pub column_gap: Option<f32>,

    // Sizing
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    pub aspect_ratio: Option<f32>,
    pub box_sizing: Option<BoxSizing>,

    // Spacing (px)
    pub margin: Sides<Option<Margin>>,
    pub padding: Sides<Option<f32>>,

    // Positioning
    pub position: Option<Position>,
    pub inset: Sides<Option<Dimension>>,
    pub z_index: Option<i32>,

    // Paint
    pub background_color: Option<Color>,
    pub background_gradients: Vec<Gradient>,
    pub color: Option<Color>,
    pub opacity: Option<f32>,
    pub visibility: Option<Visibility>,
    pub overflow_hidden: Option<bool>,
    pub border_width: Sides<Option<f32>>,
    pub border_color: Option<Color>,
    pub border_style: Option<BorderStyle>,
    pub border_radius: Corners<Option<Dimension>>,
    pub box_shadow: Option<Vec<Shadow>>,
    pub blur: Option<f32>,
    pub backdrop_blur: Option<f32>,
    pub transform: Option<Transform>,

    // Typography
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    pub line_height: Option<LineHeight>,
    pub letter_spacing: Option<f32>,
    pub text_align: Option<TextAlign>,
    pub text_decoration: Option<TextDecoration>,
    pub text_transform: Option<TextTransform>,
    pub white_space: Option<WhiteSpace>,
    pub text_overflow_ellipsis: Option<bool>,
}

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Flex,
    InlineFlex,
    Grid,
    Inline,
    InlineBlock,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexDirection {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexWrap {
    NoWrap,
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JustifyContent {
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignItems {
    Start,
    End,
    Center,
    Baseline,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSizing {
    ContentBox,
    BorderBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Static,
    Relative,
    Absolute,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    None,
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDecoration {
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTransform {
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteSpace {
    Normal,
    NoWrap,
    Pre,
    PreWrap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
    Normal,
    Px(f32),
    Multiplier(f32),
}

/// A size along one axis: a concrete length, a percentage of the parent,
/// `auto` (hug) or `fill`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Px(f32),
    Percent(f32),
    Auto,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Margin {
    Px(f32),
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> Sides<T> {
    pub fn all(v: T) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// CSS 1–4 value expansion (top, right, bottom, left).
    fn expand(values: &[T]) -> Option<Self> {
        let [top, right, bottom, left] = match *values {
            [a] => [a, a, a, a],
            [a, b] => [a, b, a, b],
            [a, b, c] => [a, b, c, b],
            [a, b, c, d] => [a, b, c, d],
            _ => return None,
        };
        Some(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl Sides<Option<f32>> {
    pub fn resolved(&self) -> Sides<f32> {
        Sides {
            top: self.top.unwrap_or(0.0),
            right: self.right.unwrap_or(0.0),
            bottom: self.bottom.unwrap_or(0.0),
            left: self.left.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Corners<T> {
    pub top_left: T,
    pub top_right: T,
    pub bottom_right: T,
    pub bottom_left: T,
}

impl<T: Copy> Corners<T> {
    /// CSS 1–4 value expansion (top-left, top-right, bottom-right, bottom-left).
    fn expand(values: &[T]) -> Option<Self> {
        let [top_left, top_right, bottom_right, bottom_left] = match *values {
            [a] => [a, a, a, a],
            [a, b] => [a, b, a, b],
            [a, b, c] => [a, b, c, b],
            [a, b, c, d] => [a, b, c, d],
            _ => return None,
        };
        Some(Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        })
    }
}

// ---------------------------------------------------------------------------
// Style resolution
// ---------------------------------------------------------------------------

impl Style {
    /// Parse a `style` attribute. Unknown properties and unparseable values
    /// are dropped.
    pub fn parse(declarations: &str) -> Self {
        let mut style = Self::default();
        style.apply_declarations(declarations);
        style
    }

    pub fn apply_declarations(&mut self, declarations: &str) {
        for decl in split_top_level(declarations, ';') {
            let Some((prop, val)) = decl.split_once(':') else {
                continue;
            };
            let prop = prop.trim().to_ascii_lowercase();
            let val = val.trim();
            let val = val
                .strip_suffix("!important")
                .map(str::trim_end)
                .unwrap_or(val);
            if !self.apply_property(&prop, val) {
                log::trace!("dropping declaration `{prop}: {val}`");
            }
        }
    }

    /// Apply one declaration. Returns `false` when it was not understood.
    pub fn apply_property(&mut self, prop: &str, val: &str) -> bool {
        let lower = val.to_ascii_lowercase();
        let v = lower.as_str();
        match prop {
            "display" => set(&mut self.display, parse_display(v)),
            "flex-direction" => set(
                &mut self.flex_direction,
                match v {
                    "row" | "row-reverse" => Some(FlexDirection::Row),
                    "column" | "column-reverse" => Some(FlexDirection::Column),
                    _ => None,
                },
            ),
            "flex-wrap" => set(
                &mut self.flex_wrap,
                match v {
                    "wrap" | "wrap-reverse" => Some(FlexWrap::Wrap),
                    "nowrap" => Some(FlexWrap::NoWrap),
                    _ => None,
                },
            ),
            "flex" => set(&mut self.flex_grow, parse_flex_shorthand(v)),
            "flex-grow" => set(&mut self.flex_grow, parse_number(v).filter(|g| *g >= 0.0)),
            "justify-content" => set(&mut self.justify_content, parse_justify(v)),
            "align-items" => set(&mut self.align_items, parse_align(v)),
            "align-self" => set(&mut self.align_self, parse_align(v)),
            "gap" | "grid-gap" => {
                let parts: Option<Vec<f32>> = v.split_whitespace().map(parse_length).collect();
                match parts.as_deref() {
                    Some([g]) => {
                        self.row_gap = Some(*g);
                        self.column_gap = Some(*g);
                        true
                    }
                    Some([r, c]) => {
                        self.row_gap = Some(*r);
                        self.column_gap = Some(*c);
                        true
                    }
                    _ => false,
                }
            }
            "row-gap" => set(&mut self.row_gap, parse_length(v)),
            "column-gap" => set(&mut self.column_gap, parse_length(v)),

            "width" => set(&mut self.width, parse_dimension(v)),
            "height" => set(&mut self.height, parse_dimension(v)),
            "min-width" => set(&mut self.min_width, parse_length(v)),
            "max-width" => set(&mut self.max_width, parse_length(v)),
            "min-height" => set(&mut self.min_height, parse_length(v)),
            "max-height" => set(&mut self.max_height, parse_length(v)),
            "aspect-ratio" => set(&mut self.aspect_ratio, parse_aspect_ratio(v)),
            "box-sizing" => set(
                &mut self.box_sizing,
                match v {
                    "border-box" => Some(BoxSizing::BorderBox),
                    "content-box" => Some(BoxSizing::ContentBox),
                    _ => None,
                },
            ),

            "margin" => {
                let values: Option<Vec<Margin>> = v.split_whitespace().map(parse_margin).collect();
                match values.as_deref().and_then(Sides::expand) {
                    Some(sides) => {
                        self.margin = Sides {
                            top: Some(sides.top),
                            right: Some(sides.right),
                            bottom: Some(sides.bottom),
                            left: Some(sides.left),
                        };
                        true
                    }
                    None => false,
                }
            }
            "margin-top" => set(&mut self.margin.top, parse_margin(v)),
            "margin-right" => set(&mut self.margin.right, parse_margin(v)),
            "margin-bottom" => set(&mut self.margin.bottom, parse_margin(v)),
            "margin-left" => set(&mut self.margin.left, parse_margin(v)),
            "padding" => {
                let values: Option<Vec<f32>> = v.split_whitespace().map(parse_length).collect();
                match values.as_deref().and_then(Sides::expand) {
                    Some(sides) => {
                        self.padding = Sides {
                            top: Some(sides.top.max(0.0)),
                            right: Some(sides.right.max(0.0)),
                            bottom: Some(sides.bottom.max(0.0)),
                            left: Some(sides.left.max(0.0)),
                        };
                        true
                    }
                    None => false,
                }
            }
            "padding-top" => set(&mut self.padding.top, parse_length(v).map(|p| p.max(0.0))),
            "padding-right" => set(&mut self.padding.right, parse_length(v).map(|p| p.max(0.0))),
            "padding-bottom" => set(&mut self.padding.bottom, parse_length(v).map(|p| p.max(0.0))),
            "padding-left" => set(&mut self.padding.left, parse_length(v).map(|p| p.max(0.0))),

            "position" => set(
                &mut self.position,
                match v {
                    "static" => Some(Position::Static),
                    "relative" | "sticky" => Some(Position::Relative),
                    "absolute" => Some(Position::Absolute),
                    "fixed" => Some(Position::Fixed),
                    _ => None,
                },
            ),
            "inset" => {
                let values: Option<Vec<Dimension>> =
                    v.split_whitespace().map(parse_offset).collect();
                match values.as_deref().and_then(Sides::expand) {
                    Some(sides) => {
                        self.inset = Sides {
                            top: Some(sides.top),
                            right: Some(sides.right),
                            bottom: Some(sides.bottom),
                            left: Some(sides.left),
                        };
                        true
                    }
                    None => false,
                }
            }
            "top" => set(&mut self.inset.top, parse_offset(v)),
            "right" => set(&mut self.inset.right, parse_offset(v)),
            "bottom" => set(&mut self.inset.bottom, parse_offset(v)),
            "left" => set(&mut self.inset.left, parse_offset(v)),
            "z-index" => match v {
                "auto" => {
                    self.z_index = None;
                    true
                }
                _ => set(&mut self.z_index, v.parse::<i32>().ok()),
            },

            "background-color" => set(&mut self.background_color, parse_color(v)),
            "background" | "background-image" => self.apply_background(val),
            "color" => match v {
                // Text colour inherits anyway; an explicit `inherit` is the same as unset.
                "inherit" | "currentcolor" => {
                    self.color = None;
                    true
                }
                _ => set(&mut self.color, parse_color(v)),
            },
            "opacity" => set(
                &mut self.opacity,
                parse_percentage(v)
                    .map(|p| p / 100.0)
                    .or_else(|| parse_number(v))
                    .map(|o| o.clamp(0.0, 1.0)),
            ),
            "visibility" => set(
                &mut self.visibility,
                match v {
                    "visible" => Some(Visibility::Visible),
                    "hidden" | "collapse" => Some(Visibility::Hidden),
                    _ => None,
                },
            ),
            "overflow" | "overflow-x" | "overflow-y" => set(
                &mut self.overflow_hidden,
                match v {
                    "hidden" | "clip" => Some(true),
                    "visible" | "auto" | "scroll" => Some(false),
                    _ => None,
                },
            ),
            "border" => self.apply_border_shorthand(v, None),
            "border-top" => self.apply_border_shorthand(v, Some(Side::Top)),
            "border-right" => self.apply_border_shorthand(v, Some(Side::Right)),
            "border-bottom" => self.apply_border_shorthand(v, Some(Side::Bottom)),
            "border-left" => self.apply_border_shorthand(v, Some(Side::Left)),
            "border-width" => {
                let values: Option<Vec<f32>> =
                    v.split_whitespace().map(parse_border_width).collect();
                match values.as_deref().and_then(Sides::expand) {
                    Some(sides) => {
                        self.border_width = Sides {
                            top: Some(sides.top),
                            right: Some(sides.right),
                            bottom: Some(sides.bottom),
                            left: Some(sides.left),
                        };
                        true
                    }
                    None => false,
                }
            }
            "border-top-width" => set(&mut self.border_width.top, parse_border_width(v)),
            "border-right-width" => set(&mut self.border_width.right, parse_border_width(v)),
            "border-bottom-width" => set(&mut self.border_width.bottom, parse_border_width(v)),
            "border-left-width" => set(&mut self.border_width.left, parse_border_width(v)),
            "border-color" => set(&mut self.border_color, parse_color(v)),
            "border-style" => set(&mut self.border_style, parse_border_style(v)),
            "border-radius" => {
                // Elliptical radii (`a / b`) keep the horizontal component.
                let horizontal = v.split('/').next().unwrap_or(v);
                let values: Option<Vec<Dimension>> =
                    horizontal.split_whitespace().map(parse_radius).collect();
                match values.as_deref().and_then(Corners::expand) {
                    Some(c) => {
                        self.border_radius = Corners {
                            top_left: Some(c.top_left),
                            top_right: Some(c.top_right),
                            bottom_right: Some(c.bottom_right),
                            bottom_left: Some(c.bottom_left),
                        };
                        true
                    }
                    None => false,
                }
            }
            "border-top-left-radius" => set(&mut self.border_radius.top_left, first_radius(v)),
            "border-top-right-radius" => set(&mut self.border_radius.top_right, first_radius(v)),
            "border-bottom-right-radius" => {
                set(&mut self.border_radius.bottom_right, first_radius(v))
            }
            "border-bottom-left-radius" => {
                set(&mut self.border_radius.bottom_left, first_radius(v))
            }
            "box-shadow" => set(&mut self.box_shadow, parse_shadow_list(v)),
            "filter" => set(&mut self.blur, parse_blur_filter(v)),
            "backdrop-filter" | "-webkit-backdrop-filter" => {
                set(&mut self.backdrop_blur, parse_blur_filter(v))
            }
            "transform" => set(&mut self.transform, parse_transform(v)),

            "font-family" => set(&mut self.font_family, parse_font_family(val)),
            "font-size" => set(&mut self.font_size, parse_length(v).filter(|s| *s > 0.0)),
            "font-weight" => set(
                &mut self.font_weight,
                match v {
                    "normal" => Some(400),
                    "bold" | "bolder" => Some(700),
                    "lighter" => Some(300),
                    _ => v.parse::<u16>().ok().filter(|w| (1..=1000).contains(w)),
                },
            ),
            "font-style" => set(
                &mut self.font_style,
                match v {
                    "italic" | "oblique" => Some(FontStyle::Italic),
                    "normal" => Some(FontStyle::Normal),
                    _ => None,
                },
            ),
            "line-height" => set(&mut self.line_height, parse_line_height(v)),
            "letter-spacing" => set(
                &mut self.letter_spacing,
                if v == "normal" { Some(0.0) } else { parse_length(v) },
            ),
            "text-align" => set(
                &mut self.text_align,
                match v {
                    "left" | "start" => Some(TextAlign::Left),
                    "center" => Some(TextAlign::Center),
                    "right" | "end" => Some(TextAlign::Right),
                    "justify" => Some(TextAlign::Justify),
                    _ => None,
                },
            ),
            "text-decoration" | "text-decoration-line" => set(
                &mut self.text_decoration,
                if v.contains("underline") {
                    Some(TextDecoration::Underline)
                } else if v.contains("line-through") {
                    Some(TextDecoration::Strikethrough)
                } else if v.starts_with("none") {
                    Some(TextDecoration::None)
                } else {
                    None
                },
            ),
            "text-transform" => set(
                &mut self.text_transform,
                match v {
                    "uppercase" => Some(TextTransform::Uppercase),
                    "lowercase" => Some(TextTransform::Lowercase),
                    "capitalize" => Some(TextTransform::Capitalize),
                    "none" => Some(TextTransform::None),
                    _ => None,
                },
            ),
            "white-space" => set(
                &mut self.white_space,
                match v {
                    "normal" | "pre-line" => Some(WhiteSpace::Normal),
                    "nowrap" => Some(WhiteSpace::NoWrap),
                    "pre" => Some(WhiteSpace::Pre),
                    "pre-wrap" | "break-spaces" => Some(WhiteSpace::PreWrap),
                    _ => None,
                },
            ),
            "text-overflow" => set(
                &mut self.text_overflow_ellipsis,
                match v {
                    "ellipsis" => Some(true),
                    "clip" => Some(false),
                    _ => None,
                },
            ),
            _ => false,
        }
    }

    /// `background` layers: gradients in paint order, plus a trailing colour.
    fn apply_background(&mut self, val: &str) -> bool {
        if val.trim().eq_ignore_ascii_case("none") {
            self.background_gradients.clear();
            return true;
        }
        let mut gradients = Vec::new();
        let mut color = None;
        for layer in split_top_level(val, ',') {
            if let Some(g) = parse_gradient(layer) {
                gradients.push(g);
                continue;
            }
            // The colour sits in the final layer, possibly next to
            // position/repeat keywords we do not model.
            if let Some(c) = split_whitespace_top_level(layer)
                .into_iter()
                .find_map(parse_color)
            {
                color = Some(c);
            }
        }
        if gradients.is_empty() && color.is_none() {
            return false;
        }
        if !gradients.is_empty() {
            self.background_gradients = gradients;
        }
        if color.is_some() {
            self.background_color = color;
        }
        true
    }

    fn apply_border_shorthand(&mut self, v: &str, side: Option<Side>) -> bool {
        let mut width = None;
        let mut style = None;
        let mut color = None;
        for token in split_whitespace_top_level(v) {
            if let Some(s) = parse_border_style(token) {
                style = Some(s);
            } else if let Some(w) = parse_border_width(token) {
                width = Some(w);
            } else if let Some(c) = parse_color(token) {
                color = Some(c);
            } else {
                return false;
            }
        }
        if width.is_none() && style.is_none() && color.is_none() {
            return false;
        }
        // A style without a width draws at the `medium` default.
        let width = match style {
            Some(BorderStyle::None) => 0.0,
            _ => width.unwrap_or(3.0),
        };
        match side {
            None => self.border_width = Sides::all(Some(width)),
            Some(Side::Top) => self.border_width.top = Some(width),
            Some(Side::Right) => self.border_width.right = Some(width),
            Some(Side::Bottom) => self.border_width.bottom = Some(width),
            Some(Side::Left) => self.border_width.left = Some(width),
        }
        if color.is_some() && (side.is_none() || self.border_color.is_none()) {
            self.border_color = color;
        }
        if style.is_some() && side.is_none() {
            self.border_style = style;
        }
        true
    }

    /// True when any border side has a positive width and the style draws.
    pub fn has_border(&self) -> bool {
        let w = self.border_width.resolved();
        self.border_style != Some(BorderStyle::None)
            && [w.top, w.right, w.bottom, w.left].iter().any(|w| *w > 0.0)
    }

    /// True when the element paints something of its own as a box.
    pub fn has_box_visuals(&self) -> bool {
        let padding = self.padding.resolved();
        self.background_color.is_some_and(|c| !c.is_transparent())
            || !self.background_gradients.is_empty()
            || self.has_border()
            || self.box_shadow.as_ref().is_some_and(|s| !s.is_empty())
            || [padding.top, padding.right, padding.bottom, padding.left]
                .iter()
                .any(|p| *p > 0.0)
            || matches!(self.width, Some(Dimension::Px(_) | Dimension::Percent(_)))
            || matches!(self.height, Some(Dimension::Px(_) | Dimension::Percent(_)))
            || self.border_radius.top_left.is_some()
            || self.backdrop_blur.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Store `value` when parsed; report whether it was.
fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

fn parse_display(v: &str) -> Option<Display> {
    Some(match v {
        "block" | "list-item" | "flow-root" | "table" | "table-row" | "table-cell" => {
            Display::Block
        }
        "flex" => Display::Flex,
        "inline-flex" => Display::InlineFlex,
        "grid" | "inline-grid" => Display::Grid,
        "inline" => Display::Inline,
        "inline-block" => Display::InlineBlock,
        "none" => Display::None,
        _ => return None,
    })
}

fn parse_justify(v: &str) -> Option<JustifyContent> {
    Some(match v {
        "flex-start" | "start" | "left" | "normal" => JustifyContent::Start,
        "flex-end" | "end" | "right" => JustifyContent::End,
        "center" => JustifyContent::Center,
        "space-between" => JustifyContent::SpaceBetween,
        "space-around" => JustifyContent::SpaceAround,
        "space-evenly" => JustifyContent::SpaceEvenly,
        _ => return None,
    })
}

fn parse_align(v: &str) -> Option<AlignItems> {
    Some(match v {
        "flex-start" | "start" | "self-start" => AlignItems::Start,
        "flex-end" | "end" | "self-end" => AlignItems::End,
        "center" => AlignItems::Center,
        "baseline" | "first baseline" => AlignItems::Baseline,
        "stretch" => AlignItems::Stretch,
        _ => return None,
    })
}

/// `flex: none | auto | <grow> [<shrink>] [<basis>] | <basis>`; only the
/// growth weight is kept.
fn parse_flex_shorthand(v: &str) -> Option<f32> {
    match v {
        "none" | "initial" => return Some(0.0),
        "auto" => return Some(1.0),
        _ => {}
    }
    let first = v.split_whitespace().next()?;
    match parse_number(first) {
        Some(grow) if grow >= 0.0 => Some(grow),
        Some(_) => None,
        // A lone basis implies `1 1 <basis>`.
        None => parse_dimension(first).map(|_| 1.0),
    }
}

pub fn parse_dimension(v: &str) -> Option<Dimension> {
    match v {
        "auto" | "fit-content" | "max-content" | "min-content" => Some(Dimension::Auto),
        "fill" | "stretch" | "-webkit-fill-available" | "-moz-available" => Some(Dimension::Fill),
        _ => parse_percentage(v)
            .map(Dimension::Percent)
            .or_else(|| parse_length(v).map(|px| Dimension::Px(px.max(0.0)))),
    }
}

fn parse_offset(v: &str) -> Option<Dimension> {
    match v {
        "auto" => Some(Dimension::Auto),
        _ => parse_percentage(v)
            .map(Dimension::Percent)
            .or_else(|| parse_length(v).map(Dimension::Px)),
    }
}

fn parse_margin(v: &str) -> Option<Margin> {
    match v {
        "auto" => Some(Margin::Auto),
        _ => parse_length(v).map(Margin::Px),
    }
}

fn parse_radius(v: &str) -> Option<Dimension> {
    parse_percentage(v)
        .map(Dimension::Percent)
        .or_else(|| parse_length(v).map(|px| Dimension::Px(px.max(0.0))))
}

fn first_radius(v: &str) -> Option<Dimension> {
    v.split_whitespace().next().and_then(parse_radius)
}

fn parse_border_width(v: &str) -> Option<f32> {
    match v {
        "thin" => Some(1.0),
        "medium" => Some(3.0),
        "thick" => Some(5.0),
        _ => parse_length(v).filter(|w| *w >= 0.0),
    }
}

fn parse_border_style(v: &str) -> Option<BorderStyle> {
    Some(match v {
        "none" | "hidden" => BorderStyle::None,
        "solid" | "double" | "groove" | "ridge" | "inset" | "outset" => BorderStyle::Solid,
        "dashed" => BorderStyle::Dashed,
        "dotted" => BorderStyle::Dotted,
        _ => return None,
    })
}

fn parse_aspect_ratio(v: &str) -> Option<f32> {
    let v = v.trim_start_matches("auto").trim();
    let ratio = match v.split_once('/') {
        Some((w, h)) => parse_number(w)? / parse_number(h)?,
        None => parse_number(v)?,
    };
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

fn parse_line_height(v: &str) -> Option<LineHeight> {
    if v == "normal" {
        return Some(LineHeight::Normal);
    }
    if let Some(n) = parse_number(v) {
        return Some(LineHeight::Multiplier(n));
    }
    if let Some(p) = parse_percentage(v) {
        return Some(LineHeight::Multiplier(p / 100.0));
    }
    parse_length(v).map(LineHeight::Px)
}

/// `blur(4px)` anywhere in a filter list.
fn parse_blur_filter(v: &str) -> Option<f32> {
    if v == "none" {
        return Some(0.0);
    }
    split_whitespace_top_level(v).into_iter().find_map(|f| {
        let inner = f.strip_prefix("blur(")?.strip_suffix(')')?;
        parse_length(inner)
    })
}

/// First family in the list, unquoted. Generic families are kept as-is.
fn parse_font_family(val: &str) -> Option<String> {
    let first = split_top_level(val, ',').into_iter().next()?;
    let name = first.trim_matches(|c| c == '"' || c == '\'').trim();
    (!name.is_empty()).then(|| name.to_string())
}

// ---------------------------------------------------------------------------
// Element tree
// ---------------------------------------------------------------------------

/// A source element: tag, parsed style, direct text and child elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    /// Display name for the synthesized box.
    pub name: String,
    pub style: Style,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            name: tag.name().to_string(),
            tag,
            style: Style::default(),
            text: None,
            children: Vec::new(),
        }
    }

    /// An anonymous inline text run.
    pub fn text_run(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(Tag::Text)
        }
    }

    pub fn with_style(mut self, declarations: &str) -> Self {
        self.style.apply_declarations(declarations);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Effective display: the declared one, else the tag's default.
    pub fn display(&self) -> Display {
        self.style.display.unwrap_or(match self.tag.category() {
            TagCategory::Inline | TagCategory::Text => Display::Inline,
            TagCategory::Replaced => Display::InlineBlock,
            TagCategory::Block | TagCategory::Skipped => Display::Block,
        })
    }

    /// Inline-level boxes hug both axes and never take default stretch.
    pub fn is_inline_level(&self) -> bool {
        matches!(
            self.display(),
            Display::Inline | Display::InlineBlock | Display::InlineFlex
        )
    }

    pub fn is_replaced(&self) -> bool {
        self.tag.category() == TagCategory::Replaced
    }

    pub fn is_out_of_flow(&self) -> bool {
        matches!(
            self.style.position,
            Some(Position::Absolute | Position::Fixed)
        )
    }

    pub fn is_skipped(&self) -> bool {
        self.tag.category() == TagCategory::Skipped || self.display() == Display::None
    }
}

/// Default styles based on tag semantics.
fn base_style_for_tag(tag: &Tag) -> Style {
    let mut s = Style::default();
    match tag {
        Tag::H1 => {
            s.font_size = Some(32.0);
            s.font_weight = Some(700);
        }
        Tag::H2 => {
            s.font_size = Some(24.0);
            s.font_weight = Some(700);
        }
        Tag::H3 => {
            s.font_size = Some(20.0);
            s.font_weight = Some(700);
        }
        Tag::H4 => {
            s.font_size = Some(16.0);
            s.font_weight = Some(700);
        }
        Tag::H5 => {
            s.font_size = Some(13.0);
            s.font_weight = Some(700);
        }
        Tag::H6 => {
            s.font_size = Some(11.0);
            s.font_weight = Some(700);
        }
        Tag::Strong | Tag::B | Tag::Th => s.font_weight = Some(700),
        Tag::Em | Tag::I => s.font_style = Some(FontStyle::Italic),
        Tag::A => s.text_decoration = Some(TextDecoration::Underline),
        Tag::Small => s.font_size = Some(13.0),
        Tag::Pre | Tag::Code => {
            s.font_family = Some("monospace".to_string());
            if *tag == Tag::Pre {
                s.white_space = Some(WhiteSpace::Pre);
            }
        }
        Tag::Hr => {
            s.height = Some(Dimension::Px(1.0));
            s.background_color = Some(Color::from_bytes([229, 231, 235, 255]));
        }
        _ => {}
    }
    s
}

/// Resolve the style for an element: tag defaults, then the inline
/// `style` attribute, then the sizing attributes of replaced elements.
pub fn resolve_style(element: &ElementNode) -> Style {
    let mut style = base_style_for_tag(&element.tag);
    if let Some(inline) = element.inline_style() {
        style.apply_declarations(inline);
    }
    if element.tag.category() == TagCategory::Replaced {
        if style.width.is_none() {
            style.width = element.attribute_px("width").map(Dimension::Px);
        }
        if style.height.is_none() {
            style.height = element.attribute_px("height").map(Dimension::Px);
        }
    }
    if element.tag == Tag::Hr && style.width.is_none() {
        style.width = Some(Dimension::Fill);
    }
    style
}

/// Build the element tree from DOM nodes. Whitespace-only text is dropped;
/// text mixed with elements becomes anonymous text runs.
pub fn build_element_tree(nodes: &[DomNode]) -> Vec<Element> {
    let mut result = Vec::new();
    for node in nodes {
        match node {
            DomNode::Element(e) => result.push(build_element(e)),
            DomNode::Text(text) => {
                if !text.trim().is_empty() {
                    result.push(Element::text_run(text.clone()));
                }
            }
        }
    }
    result
}

fn build_element(e: &ElementNode) -> Element {
    let style = resolve_style(e);
    let has_element_children = e
        .children
        .iter()
        .any(|c| matches!(c, DomNode::Element(_)));
    let (text, children) = if has_element_children {
        (None, build_element_tree(&e.children))
    } else {
        let raw: String = e
            .children
            .iter()
            .filter_map(|c| match c {
                DomNode::Text(t) => Some(t.as_str()),
                DomNode::Element(_) => None,
            })
            .collect();
        let text = (!raw.trim().is_empty()).then_some(raw);
        (text, Vec::new())
    };
    Element {
        tag: e.tag.clone(),
        name: e.display_name(),
        style,
        text,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn inline_style_font_size() {
        let s = Style::parse("font-size: 24px; color: #ff0000");
        assert_eq!(s.font_size, Some(24.0));
        assert!((s.color.unwrap().r - 1.0).abs() < 0.01);
    }

    #[test]
    fn unset_is_distinct_from_default() {
        let s = Style::parse("align-items: stretch");
        assert_eq!(s.align_items, Some(AlignItems::Stretch));
        assert_eq!(Style::default().align_items, None);
    }

    #[test]
    fn invalid_declarations_are_dropped() {
        let s = Style::parse("width: banana; height: 20px; nonsense; colour: red; color: nope");
        assert_eq!(s.width, None);
        assert_eq!(s.height, Some(Dimension::Px(20.0)));
        assert_eq!(s.color, None);
    }

    #[test]
    fn shorthand_spacing() {
        let s = Style::parse("padding: 4px 8px; margin: 0 auto 10px");
        let p = s.padding.resolved();
        assert_eq!((p.top, p.right, p.bottom, p.left), (4.0, 8.0, 4.0, 8.0));
        assert_eq!(s.margin.top, Some(Margin::Px(0.0)));
        assert_eq!(s.margin.left, Some(Margin::Auto));
        assert_eq!(s.margin.right, Some(Margin::Auto));
        assert_eq!(s.margin.bottom, Some(Margin::Px(10.0)));
    }

    #[test]
    fn dimensions_and_symbols() {
        let s = Style::parse("width: fill; height: calc(10px + 10px); min-width: 2in");
        assert_eq!(s.width, Some(Dimension::Fill));
        assert_eq!(s.height, Some(Dimension::Px(20.0)));
        assert_eq!(s.min_width, Some(192.0));
        assert_eq!(Style::parse("width: 50%").width, Some(Dimension::Percent(50.0)));
        assert_eq!(Style::parse("width: auto").width, Some(Dimension::Auto));
    }

    #[test]
    fn flex_shorthand() {
        assert_eq!(Style::parse("flex: 2").flex_grow, Some(2.0));
        assert_eq!(Style::parse("flex: 1 1 0%").flex_grow, Some(1.0));
        assert_eq!(Style::parse("flex: none").flex_grow, Some(0.0));
        assert_eq!(Style::parse("flex: 200px").flex_grow, Some(1.0));
    }

    #[test]
    fn border_shorthands() {
        let s = Style::parse("border: 1px solid #ccc; border-left: 4px solid red");
        let w = s.border_width.resolved();
        assert_eq!((w.top, w.left), (1.0, 4.0));
        assert!(s.has_border());
        assert!((s.border_color.unwrap().r - 0.8).abs() < 0.01);
        assert!(!Style::parse("border: none").has_border());
    }

    #[test]
    fn background_layers() {
        let s = Style::parse("background: linear-gradient(to right, red, blue), #fff");
        assert_eq!(s.background_gradients.len(), 1);
        assert_eq!(s.background_color, Some(Color::WHITE));
        let s = Style::parse("background: rgba(0, 0, 0, 0.5) no-repeat");
        assert!((s.background_color.unwrap().a - 0.5).abs() < 0.01);
    }

    #[test]
    fn radius_and_effects() {
        let s = Style::parse(
            "border-radius: 4px 50%; box-shadow: 0 1px 2px red; filter: blur(3px); backdrop-filter: blur(8px)",
        );
        assert_eq!(s.border_radius.top_left, Some(Dimension::Px(4.0)));
        assert_eq!(s.border_radius.top_right, Some(Dimension::Percent(50.0)));
        assert_eq!(s.box_shadow.as_ref().map(Vec::len), Some(1));
        assert_eq!(s.blur, Some(3.0));
        assert_eq!(s.backdrop_blur, Some(8.0));
    }

    #[test]
    fn typography() {
        let s = Style::parse(
            "font-family: 'Roboto Mono', monospace; font-weight: 600; line-height: 1.5; text-transform: uppercase !important",
        );
        assert_eq!(s.font_family.as_deref(), Some("Roboto Mono"));
        assert_eq!(s.font_weight, Some(600));
        assert_eq!(s.line_height, Some(LineHeight::Multiplier(1.5)));
        assert_eq!(s.text_transform, Some(TextTransform::Uppercase));
    }

    #[test]
    fn positioning() {
        let s = Style::parse("position: absolute; inset: 0; z-index: 3");
        assert_eq!(s.position, Some(Position::Absolute));
        assert_eq!(s.inset.left, Some(Dimension::Px(0.0)));
        assert_eq!(s.z_index, Some(3));
    }

    #[test]
    fn aspect_ratio_forms() {
        assert_eq!(Style::parse("aspect-ratio: 16 / 8").aspect_ratio, Some(2.0));
        assert_eq!(Style::parse("aspect-ratio: 1.5").aspect_ratio, Some(1.5));
        assert_eq!(Style::parse("aspect-ratio: 1 / 0").aspect_ratio, None);
    }

    #[test]
    fn element_tree_splits_text_and_children() {
        let dom = parse_html(r#"<div style="display:flex"><p>Hello</p>tail</div>"#);
        let tree = build_element_tree(&dom);
        assert_eq!(tree.len(), 1);
        let div = &tree[0];
        assert_eq!(div.style.display, Some(Display::Flex));
        assert_eq!(div.children.len(), 2);
        assert_eq!(div.children[0].text.as_deref(), Some("Hello"));
        assert_eq!(div.children[1].tag, Tag::Text);
    }

    #[test]
    fn replaced_elements_take_size_attributes() {
        let dom = parse_html(r#"<img src="a.png" width="120" height="80">"#);
        let tree = build_element_tree(&dom);
        assert_eq!(tree[0].style.width, Some(Dimension::Px(120.0)));
        assert_eq!(tree[0].style.height, Some(Dimension::Px(80.0)));
        assert!(tree[0].is_replaced());
    }
}
