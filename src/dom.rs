//! Markup splitter – converts a markup string into a simple DOM tree.
//!
//! Elements are classified into categories that drive layout defaults:
//! - Block: div, section, p, h1-h6, ul, ol, li, table parts, …
//! - Inline: span, a, strong, em, b, i, small, label, code, button
//! - Replaced: img, svg, input, hr, video, canvas
//! - Skipped: head, style, script, br, meta, link, title
//!
//! Styling comes from the `style` attribute only.

use std::collections::HashMap;

use crate::values::parse_length;

// ---------------------------------------------------------------------------
// DOM types
// ---------------------------------------------------------------------------

/// The tag name of an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    Section,
    Article,
    Header,
    Footer,
    Nav,
    Main,
    Aside,
    Form,
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Ul,
    Ol,
    Li,
    Blockquote,
    Pre,
    Table,
    Tr,
    Td,
    Th,
    Span,
    A,
    Strong,
    B,
    Em,
    I,
    Small,
    Label,
    Code,
    Button,
    Img,
    Svg,
    Input,
    Hr,
    Br,
    Body,
    Html,
    Head,
    Style,
    Script,
    /// Anonymous inline text run (never produced by the parser).
    Text,
    /// Catch-all for unknown tags – they are kept but treated as divs.
    Unknown(String),
}

/// Layout category of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    Block,
    Inline,
    Replaced,
    Skipped,
    Text,
}

impl Tag {
    pub fn from_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "div" => Tag::Div,
            "section" => Tag::Section,
            "article" => Tag::Article,
            "header" => Tag::Header,
            "footer" => Tag::Footer,
            "nav" => Tag::Nav,
            "main" => Tag::Main,
            "aside" => Tag::Aside,
            "form" => Tag::Form,
            "p" => Tag::P,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "h4" => Tag::H4,
            "h5" => Tag::H5,
            "h6" => Tag::H6,
            "ul" => Tag::Ul,
            "ol" => Tag::Ol,
            "li" => Tag::Li,
            "blockquote" => Tag::Blockquote,
            "pre" => Tag::Pre,
            "table" => Tag::Table,
            "tr" => Tag::Tr,
            "td" => Tag::Td,
            "th" => Tag::Th,
            "span" => Tag::Span,
            "a" => Tag::A,
            "strong" => Tag::Strong,
            "b" => Tag::B,
            "em" => Tag::Em,
            "i" => Tag::I,
            "small" => Tag::Small,
            "label" => Tag::Label,
            "code" => Tag::Code,
            "button" => Tag::Button,
            "img" => Tag::Img,
            "svg" => Tag::Svg,
            "input" => Tag::Input,
            "hr" => Tag::Hr,
            "br" => Tag::Br,
            "body" => Tag::Body,
            "html" => Tag::Html,
            "head" => Tag::Head,
            "style" => Tag::Style,
            "script" => Tag::Script,
            _ => Tag::Unknown(s.to_ascii_lowercase()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tag::Div => "div",
            Tag::Section => "section",
            Tag::Article => "article",
            Tag::Header => "header",
            Tag::Footer => "footer",
            Tag::Nav => "nav",
            Tag::Main => "main",
            Tag::Aside => "aside",
            Tag::Form => "form",
            Tag::P => "p",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Blockquote => "blockquote",
            Tag::Pre => "pre",
            Tag::Table => "table",
            Tag::Tr => "tr",
            Tag::Td => "td",
            Tag::Th => "th",
            Tag::Span => "span",
            Tag::A => "a",
            Tag::Strong => "strong",
            Tag::B => "b",
            Tag::Em => "em",
            Tag::I => "i",
            Tag::Small => "small",
            Tag::Label => "label",
            Tag::Code => "code",
            Tag::Button => "button",
            Tag::Img => "img",
            Tag::Svg => "svg",
            Tag::Input => "input",
            Tag::Hr => "hr",
            Tag::Br => "br",
            Tag::Body => "body",
            Tag::Html => "html",
            Tag::Head => "head",
            Tag::Style => "style",
            Tag::Script => "script",
            Tag::Text => "text",
            Tag::Unknown(name) => name,
        }
    }

    pub fn category(&self) -> TagCategory {
        match self {
            Tag::Span
            | Tag::A
            | Tag::Strong
            | Tag::B
            | Tag::Em
            | Tag::I
            | Tag::Small
            | Tag::Label
            | Tag::Code
            | Tag::Button => TagCategory::Inline,
            Tag::Img | Tag::Svg | Tag::Input | Tag::Hr => TagCategory::Replaced,
            Tag::Br | Tag::Head | Tag::Style | Tag::Script => TagCategory::Skipped,
            Tag::Unknown(name)
                if matches!(name.as_str(), "meta" | "link" | "title" | "template") =>
            {
                TagCategory::Skipped
            }
            Tag::Unknown(name) if matches!(name.as_str(), "video" | "canvas" | "iframe") => {
                TagCategory::Replaced
            }
            Tag::Text => TagCategory::Text,
            _ => TagCategory::Block,
        }
    }

    /// Elements that never have content or a closing tag.
    pub fn is_void(&self) -> bool {
        match self {
            Tag::Img | Tag::Input | Tag::Hr | Tag::Br => true,
            Tag::Unknown(name) => matches!(
                name.as_str(),
                "meta" | "link" | "source" | "wbr" | "area" | "base" | "col" | "embed" | "track"
            ),
            _ => false,
        }
    }

    /// Elements whose content is raw text and never markup.
    fn is_raw_text(&self) -> bool {
        matches!(self, Tag::Style | Tag::Script)
    }
}

/// A node in our DOM tree.
#[derive(Debug, Clone)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
}

/// An element node carrying tag, attributes, and children.
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: Tag,
    pub attributes: HashMap<String, String>,
    pub children: Vec<DomNode>,
}

impl ElementNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn classes(&self) -> Vec<&str> {
        self.attributes
            .get("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn inline_style(&self) -> Option<&str> {
        self.attributes.get("style").map(|s| s.as_str())
    }

    /// A numeric attribute such as `width="120"` in px.
    pub fn attribute_px(&self, name: &str) -> Option<f32> {
        self.attributes
            .get(name)
            .and_then(|v| parse_length(v.trim()))
            .filter(|v| *v >= 0.0)
    }

    /// Box name: `id`, else the first class, else the tag name.
    pub fn display_name(&self) -> String {
        if let Some(id) = self.attributes.get("id").filter(|id| !id.is_empty()) {
            return id.clone();
        }
        match self.classes().first() {
            Some(class) => class.to_string(),
            None => self.tag.name().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parser – simple recursive descent over markup
// ---------------------------------------------------------------------------

/// Parse a markup string into a list of DOM nodes.
///
/// Tolerant of unclosed elements and stray closing tags; never fails.
pub fn parse_html(html: &str) -> Vec<DomNode> {
    let mut parser = Parser::new(html);
    parser.parse_nodes()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse_nodes(&mut self) -> Vec<DomNode> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace_preserve();
            if self.eof() || self.starts_with("</") {
                break;
            }
            if let Some(node) = self.parse_node() {
                nodes.push(node);
            }
        }
        nodes
    }

    fn parse_node(&mut self) -> Option<DomNode> {
        if self.starts_with("<!--") {
            self.skip_comment();
            return None;
        }
        if self.starts_with("<!") || self.starts_with("<?") {
            // Doctype / processing instruction
            self.skip_past(">");
            return None;
        }
        if self.starts_with("<") && self.peek_is_tag_start() {
            Some(self.parse_element())
        } else {
            Some(self.parse_text())
        }
    }

    fn parse_text(&mut self) -> DomNode {
        let start = self.pos;
        // A lone '<' that does not open a tag is literal text.
        if self.starts_with("<") {
            self.advance(1);
        }
        while !self.eof() && !self.starts_with("<") {
            self.advance(1);
        }
        DomNode::Text(decode_entities(&self.input[start..self.pos]))
    }

    fn parse_element(&mut self) -> DomNode {
        self.advance(1); // '<'
        let tag_name = self.parse_tag_name();
        let tag = Tag::from_str(&tag_name);
        let mut elem = ElementNode::new(tag.clone());

        loop {
            self.skip_whitespace();
            if self.eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }
            let (key, value) = self.parse_attribute();
            if key.is_empty() {
                // Unparseable attribute garbage; step over one char.
                self.advance(1);
                continue;
            }
            elem.attributes.insert(key.to_ascii_lowercase(), value);
        }

        if self.starts_with("/>") {
            self.advance(2);
            return DomNode::Element(elem);
        }
        if self.starts_with(">") {
            self.advance(1);
        }
        if tag.is_void() {
            return DomNode::Element(elem);
        }

        if tag.is_raw_text() {
            let close = format!("</{}", tag.name());
            let rest = &self.input[self.pos..];
            let end = rest
                .to_ascii_lowercase()
                .find(&close)
                .map(|i| self.pos + i)
                .unwrap_or(self.input.len());
            elem.children
                .push(DomNode::Text(self.input[self.pos..end].to_string()));
            self.pos = end;
        } else {
            elem.children = self.parse_nodes();
        }

        // Closing tag
        if self.starts_with("</") {
            self.advance(2);
            self.parse_tag_name();
            self.skip_past(">");
        }

        DomNode::Element(elem)
    }

    fn parse_tag_name(&mut self) -> String {
        let start = self.pos;
        while !self.eof() {
            let c = self.current_char();
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ':' {
                self.advance(1);
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_attribute(&mut self) -> (String, String) {
        let key = self.parse_tag_name();
        self.skip_whitespace();
        if !self.starts_with("=") {
            return (key, String::new());
        }
        self.advance(1);
        self.skip_whitespace();
        let value = self.parse_attr_value();
        (key, value)
    }

    fn parse_attr_value(&mut self) -> String {
        for quote in ["\"", "'"] {
            if self.starts_with(quote) {
                self.advance(1);
                let start = self.pos;
                while !self.eof() && !self.starts_with(quote) {
                    self.advance(1);
                }
                let val = self.input[start..self.pos].to_string();
                if !self.eof() {
                    self.advance(1);
                }
                return decode_entities(&val);
            }
        }
        let start = self.pos;
        while !self.eof() {
            let c = self.current_char();
            if c.is_whitespace() || c == '>' || c == '/' {
                break;
            }
            self.advance(1);
        }
        self.input[start..self.pos].to_string()
    }

    fn peek_is_tag_start(&self) -> bool {
        self.input[self.pos..]
            .chars()
            .nth(1)
            .is_some_and(|c| c.is_ascii_alphabetic())
    }

    fn skip_whitespace(&mut self) {
        while !self.eof() && self.current_char().is_whitespace() {
            self.advance(1);
        }
    }

    fn skip_whitespace_preserve(&mut self) {
        // Skip runs of pure whitespace between elements.
        let saved = self.pos;
        while !self.eof() && self.current_char().is_whitespace() {
            self.advance(1);
        }
        // Whitespace that leads into text belongs to the text.
        if !self.eof() && !self.starts_with("<") {
            self.pos = saved;
        }
    }

    fn skip_comment(&mut self) {
        self.advance(4); // <!--
        while !self.eof() && !self.starts_with("-->") {
            self.advance(1);
        }
        if !self.eof() {
            self.advance(3);
        }
    }

    fn skip_past(&mut self, s: &str) {
        while !self.eof() && !self.starts_with(s) {
            self.advance(1);
        }
        if !self.eof() {
            self.advance(s.chars().count());
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn advance(&mut self, n: usize) {
        // Advance by `n` characters (not bytes).
        for _ in 0..n {
            if let Some(c) = self.input[self.pos..].chars().next() {
                self.pos += c.len_utf8();
            }
        }
    }
}

/// Named entities worth decoding; anything else is left as written.
const ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{00A0}"),
    ("mdash", "\u{2014}"),
    ("ndash", "\u{2013}"),
    ("hellip", "\u{2026}"),
    ("copy", "\u{00A9}"),
    ("times", "\u{00D7}"),
];

/// Decode `&name;`, `&#NN;` and `&#xNN;` references in one pass.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest[1..]
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_reference(&rest[1..=end]).map(|c| (c, end + 2)));
        match decoded {
            Some((text, len)) => {
                out.push_str(&text);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    ENTITIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v.to_string())
}

// ---------------------------------------------------------------------------
// Convenience helpers
// ---------------------------------------------------------------------------

/// Find the `<body>` element and return its children, or return all nodes if
/// no `<body>` is present.
pub fn body_children(nodes: &[DomNode]) -> Vec<DomNode> {
    for node in nodes {
        if let DomNode::Element(e) = node {
            if e.tag == Tag::Body {
                return e.children.clone();
            }
            if e.tag == Tag::Html {
                let inner = body_children(&e.children);
                if !inner.is_empty() {
                    return inner;
                }
            }
        }
    }
    nodes.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_div() {
        let html = r#"<div class="card wide" style="padding: 4px"><p>Hello</p></div>"#;
        let nodes = parse_html(html);
        assert_eq!(nodes.len(), 1);
        if let DomNode::Element(e) = &nodes[0] {
            assert_eq!(e.tag, Tag::Div);
            assert_eq!(e.classes(), vec!["card", "wide"]);
            assert_eq!(e.inline_style(), Some("padding: 4px"));
            assert_eq!(e.display_name(), "card");
            assert_eq!(e.children.len(), 1);
        } else {
            panic!("Expected element");
        }
    }

    #[test]
    fn parse_void_elements() {
        let html = r#"<img src="logo.png" width="64"><hr><p>after</p>"#;
        let nodes = parse_html(html);
        assert_eq!(nodes.len(), 3);
        if let DomNode::Element(e) = &nodes[0] {
            assert_eq!(e.tag, Tag::Img);
            assert_eq!(e.attribute_px("width"), Some(64.0));
            assert_eq!(e.tag.category(), TagCategory::Replaced);
        } else {
            panic!("Expected img element");
        }
    }

    #[test]
    fn parse_mixed_content() {
        let html = r#"<p>Hello <span id="who">world</span>!</p>"#;
        let nodes = parse_html(html);
        assert_eq!(nodes.len(), 1);
        if let DomNode::Element(e) = &nodes[0] {
            assert_eq!(e.tag, Tag::P);
            assert_eq!(e.children.len(), 3); // "Hello ", <span>, "!"
            if let DomNode::Element(span) = &e.children[1] {
                assert_eq!(span.display_name(), "who");
            }
        } else {
            panic!("Expected p element");
        }
    }

    #[test]
    fn raw_text_elements_do_not_nest() {
        let html = r#"<style>div > p { color: red }</style><div>x</div>"#;
        let nodes = parse_html(html);
        assert_eq!(nodes.len(), 2);
        if let DomNode::Element(style) = &nodes[0] {
            assert_eq!(style.tag.category(), TagCategory::Skipped);
        }
    }

    #[test]
    fn entities_and_stray_angle_brackets() {
        let nodes = parse_html("<p>a &lt; b &amp;&amp; 1 < 2</p>");
        if let DomNode::Element(p) = &nodes[0] {
            match &p.children[..] {
                [DomNode::Text(a), DomNode::Text(b)] => {
                    assert_eq!(format!("{a}{b}"), "a < b && 1 < 2")
                }
                [DomNode::Text(t)] => assert_eq!(t, "a < b && 1 < 2"),
                other => panic!("unexpected children {other:?}"),
            }
        }
        assert_eq!(decode_entities("&#65;&#x42; &bogus; AT&T"), "AB &bogus; AT&T");
    }

    #[test]
    fn body_is_unwrapped() {
        let nodes = parse_html("<!DOCTYPE html><html><head><title>t</title></head><body><div></div></body></html>");
        let body = body_children(&nodes);
        assert_eq!(body.len(), 1);
    }
}
