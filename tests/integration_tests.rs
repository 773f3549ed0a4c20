//! Integration tests for the frame-forge pipeline.
//!
//! These tests validate:
//! - Markup splits into the expected DOM and element trees
//! - Value parsers hold their round-trip properties
//! - Synthesized frames have the expected geometry and order
//! - Snapshots serialise and are stable across runs

use frame_forge::document::{Document, Positioning, Role, SizingMode};
use frame_forge::dom::{body_children, parse_html, DomNode, Tag};
use frame_forge::error::{PipelineError, SynthesisError};
use frame_forge::fonts::FontManager;
use frame_forge::layout::{synthesize, SynthesisOptions, SynthesizedFrame};
use frame_forge::pipeline::{snapshot_json, synthesize_html, PipelineConfig};
use frame_forge::snapshot::NodeSnapshot;
use frame_forge::style::build_element_tree;
use frame_forge::templates;
use frame_forge::values::{canonicalize, parse_color, parse_gradient, parse_length};
use sha2::{Digest, Sha256};

// =====================================================================
// Helper
// =====================================================================

fn default_config() -> PipelineConfig {
    PipelineConfig::default()
}

fn run(html: &str) -> (Document, SynthesizedFrame) {
    let mut fonts = FontManager::default();
    synthesize_html(html, &default_config(), &mut fonts).unwrap()
}

fn snapshot(html: &str) -> NodeSnapshot {
    let (doc, frame) = run(html);
    NodeSnapshot::capture(&doc, frame.id).unwrap()
}

fn visit(snap: &NodeSnapshot, f: &mut dyn FnMut(&NodeSnapshot)) {
    f(snap);
    for child in &snap.children {
        visit(child, f);
    }
}

// =====================================================================
// DOM parsing tests
// =====================================================================

#[test]
fn parse_heading_elements() {
    for tag in ["h1", "h2", "h3"] {
        let html = format!("<{0}>Title</{0}>", tag);
        let dom = parse_html(&html);
        assert_eq!(dom.len(), 1);
        if let DomNode::Element(e) = &dom[0] {
            match tag {
                "h1" => assert_eq!(e.tag, Tag::H1),
                "h2" => assert_eq!(e.tag, Tag::H2),
                "h3" => assert_eq!(e.tag, Tag::H3),
                _ => unreachable!(),
            }
        } else {
            panic!("Expected element for <{}>", tag);
        }
    }
}

#[test]
fn parse_body_and_drop_whitespace() {
    let html = r#"
        <html><head><title>x</title></head><body>
            <div id="a"></div>
            <div id="b"></div>
        </body></html>
    "#;
    let dom = parse_html(html);
    let elements = build_element_tree(&body_children(&dom));
    let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn mixed_content_becomes_text_runs() {
    let dom = parse_html(r#"<p>Hello <strong>bold</strong> world</p>"#);
    let elements = build_element_tree(&dom);
    assert_eq!(elements.len(), 1);
    let p = &elements[0];
    assert!(p.text.is_none());
    let tags: Vec<&Tag> = p.children.iter().map(|c| &c.tag).collect();
    assert_eq!(tags, vec![&Tag::Text, &Tag::Strong, &Tag::Text]);
}

#[test]
fn inline_style_is_parsed_and_unknown_properties_dropped() {
    let dom =
        parse_html(r#"<div style="width: 2in; frobnicate: yes; COLOR: red !important"></div>"#);
    let elements = build_element_tree(&dom);
    let style = &elements[0].style;
    assert!(style.width.is_some());
    assert_eq!(style.color.map(|c| c.to_bytes()), Some([255, 0, 0, 255]));
}

// =====================================================================
// Value parser properties
// =====================================================================

#[test]
fn canonical_lengths_are_idempotent() {
    for input in [
        "12px", "12", "9pt", "2pc", "1in", "2.54cm", "10mm", "40q", "1.5em", "2rem",
        "calc(10px + 2pt)", "calc(3 * 4px)",
    ] {
        let once = canonicalize(input).unwrap_or_else(|| panic!("no length for {input}"));
        assert!(once.ends_with("px"));
        assert_eq!(canonicalize(&once).as_deref(), Some(once.as_str()), "{input}");
        assert_eq!(parse_length(&once), parse_length(input));
    }
    assert_eq!(canonicalize("calc(4px / 0)"), None);
}

#[test]
fn hex_colors_round_trip_to_bytes() {
    let cases = [
        ("#abc", [170, 187, 204, 255]),
        ("#0a0b0c", [10, 11, 12, 255]),
        ("#11223380", [17, 34, 51, 128]),
    ];
    for (hex, bytes) in cases {
        let color = parse_color(hex).unwrap();
        for channel in [color.r, color.g, color.b, color.a] {
            assert!((0.0..=1.0).contains(&channel), "{hex}");
        }
        assert_eq!(color.to_bytes(), bytes, "{hex}");
    }
}

#[test]
fn gradient_stops_are_kept_and_ordered() {
    let g = parse_gradient("linear-gradient(to right, red, green, blue)").unwrap();
    let positions: Vec<f32> = g.stops().iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0.0, 0.5, 1.0]);

    let g = parse_gradient("linear-gradient(45deg, red 60%, rgba(0, 0, 0, 0.5) 20%, blue 140%)")
        .unwrap();
    let positions: Vec<f32> = g.stops().iter().map(|s| s.position).collect();
    assert_eq!(positions.len(), 3);
    assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    assert!(positions.iter().all(|p| (0.0..=1.0).contains(p)));

    assert!(parse_gradient("linear-gradient(red)").is_none());
}

// =====================================================================
// Synthesis properties
// =====================================================================

#[test]
fn flex_weights_distribute_free_space() {
    let snap = snapshot(
        r#"<div style="display: flex; width: 400px">
            <div id="a" style="flex: 1; height: 10px"></div>
            <div id="b" style="flex: 1; height: 10px"></div>
            <div id="c" style="flex: 2; height: 10px"></div>
        </div>"#,
    );
    let widths: Vec<f32> = ["a", "b", "c"]
        .iter()
        .map(|n| snap.find(n).unwrap().width)
        .collect();
    assert_eq!(widths, vec![100.0, 100.0, 200.0]);
    assert_eq!(snap.find("c").unwrap().x, 200.0);
}

#[test]
fn growing_child_without_room_keeps_its_content() {
    let snap = snapshot(
        r#"<div style="display: flex; width: 100px">
            <div style="width: 150px; height: 10px"></div>
            <div id="g" style="flex: 1"><span>hello</span></div>
        </div>"#,
    );
    let g = snap.find("g").unwrap();
    assert!(g.width >= 40.0, "collapsed to {}", g.width);
    assert_ne!(g.sizing[0], SizingMode::Fill);
}

#[test]
fn growing_child_in_hugging_row_keeps_declared_width() {
    let snap = snapshot(
        r#"<div style="display: inline-flex">
            <div id="a" style="flex: 1; width: 30px; height: 10px"></div>
            <div style="width: 20px; height: 10px"></div>
        </div>"#,
    );
    assert_eq!(snap.find("a").unwrap().width, 30.0);
    assert_eq!(snap.width, 50.0);
}

#[test]
fn nested_growth_resolves_after_parent_share() {
    let snap = snapshot(
        r#"<div style="display: flex; width: 600px">
            <div style="width: 200px; height: 10px"></div>
            <div id="outer" style="flex: 1; display: flex">
                <div id="a" style="flex: 1; height: 10px"></div>
                <div id="b" style="flex: 3; height: 10px"></div>
            </div>
        </div>"#,
    );
    let widths: Vec<f32> = ["outer", "a", "b"]
        .iter()
        .map(|n| snap.find(n).unwrap().width)
        .collect();
    assert_eq!(widths, vec![400.0, 100.0, 300.0]);
}

#[test]
fn growing_text_rewraps_after_distribution() {
    let snap = snapshot(
        r#"<div style="display: flex; width: 300px">
            <div style="width: 100px; height: 10px"></div>
            <p id="copy" style="flex: 1">aaaa bbbb cccc dddd eeee ffff gggg hhhh</p>
        </div>"#,
    );
    let line = snapshot("<p>x</p>").height;
    let copy = snap.find("copy").unwrap();
    assert_eq!(copy.width, 200.0);
    assert_eq!(copy.height, line * 2.0);
}

#[test]
fn auto_top_margin_pushes_to_the_end() {
    let snap = snapshot(
        r#"<div style="display: flex; flex-direction: column; width: 200px; height: 300px">
            <div id="top" style="height: 40px"></div>
            <div id="bottom" style="margin-top: auto; height: 50px"></div>
        </div>"#,
    );
    let bottom = snap.find("bottom").unwrap();
    assert_eq!(bottom.y + bottom.height, 300.0);
    assert!(snap.children.iter().any(|c| c.role == Role::GrowSpacer));
}

#[test]
fn absolutes_stack_around_flow_by_z_index() {
    let snap = snapshot(
        r#"<div style="width: 100px; height: 100px">
            <div id="over" style="position: absolute; z-index: 2; top: 0; left: 0; width: 5px; height: 5px"></div>
            <div id="flow" style="height: 10px"></div>
            <div id="under" style="position: absolute; z-index: 0; top: 0; left: 0; width: 5px; height: 5px"></div>
        </div>"#,
    );
    let names: Vec<&str> = snap.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["under", "flow", "over"]);
    assert_eq!(snap.children[0].positioning, Positioning::Absolute);
    assert_eq!(snap.children[1].positioning, Positioning::Auto);
}

#[test]
fn relative_offset_keeps_flow_slot() {
    let snap = snapshot(
        r#"<div style="width: 100px">
            <div id="before" style="height: 20px"></div>
            <div id="moved" style="position: relative; top: 10px; left: 5px; height: 20px"></div>
            <div id="after" style="height: 20px"></div>
        </div>"#,
    );
    assert_eq!(snap.find("after").unwrap().y, 40.0);
    let moved = snap.find("moved").unwrap();
    assert_eq!((moved.x, moved.y), (5.0, 30.0));
    assert_eq!(snap.children.last().map(|c| c.name.as_str()), Some("moved"));
    assert_eq!(snap.children[1].role, Role::Placeholder);
    assert_eq!(snap.height, 60.0);
}

#[test]
fn padding_is_added_to_explicit_width() {
    let (doc, frame) = run(r#"<div style="width: 200px; padding: 20px"></div>"#);
    assert_eq!(frame.width, 240.0);
    let node = doc.node(frame.id).unwrap();
    assert_eq!(node.sizing_horizontal, SizingMode::Fixed);

    let (_, frame) =
        run(r#"<div style="width: 200px; padding: 20px; box-sizing: border-box"></div>"#);
    assert_eq!(frame.width, 200.0);
}

#[test]
fn empty_input_creates_no_box() {
    let err = snapshot_json("   <script>x()</script> ", &default_config());
    assert!(matches!(
        err,
        Err(PipelineError::Synthesis(SynthesisError::NoElements))
    ));

    let mut doc = Document::new();
    let mut fonts = FontManager::default();
    let before = doc.len();
    let result = synthesize(&mut doc, &[], &SynthesisOptions::default(), &mut fonts);
    assert_eq!(result, Err(SynthesisError::NoElements));
    assert_eq!(doc.len(), before);
}

#[test]
fn synthesizes_under_an_existing_frame() {
    let mut doc = Document::new();
    let host = doc.create_frame("host");
    doc.append_child(doc.root(), host).unwrap();
    let elements = build_element_tree(&parse_html(r#"<div style="height: 10px"></div>"#));
    let mut fonts = FontManager::default();
    let options = SynthesisOptions {
        name: "Inner".to_string(),
        parent: Some(host),
        ..Default::default()
    };
    let frame = synthesize(&mut doc, &elements, &options, &mut fonts).unwrap();
    assert_eq!(doc.parent(frame.id), Some(host));
    assert_eq!(doc.find_by_name(doc.root(), "Inner"), Some(frame.id));
}

#[test]
fn viewport_width_constrains_wrapped_text() {
    let config = PipelineConfig {
        viewport_width: Some(120.0),
        ..default_config()
    };
    let mut fonts = FontManager::default();
    let (doc, frame) = synthesize_html(
        "<p>a paragraph long enough to wrap onto several lines</p>",
        &config,
        &mut fonts,
    )
    .unwrap();
    let node = doc.node(frame.id).unwrap();
    assert!(node.is_text());
    assert!(node.width <= 120.0);
    assert!(node.height > 30.0);
}

// =====================================================================
// Text / inline tests
// =====================================================================

#[test]
fn inline_spans_produce_text_nodes() {
    let snap =
        snapshot(r#"<p>Hello <span class="accent" style="color: #2563eb">bold</span> world</p>"#);
    let mut texts = Vec::new();
    visit(&snap, &mut |n| {
        if let Some(text) = &n.text {
            texts.push(text.characters.clone());
        }
    });
    assert_eq!(texts.len(), 3);
    assert!(texts.iter().any(|t| t == "bold"));
}

// =====================================================================
// Templates and snapshots
// =====================================================================

#[test]
fn all_templates_synthesize() {
    for html in [
        templates::card_template(),
        templates::toolbar_template(),
        templates::pricing_template(),
        templates::hero_template(),
        templates::minimal_template(),
        templates::all_elements_template(),
    ] {
        let snap = snapshot(html);
        assert!(snap.width > 0.0 && snap.height > 0.0, "empty frame for {html}");
    }
}

#[test]
fn synthetic_boxes_are_marked() {
    let snap = snapshot(templates::pricing_template());
    let mut roles = Vec::new();
    visit(&snap, &mut |n| roles.push(n.role));
    assert!(roles.contains(&Role::GrowSpacer));
    assert!(roles.iter().all(|r| r.is_synthetic() == (*r != Role::Content)));
    assert!(!snap.role.is_synthetic());
}

#[test]
fn hero_paint_survives_into_snapshot() {
    let snap = snapshot(templates::hero_template());
    assert!(snap.clips_content);
    assert_eq!(snap.fills.len(), 1);
    let sticker = snap.find("sticker").unwrap();
    assert_eq!(sticker.rotation, 12.0);
    assert_eq!(sticker.positioning, Positioning::Absolute);
    assert_eq!(snap.children.last().map(|c| c.name.as_str()), Some("badge"));
}

#[test]
fn snapshot_json_roundtrip() {
    let snap = snapshot(templates::card_template());
    let json = snap.to_json();
    let parsed = NodeSnapshot::from_json(&json).unwrap();
    assert_eq!(parsed.count(), snap.count());
    assert_eq!(parsed.name, snap.name);
    assert!((parsed.width - snap.width).abs() < 0.01);
    assert!((parsed.height - snap.height).abs() < 0.01);
}

// =====================================================================
// Golden-sample stability test
// =====================================================================

#[test]
fn snapshot_output_is_deterministic() {
    let hash = |html: &str| {
        let json = snapshot_json(html, &default_config()).unwrap();
        format!("{:x}", Sha256::digest(json.as_bytes()))
    };
    for html in [templates::minimal_template(), templates::hero_template()] {
        assert_eq!(hash(html), hash(html));
    }
}
