//! Sample markup for testing and demonstration.
//!
//! Each template exercises a different part of the synthesizer: flex
//! weights, margins, stacking, relative offsets, paint and text.

/// Profile card: padding, radius, shadow, gradient header and wrapped text.
pub fn card_template() -> &'static str {
    r##"
<div id="card" style="width: 320px; padding: 16px; background: #ffffff; border-radius: 12px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15); display: flex; flex-direction: column; gap: 12px">
    <div class="header" style="height: 96px; border-radius: 8px; background: linear-gradient(135deg, #6366f1 0%, #ec4899 100%)"></div>
    <h2 style="font-size: 20px; color: #111827">Ada Lovelace</h2>
    <p style="color: #6b7280; line-height: 1.5">
        Wrote the first published algorithm intended for a machine and saw
        that it could do more than arithmetic.
    </p>
    <button style="padding: 8px 16px; background: #111827; color: #fff; border-radius: 6px; align-self: flex-start">Follow</button>
</div>
"##
}

/// Toolbar row: fixed items, a growing title and space between groups.
pub fn toolbar_template() -> &'static str {
    r##"
<div id="toolbar" style="display: flex; align-items: center; width: 480px; height: 48px; padding: 0 12px; gap: 8px; background: #f3f4f6; border-bottom: 1px solid #e5e7eb">
    <img id="logo" width="24" height="24" style="border-radius: 50%">
    <span style="flex: 1; font-weight: 600">Dashboard</span>
    <div class="actions" style="display: flex; gap: 4px">
        <button style="padding: 4px 8px; border: 1px solid #d1d5db; border-radius: 4px">Share</button>
        <button style="padding: 4px 8px; background: #2563eb; color: white; border-radius: 4px">Publish</button>
    </div>
</div>
"##
}

/// Pricing columns with weighted growth and auto margins.
pub fn pricing_template() -> &'static str {
    r##"
<div id="pricing" style="display: flex; width: 600px; gap: 16px; padding: 24px; background: #fafafa">
    <div class="basic" style="flex: 1; display: flex; flex-direction: column; height: 240px; padding: 16px; border: 1px solid #e5e7eb; border-radius: 8px">
        <h3>Basic</h3>
        <p style="color: #6b7280">For individuals</p>
        <button style="margin-top: auto; padding: 8px; background: #e5e7eb">Choose</button>
    </div>
    <div class="pro" style="flex: 2; display: flex; flex-direction: column; height: 240px; padding: 16px; background: #111827; color: #f9fafb; border-radius: 8px">
        <h3>Pro</h3>
        <p>For teams that ship every day</p>
        <button style="margin-top: auto; padding: 8px; background: #6366f1; color: #fff">Choose</button>
    </div>
</div>
"##
}

/// Hero banner: absolutely positioned layers above and below the flow, a
/// relatively nudged badge and a rotated sticker.
pub fn hero_template() -> &'static str {
    r##"
<section id="hero" style="position: relative; width: 400px; height: 200px; padding: 24px; overflow: hidden; background: radial-gradient(circle at 30% 30%, #fde68a, #f59e0b)">
    <div class="backdrop" style="position: absolute; top: 0; right: 0; bottom: 0; left: 0; z-index: 0; background: rgba(0, 0, 0, 0.2)"></div>
    <h1 style="color: white; font-size: 28px">Summer sale</h1>
    <span class="badge" style="position: relative; top: 4px; left: 8px; padding: 2px 6px; background: #dc2626; color: white; border-radius: 999px">-40%</span>
    <div class="sticker" style="position: absolute; right: 16px; bottom: 16px; width: 64px; height: 64px; z-index: 2; background: #fff; border-radius: 50%; transform: rotate(-12deg)"></div>
</section>
"##
}

/// Smallest useful input.
pub fn minimal_template() -> &'static str {
    "<p>Hello, world!</p>"
}

/// Every supported element in one document.
pub fn all_elements_template() -> &'static str {
    r##"
<div style="width: 360px; padding: 16px; display: flex; flex-direction: column; gap: 8px">
    <h1>Heading 1</h1>
    <h2>Heading 2</h2>
    <h3>Heading 3</h3>
    <p>Paragraph with <strong>bold</strong>, <em>italic</em>, <a href="#">a link</a> and <code>code</code>.</p>
    <blockquote style="padding-left: 12px; border-left: 3px solid #d1d5db">Quoted text</blockquote>
    <ul style="padding-left: 16px">
        <li>First item</li>
        <li>Second item</li>
    </ul>
    <hr>
    <pre style="background: #f3f4f6; padding: 8px">let x = 1;
let y = 2;</pre>
    <img width="120" height="80">
    <p style="white-space: nowrap; overflow: hidden; text-overflow: ellipsis; width: 120px">A line far too long to fit the box it sits in</p>
    <small style="text-transform: uppercase; letter-spacing: 1px">Footnote</small>
    <script>ignored()</script>
    <div style="display: none">Not rendered</div>
</div>
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{snapshot_json, PipelineConfig};

    #[test]
    fn templates_synthesize() {
        for html in [
            card_template(),
            toolbar_template(),
            pricing_template(),
            hero_template(),
            minimal_template(),
            all_elements_template(),
        ] {
            let json = snapshot_json(html, &PipelineConfig::default());
            assert!(json.is_ok(), "template failed: {json:?}");
        }
    }
}
