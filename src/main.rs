//! forge – command-line markup → auto-layout frame converter.
//!
//! Usage:
//!   forge <input.html> [output.json] [--name Card] [--width 390] [--config forge.json]
//!
//! If `output.json` is omitted the snapshot is written next to the input
//! file with the same stem (e.g. `card.html` → `card.json`).

use std::{env, fs, path::PathBuf, process};

use frame_forge::fonts::FontManager;
use frame_forge::pipeline::{synthesize_html, PipelineConfig};
use frame_forge::snapshot::NodeSnapshot;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut name: Option<String> = None;
    let mut width: Option<f32> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--name" | "-n" => match iter.next() {
                Some(v) => name = Some(v.clone()),
                None => usage_error(&args[0], "--name needs a value"),
            },
            "--width" | "-w" => match iter.next().map(|v| v.parse::<f32>()) {
                Some(Ok(v)) if v > 0.0 => width = Some(v),
                _ => usage_error(&args[0], "--width needs a positive number"),
            },
            "--config" | "-c" => match iter.next() {
                Some(v) => config_path = Some(PathBuf::from(v)),
                None => usage_error(&args[0], "--config needs a path"),
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                usage_error(&args[0], &format!("Unknown flag: {other}"));
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    usage_error(&args[0], &format!("Unexpected argument: {path}"));
                }
                positional += 1;
            }
        }
    }

    let Some(input) = input_path else {
        usage_error(&args[0], "Error: no input file specified.");
    };

    // Default output: same directory + same stem as input, but with .json
    let output = output_path.unwrap_or_else(|| {
        let mut o = input.clone();
        o.set_extension("json");
        o
    });

    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(&path).unwrap_or_else(|e| {
                fail(&format!("Error reading '{}': {e}", path.display()))
            });
            PipelineConfig::from_json(&text).unwrap_or_else(|e| {
                fail(&format!("Error in '{}': {e}", path.display()))
            })
        }
        None => PipelineConfig::default(),
    };
    // Flags override the config file. The default name is the input stem.
    config.name = name.unwrap_or_else(|| {
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or(config.name.clone())
    });
    if width.is_some() {
        config.viewport_width = width;
    }

    let html = fs::read_to_string(&input)
        .unwrap_or_else(|e| fail(&format!("Error reading '{}': {e}", input.display())));

    let mut fonts = FontManager::default();
    let (doc, frame) = synthesize_html(&html, &config, &mut fonts)
        .unwrap_or_else(|e| fail(&format!("Error synthesizing '{}': {e}", input.display())));
    let Some(snapshot) = NodeSnapshot::capture(&doc, frame.id) else {
        fail("Error: synthesized frame missing from the document");
    };

    // Create output directory if necessary.
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                fail(&format!("Error creating output directory: {e}"));
            }
        }
    }
    if let Err(e) = fs::write(&output, snapshot.to_json()) {
        fail(&format!("Error writing '{}': {e}", output.display()));
    }
    for warning in &frame.warnings {
        eprintln!("warning: {warning}");
    }
    let boxes = snapshot.count();
    eprintln!(
        "Wrote '{}' ({}×{}, {} box{})",
        output.display(),
        frame.width,
        frame.height,
        boxes,
        if boxes == 1 { "" } else { "es" }
    );
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn usage_error(prog: &str, message: &str) -> ! {
    eprintln!("{message}");
    print_usage(prog);
    process::exit(1);
}

fn print_usage(prog: &str) {
    eprintln!("forge – inline-styled HTML to auto-layout frames (frame-forge)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <input.html> [output.json] [--name Card] [--width 390] [--config forge.json]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <input.html>   Markup to convert (inline `style` attributes only)");
    eprintln!("  [output.json]  Snapshot path (default: same stem as input with .json)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --name, -n     Name of the top-level frame (default: input filename stem)");
    eprintln!("  --width, -w    Viewport width in px (default: unconstrained)");
    eprintln!("  --config, -c   JSON file with name, viewport_width, default_font_family, default_font_size");
    eprintln!("  --help         Print this message");
}
