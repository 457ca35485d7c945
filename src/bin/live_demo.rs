//! Scripted live view session over an in-memory buffer.
//!
//! Builds a view, registers one live region per `--link`, then replays each
//! `--click` as a caret selection event and reports what handled it.
//!
//! ```text
//! RUST_LOG=live_view=trace live_demo --link 0:4 --link 9:13 --click 2 --click 13
//! ```

use anyhow::Context;
use clap::Parser;
use live_view::config::LiveViewConfig;
use live_view::host::memory::{MemoryHost, MemoryView};
use live_view::host::View;
use live_view::input::commands::{run_command, UpdateLiveView};
use live_view::live::{ApplySettings, LiveRegion, LiveViews, ViewRegion};
use live_view::model::span::Span;
use live_view::model::style::{RegionFlags, RegionStyle};
use live_view::services::time_source::TestTimeSource;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "live_demo")]
#[command(about = "Replay clicks against live regions in an in-memory view", long_about = None)]
struct Args {
    /// Buffer contents
    #[arg(long, default_value = "Open Save Quit Help")]
    text: String,

    /// Live region as START:END (repeatable)
    #[arg(long = "link", value_name = "START:END", value_parser = parse_span)]
    links: Vec<Span>,

    /// Caret position to click (repeatable)
    #[arg(long = "click", value_name = "POINT")]
    clicks: Vec<usize>,

    /// Milliseconds between simulated clicks
    #[arg(long, default_value_t = 250)]
    gap_ms: u64,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn parse_span(s: &str) -> Result<Span, String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got {s:?}"))?;
    let a = a.parse::<usize>().map_err(|e| e.to_string())?;
    let b = b.parse::<usize>().map_err(|e| e.to_string())?;
    Ok(Span::new(a, b))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .try_init();

    let config = match &args.config {
        Some(path) => LiveViewConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => LiveViewConfig::default(),
    };
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let clock = TestTimeSource::shared();
    let mut live_views = LiveViews::new(MemoryHost::new(), config);
    let options = live_views
        .options()
        .with_name("live demo")
        .with_time_source(clock.clone())
        .with_process(|live_view| {
            let point = live_view.sel().first().map(Span::begin);
            println!("click at {point:?}: no live region");
            Ok(())
        });
    let view = live_views.get_or_create(None, options).view().clone();
    run_command(&view, UpdateLiveView::NAME, json!({ "data": args.text }))?;

    let links = if args.links.is_empty() {
        word_spans(&args.text)
    } else {
        args.links.clone()
    };

    let live_view = live_views
        .get_mut(&view)
        .context("live view disappeared")?;
    live_view.apply_settings(ApplySettings {
        read_only: Some(true),
        scratch: Some(true),
        ..ApplySettings::default()
    });
    let regions = links
        .iter()
        .enumerate()
        .map(|(index, span)| {
            LiveRegion::<MemoryView>::from_span(*span)
                .with_process(move |region, live_view| {
                    println!(
                        "link #{index} {region} clicked: {:?}",
                        live_view.substr(region.span())
                    );
                    Ok(())
                })
                .into()
        })
        .collect::<Vec<ViewRegion<MemoryView>>>();
    let style = RegionStyle::new("markup.underline.link").with_flags(RegionFlags::DRAW_NO_FILL);
    live_view.add_regions("links", regions, &style);

    for point in &args.clicks {
        clock.advance(Duration::from_millis(args.gap_ms));
        view.set_caret(*point);
        live_views.on_selection_modified(&view)?;
    }

    if let Some(live_view) = live_views.get_mut(&view) {
        live_view.erase_regions("links");
    }
    live_views.on_close(&view);
    tracing::info!("closed {}, read-only restored to {}", view.id(), view.is_read_only());
    Ok(())
}

/// One span per whitespace-separated word
fn word_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.chars().enumerate() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push(Span::new(s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(Span::new(s, text.chars().count()));
    }
    spans
}
