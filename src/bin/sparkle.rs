//! sparkle - gold sparkles around a terminal page
//!
//! Lays out a few lines of text, plays the door-opening intro, then lets the
//! sparkle scheduler decorate every line.
//!
//! Keys: `space` toggle, `e` enable, `d` disable, `1`-`9`/`0` intensity,
//! `q`/`Esc`/`Ctrl+C` quit.
//!
//! Run with: cargo run --bin sparkle -- "Anna & Minh" "12.10.2026"

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use sparkle_tui::document::{Document, Element, INTRO_OVERLAY_ID, TARGET_CLASS};
use sparkle_tui::{
    disable_sparkles, enable_sparkles, layout_page, paint, set_sparkle_intensity,
    toggle_sparkles, Attr, CellMetrics, DiffRenderer, FrameBuffer, FrameClock, Rgba,
    SparkleConfig, SparkleEffect, SparkleHost,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Lines of text to decorate
    #[arg(default_values = ["Save the Date", "Anna & Minh"])]
    lines: Vec<String>,

    /// Skip the door-opening intro
    #[arg(long)]
    no_intro: bool,

    /// Delay before the first burst, after the intro (ms)
    #[arg(long, default_value_t = 2000)]
    start_delay: u64,

    /// Starting density, 1-10
    #[arg(long, env = "SPARKLE_INTENSITY")]
    intensity: Option<i32>,

    /// Seed for reproducible sparkles
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long, env = "SPARKLE_LOG")]
    log: Option<PathBuf>,
}

const HELP: &str = " space toggle · e enable · d disable · 1-0 intensity · q quit";

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = cli.log.as_deref() {
        init_logging(path)?;
    }

    let mut renderer = DiffRenderer::stdout();
    terminal::enable_raw_mode()?;
    renderer.enter_fullscreen()?;

    let result = run(&cli, &mut renderer);

    renderer.exit_fullscreen()?;
    terminal::disable_raw_mode()?;
    result
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sparkle=debug")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn build_page(cli: &Cli) -> Document {
    let mut doc = Document::new();
    let body = doc.root();

    if !cli.no_intro {
        let overlay = doc.create_element(Element::new("div").with_id(INTRO_OVERLAY_ID));
        doc.append_child(body, overlay);
    }
    for line in &cli.lines {
        let id = doc.create_element(
            Element::new("h1")
                .with_class(TARGET_CLASS)
                .with_text(line.as_str()),
        );
        doc.append_child(body, id);
    }
    doc
}

fn run(cli: &Cli, renderer: &mut DiffRenderer<io::Stdout>) -> io::Result<()> {
    let metrics = CellMetrics::default();
    let mut doc = build_page(cli);

    let (mut cols, mut rows) = terminal::size()?;
    layout_page(&mut doc, cols, rows.saturating_sub(1), metrics);

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = SparkleConfig::page().with_start_delay(cli.start_delay);
    let mut host = SparkleHost::new();
    host.install_effect(&mut doc, SparkleEffect::with_rng(config, rng));
    if let Some(level) = cli.intensity {
        set_sparkle_intensity(&mut host, level);
    }

    let mut buffer = FrameBuffer::new(cols, rows);
    let mut clock = FrameClock::new();

    loop {
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char(' ') => toggle_sparkles(&mut host),
                    KeyCode::Char('e') => enable_sparkles(&mut host),
                    KeyCode::Char('d') => disable_sparkles(&mut host),
                    KeyCode::Char(c @ '0'..='9') => {
                        let level = match c.to_digit(10) {
                            Some(0) | None => 10,
                            Some(n) => n as i32,
                        };
                        set_sparkle_intensity(&mut host, level);
                    }
                    _ => {}
                },
                Event::Resize(w, h) => {
                    (cols, rows) = (w, h);
                    layout_page(&mut doc, cols, rows.saturating_sub(1), metrics);
                    buffer.resize(cols, rows);
                    renderer.invalidate();
                }
                _ => {}
            }
        }

        host.advance(&mut doc, clock.tick());

        let now = host.effect().map(|e| e.now()).unwrap_or(0);
        paint(&doc, now, metrics, &mut buffer);
        draw_status(&host, &mut buffer);
        renderer.render(&buffer)?;
    }

    host.teardown();
    Ok(())
}

fn draw_status(host: &SparkleHost, buffer: &mut FrameBuffer) {
    let Some(row) = buffer.height().checked_sub(1) else {
        return;
    };
    let status = match host.effect() {
        Some(effect) => format!(
            " {} · {} live · {}/{}ms ·",
            if effect.is_active() { "on" } else { "off" },
            effect.live_particles(),
            effect.config().burst_size,
            effect.config().tick_interval_ms,
        ),
        None => String::from(" -"),
    };
    let used = buffer.draw_text(0, row, &status, Rgba::GOLD, Attr::DIM);
    buffer.draw_text(used, row, HELP, Rgba::GRAY, Attr::DIM);
}
