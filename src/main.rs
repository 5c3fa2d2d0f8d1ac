//! `carousel`: render a text file into numbered carousel slides.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use carousel_renderer::{
    ChunkOptions, DEFAULT_MAX_CHARS, DEFAULT_SIZE, FontBook, FooterMode, RenderOptions,
    SlideRenderer, StyleConfig, export_all,
};

#[derive(Parser, Debug)]
#[command(name = "carousel", about = "Split text into square carousel slides")]
struct Args {
    /// Input text file. Reads stdin when omitted or "-".
    input: Option<PathBuf>,

    /// Directory the slides are written to.
    #[arg(short, long, default_value = "slides")]
    out: PathBuf,

    /// Maximum characters per slide.
    #[arg(long, default_value_t = DEFAULT_MAX_CHARS)]
    max_chars: usize,

    /// Pack words across paragraph boundaries.
    #[arg(long)]
    no_preserve_paragraphs: bool,

    /// Style JSON file; individual style flags override it.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Gradient preset (e.g. gradient-peach-cream) or solid color.
    #[arg(long)]
    background: Option<String>,

    /// CSS font-family list.
    #[arg(long)]
    font_family: Option<String>,

    /// Font size in pixels.
    #[arg(long)]
    font_size: Option<f32>,

    /// Text color.
    #[arg(long)]
    text_color: Option<String>,

    /// Extra font file to make available to --font-family.
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Slide side length in pixels.
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: u32,

    /// Omit the page-number footer.
    #[arg(long)]
    hide_footer: bool,
}

impl Args {
    fn load_style(&self) -> anyhow::Result<StyleConfig> {
        let mut style = match &self.style {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading style file {}", path.display()))?;
                StyleConfig::from_json(&json)
                    .with_context(|| format!("parsing style file {}", path.display()))?
            }
            None => StyleConfig::default(),
        };

        if let Some(background) = &self.background {
            style.background = background.clone();
        }
        if let Some(family) = &self.font_family {
            style.font_family = family.clone();
        }
        if let Some(size) = self.font_size {
            style.font_size = size;
        }
        if let Some(color) = &self.text_color {
            style.text_color = color.clone();
        }

        Ok(style)
    }

    fn read_input(&self) -> anyhow::Result<String> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("reading input {}", path.display())),
            _ => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("reading stdin")?;
                Ok(text)
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let text = args.read_input()?;
    let style = args.load_style()?;

    let chunking =
        ChunkOptions::new(args.max_chars).with_preserve_paragraphs(!args.no_preserve_paragraphs);
    let chunks = chunking.split(&text);
    if chunks.is_empty() {
        warn!("Input is empty, nothing to render");
        return Ok(());
    }
    info!("Split input into {} slides", chunks.len());

    let mut book = FontBook::system();
    if let Some(path) = &args.font_file {
        book.load_font_file(path)
            .with_context(|| format!("loading font {}", path.display()))?;
    }
    let face = book.resolve(&style.font_family)?;

    let footer = if args.hide_footer {
        FooterMode::Hidden
    } else {
        FooterMode::Reserved
    };
    let renderer = SlideRenderer::new(face, RenderOptions::new(args.size).with_footer(footer));

    let slides = renderer.generate_images(&chunks, &style)?;
    let paths = export_all(&slides, &args.out)?;

    let truncated = slides.iter().filter(|slide| slide.truncated).count();
    if truncated > 0 {
        warn!("{} slides had text cut off; try a lower --max-chars", truncated);
    }
    info!("Wrote {} slides to {}", paths.len(), args.out.display());

    Ok(())
}
