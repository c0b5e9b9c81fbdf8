use crate::config::{Config, load_config};
use crate::diagram::Diagram;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_svg};
use crate::template::{export_template, export_text, import_text};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "toulmin", version, about = "Toulmin argument diagrams with auto-flowing layout")]
pub struct Args {
    /// Plain-text argument file or '-' for stdin. Starts from an empty diagram if omitted.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout except for PNG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Box edit applied after import, e.g. --set claim="Harry is a British subject"
    #[arg(short = 's', long = "set", value_name = "KEY=TEXT")]
    pub set: Vec<String>,

    /// Pixel density for PNG output
    #[arg(long = "scale")]
    pub scale: Option<f32>,

    /// Use the built-in width table instead of system font metrics
    #[arg(long = "fastText")]
    pub fast_text: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Text,
    Template,
    Json,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = build_config(&args)?;

    let mut diagram = Diagram::new(config);
    if let Some(path) = args.input.as_deref() {
        let input = read_input(path)?;
        let report = import_text(&mut diagram, &input)?;
        if !report.ignored.is_empty() {
            tracing::info!(ignored = ?report.ignored, "skipped unrecognized sections");
        }
    }
    for edit in &args.set {
        let (key, text) = parse_edit(edit)?;
        diagram.set_content_by_name(key, text)?;
    }

    let config = diagram.config();
    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(diagram.layout(), &config.theme, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(diagram.layout(), &config.theme, &config.layout);
            write_png(&svg, &output, config)?;
        }
        OutputFormat::Text => {
            write_output_text(&export_text(&diagram), args.output.as_deref())?;
        }
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => {
                let file = std::fs::File::create(path)?;
                write_layout_dump(io::BufWriter::new(file), diagram.layout())?;
            }
            None => write_layout_dump(io::stdout().lock(), diagram.layout())?,
        },
        OutputFormat::Template => {
            write_output_text(&export_template(), args.output.as_deref())?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(scale) = args.scale {
        config.render.scale = scale;
    }
    if args.fast_text {
        config.layout.fast_text_metrics = true;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{}", text),
    }
    Ok(())
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

/// Splits `KEY=TEXT`, expanding `\n` escapes in the text.
fn parse_edit(edit: &str) -> Result<(&str, String)> {
    let (key, text) = edit
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected KEY=TEXT, got `{edit}`"))?;
    Ok((key.trim(), text.replace("\\n", "\n")))
}
