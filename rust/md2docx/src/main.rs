use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser};
use docx_builder::outline::{outline_nodes, parse_outline};
use docx_builder::{frontend, Conversion, ConvertConfig, DocumentBuilder, DocxWriter, InputFormat};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert Markdown or HTML into a styled .docx")]
struct Args {
    /// Markdown or HTML input file.
    #[arg(long, required_unless_present = "outline", conflicts_with = "outline")]
    input: Option<PathBuf>,

    /// JSON outline (list of {"title", "level"}) to turn into headings instead.
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Output .docx path.
    #[arg(long, required_unless_present = "dump_blocks")]
    out: Option<PathBuf>,

    /// Input format; overrides the config file.
    #[arg(long)]
    format: Option<InputFormat>,

    /// TOML file describing the template styles and document options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Title paragraph placed before the content; overrides the config file.
    #[arg(long)]
    title: Option<String>,

    /// Print the converted blocks as JSON instead of writing a .docx.
    #[arg(long)]
    dump_blocks: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_text(path: &Path) -> Result<String> {
    let mut text = String::new();
    File::open(path)
        .with_context(|| format!("open {}", path.display()))?
        .read_to_string(&mut text)
        .with_context(|| format!("read {}", path.display()))?;
    if text.trim().is_empty() {
        return Err(anyhow!("empty input: {}", path.display()));
    }
    Ok(text)
}

/// Extension wins over sniffing when the config leaves the format on auto.
fn format_for(path: &Path, configured: InputFormat) -> InputFormat {
    if configured != InputFormat::Auto {
        return configured;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.parse().unwrap_or(InputFormat::Auto),
        None => InputFormat::Auto,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => ConvertConfig::load(path)?,
        None => ConvertConfig::default(),
    };
    if let Some(format) = args.format {
        config.document.input = format;
    }
    if args.title.is_some() {
        config.document.title = args.title.clone();
    }

    let nodes = match (&args.input, &args.outline) {
        (Some(path), _) => {
            let text = read_text(path)?;
            frontend::parse(&text, format_for(path, config.document.input))
        }
        (None, Some(path)) => {
            let raw = read_text(path)?;
            let entries =
                parse_outline(&raw).with_context(|| format!("outline {}", path.display()))?;
            outline_nodes(&entries)
        }
        (None, None) => bail!("either --input or --outline is required"),
    };

    let registry = config.registry();
    let Conversion { blocks, warnings } = DocumentBuilder::new(&registry).convert(&nodes);
    for w in &warnings {
        warn!("{w}");
    }

    if args.dump_blocks {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    let out = args.out.as_deref().ok_or_else(|| anyhow!("--out is required"))?;
    DocxWriter::new(&registry)
        .with_title(config.document.title.clone())
        .write_to(&blocks, out)
        .with_context(|| format!("write {}", out.display()))?;
    info!(path = %out.display(), blocks = blocks.len(), warnings = warnings.len(), "wrote document");
    Ok(())
}
