use crate::canvas::SvgCanvas;
use crate::config::{Options, load_options};
use crate::export::patch_legacy_namespaces;
use crate::graph::Graph;
use crate::ir::Direction;
use crate::layout_dump::write_layout_dump;
use crate::parser::{TreeKeys, parse_tree_with};
use crate::render::write_output_svg;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "otr", version, about = "Tree and org chart renderer in Rust")]
pub struct Args {
    /// Input file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Chart options file (JSON or JSON5, camelCase keys)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Layout direction: top, bottom, left or right
    #[arg(short = 'd', long = "direction")]
    pub direction: Option<Direction>,

    /// Collapse this node before writing; may be repeated
    #[arg(long = "collapse")]
    pub collapse: Vec<String>,

    /// Id field of flat input records
    #[arg(long = "idKey", default_value = "id")]
    pub id_key: String,

    /// Parent id field of flat input records
    #[arg(long = "parentKey", default_value = "parentId")]
    pub parent_key: String,

    /// Also write a JSON dump of node boxes and edge paths
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Strip empty NSn namespace prefixes from the output
    #[arg(long = "legacyNamespaces")]
    pub legacy_namespaces: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut options = load_options(args.config.as_deref())?;
    apply_overrides(&mut options, &args);

    let input = read_input(args.input.as_deref())?;
    let keys = TreeKeys {
        id_key: args.id_key.clone(),
        parent_key: args.parent_key.clone(),
    };
    let data = parse_tree_with(&input, &keys)?;

    let canvas = SvgCanvas::new(options.width, options.height, options.canvas_style.clone());
    let mut graph = Graph::new(&data, options, canvas)?;
    graph.render();
    for id in &args.collapse {
        if !graph.collapse(id) {
            tracing::warn!(id = %id, "nothing to collapse");
        }
    }

    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &graph)?;
    }

    let mut svg = graph.export_to_svg();
    if args.legacy_namespaces {
        svg = patch_legacy_namespaces(&svg);
    }
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, graph.options())?;
        }
    }
    Ok(())
}

fn apply_overrides(options: &mut Options, args: &Args) {
    if let Some(width) = args.width {
        options.width = width;
    }
    if let Some(height) = args.height {
        options.height = height;
    }
    if let Some(direction) = args.direction {
        options.direction = direction;
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, options: &Options) -> Result<()> {
    crate::render::write_output_png(svg, output, options.width, options.height)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _options: &Options) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
