use crate::config::{Config, LayoutOverrides, LinkAnchor, load_config, merge_init_config};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_sankey;
use crate::render::{RenderContext, render_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sankeyflow", version, about = "Sankey flow diagram layout and renderer")]
pub struct Args {
    /// Input file (.json, .csv, .md) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG/JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    #[arg(long = "nodeWidth")]
    pub node_width: Option<f32>,

    #[arg(long = "nodePadding")]
    pub node_padding: Option<f32>,

    #[arg(long = "minNodeHeight")]
    pub min_node_height: Option<f32>,

    /// Stack links along node edges instead of meeting at the center
    #[arg(long = "stacked-links")]
    pub stacked_links: bool,

    /// Seed for generated node colors
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut base_config = load_config(args.config.as_deref())?;
    apply_args(&mut base_config, &args);

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let charts = if is_markdown {
        extract_sankey_blocks(&input)
    } else {
        vec![input]
    };

    if charts.is_empty() {
        return Err(anyhow::anyhow!("No sankey charts found in input"));
    }

    if charts.len() == 1 {
        return render_chart(&charts[0], &base_config, &args, args.output.as_deref());
    }

    let outputs = resolve_multi_outputs(args.output.as_deref(), args.output_format, charts.len())?;
    for (idx, chart) in charts.iter().enumerate() {
        render_chart(chart, &base_config, &args, Some(&outputs[idx]))?;
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn apply_args(config: &mut Config, args: &Args) {
    if args.stacked_links {
        config.layout.link_anchor = LinkAnchor::Stacked;
    }
    if args.seed.is_some() {
        config.layout.color_seed = args.seed;
    }
}

impl Args {
    fn layout_overrides(&self) -> LayoutOverrides {
        LayoutOverrides {
            width: self.width,
            height: self.height,
            node_width: self.node_width,
            node_padding: self.node_padding,
            min_node_height: self.min_node_height,
        }
    }
}

fn render_chart(source: &str, base: &Config, args: &Args, output: Option<&Path>) -> Result<()> {
    let parsed = parse_sankey(source)?;
    let mut config = base.clone();
    if let Some(init_cfg) = parsed.init_config {
        config = merge_init_config(config, init_cfg)?;
    }
    // Command-line flags win over document options.
    config.layout.apply_overrides(&parsed.overrides);
    config.layout.apply_overrides(&args.layout_overrides());
    config.render.width = config.layout.width;
    config.render.height = config.layout.height;

    let layout = compute_layout(&parsed.data, &config.layout)?;
    log::info!(
        "laid out {} nodes and {} links in {} columns",
        layout.nodes.len(),
        layout.links.len(),
        layout.layer_count
    );

    match args.output_format {
        OutputFormat::Json => write_layout_dump(output, &layout),
        OutputFormat::Svg => {
            let ctx = RenderContext::from_config(&config.render);
            let svg = render_svg(&layout, &config.theme, &ctx);
            write_output_svg(&svg, output)
        }
        OutputFormat::Png => {
            let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            let ctx = RenderContext::from_config(&config.render);
            let svg = render_svg(&layout, &config.theme, &ctx);
            let mut render = config.render.clone();
            render.height = render.height.max(layout.height);
            write_output_png(&svg, output, &render)
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)?;
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| matches!(ext, "md" | "markdown"))
            .unwrap_or(false);
        return Ok((content, is_md));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

/// Collects fenced ```sankey blocks, plus ```mermaid blocks whose body is a sankey chart.
fn extract_sankey_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = Vec::new();
    let mut fence = String::new();
    let mut mermaid = false;

    for line in input.lines() {
        let trimmed = line.trim();
        if !in_block {
            if let Some((start_fence, is_mermaid)) = detect_sankey_fence(trimmed) {
                in_block = true;
                fence = start_fence;
                mermaid = is_mermaid;
                continue;
            }
        } else if is_fence_end(trimmed, &fence) {
            in_block = false;
            let body = current.join("\n");
            if !mermaid || is_sankey_body(&body) {
                blocks.push(body);
            }
            current.clear();
            continue;
        }

        if in_block {
            current.push(line.to_string());
        }
    }

    blocks
}

fn detect_sankey_fence(line: &str) -> Option<(String, bool)> {
    for fence in ["```", "~~~"] {
        if let Some(rest) = line.strip_prefix(fence) {
            let info = rest.trim_start_matches(fence.chars().next()?).trim();
            if info.starts_with("sankey") {
                return Some((fence.to_string(), false));
            }
            if info.starts_with("mermaid") {
                return Some((fence.to_string(), true));
            }
        }
    }
    None
}

fn is_sankey_body(body: &str) -> bool {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("%%"))
        .map(|line| line.to_ascii_lowercase().starts_with("sankey"))
        .unwrap_or(false)
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    if !line.starts_with(fence) {
        return false;
    }
    line[fence.len()..].trim().is_empty()
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;
    if base.is_dir() {
        let mut outputs = Vec::new();
        for idx in 0..count {
            outputs.push(base.join(format!("sankey-{}.{}", idx + 1, ext)));
        }
        return Ok(outputs);
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("sankey");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    let mut outputs = Vec::new();
    for idx in 0..count {
        outputs.push(parent.join(format!("{}-{}.{}", stem, idx + 1, ext)));
    }
    Ok(outputs)
}
