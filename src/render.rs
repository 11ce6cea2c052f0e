use crate::config::RenderConfig;
use crate::layout::{Layout, LinkLayout, NodeLayout, Stroke};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Per-render state handed to the SVG writer.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Emit `<title>` tooltips on nodes and links.
    pub tooltips: bool,
    /// Prepended to gradient ids so several charts can share one document.
    pub id_prefix: String,
    /// Canvas fill; falls back to the theme background when empty.
    pub background: String,
}

impl RenderContext {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            tooltips: config.tooltips,
            id_prefix: config.id_prefix.clone(),
            background: config.background.clone(),
        }
    }

    fn gradient_id(&self, id: &str) -> String {
        format!("{}{}", self.id_prefix, id)
    }
}

pub fn render_svg(layout: &Layout, theme: &Theme, ctx: &RenderContext) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"sankey-flow-svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    let background = if ctx.background.is_empty() {
        &theme.background
    } else {
        &ctx.background
    };
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(background)
    ));

    svg.push_str("<defs>");
    for link in &layout.links {
        if let Some(gradient) = link.stroke.gradient() {
            svg.push_str(&format!(
                "<linearGradient id=\"{}\" x1=\"0%\" y1=\"0%\" x2=\"100%\" y2=\"0%\"><stop offset=\"0%\" stop-color=\"{}\"/><stop offset=\"100%\" stop-color=\"{}\"/></linearGradient>",
                escape_xml(&ctx.gradient_id(&gradient.id)),
                escape_xml(&gradient.from),
                escape_xml(&gradient.to)
            ));
        }
    }
    svg.push_str("</defs>");

    for link in &layout.links {
        svg.push_str(&link_svg(link, theme, ctx));
    }
    for node in &layout.nodes {
        svg.push_str(&node_svg(node, theme, ctx));
    }

    svg.push_str("</svg>");
    svg
}

fn link_svg(link: &LinkLayout, theme: &Theme, ctx: &RenderContext) -> String {
    let stroke = match &link.stroke {
        Stroke::Solid { color } => escape_xml(color),
        Stroke::Gradient(gradient) => format!("url(#{})", escape_xml(&ctx.gradient_id(&gradient.id))),
    };
    let mut out = format!(
        "<path class=\"sankey-flow-link\" d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\" opacity=\"{}\">",
        link.path, stroke, link.stroke_width, theme.link_opacity
    );
    if ctx.tooltips {
        out.push_str(&format!(
            "<title>{} → {}\nValue: {}</title>",
            escape_xml(&link.source_name),
            escape_xml(&link.target_name),
            link.value
        ));
    }
    out.push_str("</path>");
    out
}

fn node_svg(node: &NodeLayout, theme: &Theme, ctx: &RenderContext) -> String {
    let mut out = String::from("<g class=\"sankey-flow-node\">");
    out.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" rx=\"{r}\" ry=\"{r}\" stroke-width=\"{}\">",
        node.x0,
        node.y0,
        node.width(),
        node.height(),
        escape_xml(&node.color),
        escape_xml(&theme.node_stroke),
        theme.node_stroke_width,
        r = theme.node_corner_radius,
    ));
    if ctx.tooltips {
        out.push_str(&format!(
            "<title>{}\nIn: {}\nOut: {}</title>",
            escape_xml(&node.name),
            node.value_in,
            node.value_out
        ));
    }
    out.push_str("</rect>");
    out.push_str(&format!(
        "<text class=\"sankey-flow-text\" x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        node.x0 + node.width() / 2.0,
        node.center_y(),
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&theme.text_color),
        escape_xml(&node.name)
    ));
    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

/// Rasterizes `svg` into a PNG of `render_cfg.width` x `render_cfg.height` pixels.
#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)?;

    let target_w = render_cfg.width.max(1.0).round() as u32;
    let target_h = render_cfg.height.max(1.0).round() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(target_w, target_h)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let size = tree.size();
    let transform = resvg::tiny_skia::Transform::from_scale(
        target_w as f32 / size.width(),
        target_h as f32 / size.height(),
    );
    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, transform, &mut pixmap_mut);
    pixmap.save_png(output)?;
    log::debug!("wrote {}x{} png to {}", target_w, target_h, output.display());
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
