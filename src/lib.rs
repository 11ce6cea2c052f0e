#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, LinkAnchor, RenderConfig};
pub use error::{Error, ErrorKind};
pub use ir::{LinkSpec, NodeRef, NodeSpec, SankeyData};
pub use layout::{Layout, LinkLayout, NodeLayout, Stroke, compute_layout, spawn_layout};
pub use parser::parse_sankey;
pub use render::{RenderContext, render_svg};
pub use theme::Theme;

/// Everything needed to turn chart text into SVG in one call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::default()
        }
    }

    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.layout.width = width;
        self.layout.height = height;
        self.render.width = width;
        self.render.height = height;
        self
    }
}

impl From<Config> for RenderOptions {
    fn from(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
        }
    }
}

/// Parses `input`, lays it out and renders SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let parsed = parse_sankey(input)?;
    let mut config = Config {
        theme: options.theme,
        layout: options.layout,
        render: options.render,
    };
    if let Some(init_cfg) = parsed.init_config {
        config = config::merge_init_config(config, init_cfg)?;
    }
    config.layout.apply_overrides(&parsed.overrides);
    let chart = compute_layout(&parsed.data, &config.layout)?;
    Ok(render_svg(
        &chart,
        &config.theme,
        &RenderContext::from_config(&config.render),
    ))
}

pub fn render(input: &str) -> anyhow::Result<String> {
    render_with_options(input, RenderOptions::default())
}
