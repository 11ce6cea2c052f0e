use crate::error::{Error, Result};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where links attach to a node edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkAnchor {
    /// Every link meets the vertical center of the node edge.
    #[default]
    Center,
    /// Links are stacked along the node edge by cumulative stroke width.
    Stacked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub width: f32,
    pub height: f32,
    pub node_width: f32,
    pub node_padding: f32,
    pub min_node_height: f32,
    pub curvature: f32,
    pub link_width_scale: f32,
    pub link_anchor: LinkAnchor,
    pub color_seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            node_width: 20.0,
            node_padding: 10.0,
            min_node_height: 20.0,
            curvature: 0.5,
            link_width_scale: 1.0,
            link_anchor: LinkAnchor::Center,
            color_seed: None,
        }
    }
}

/// Per-document layout options; present fields win over the loaded config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOverrides {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub node_width: Option<f32>,
    pub node_padding: Option<f32>,
    pub min_node_height: Option<f32>,
}

impl LayoutConfig {
    /// Rejects options that would produce empty, overlapping or off-canvas nodes.
    pub fn validate(&self) -> Result<()> {
        let numeric = [
            ("width", self.width),
            ("height", self.height),
            ("nodeWidth", self.node_width),
            ("nodePadding", self.node_padding),
            ("minNodeHeight", self.min_node_height),
            ("curvature", self.curvature),
            ("linkWidthScale", self.link_width_scale),
        ];
        for (option, value) in numeric {
            if !value.is_finite() {
                return Err(invalid(option, format!("must be finite, got {value}")));
            }
        }
        if self.min_node_height <= 0.0 {
            return Err(invalid(
                "minNodeHeight",
                format!("must be positive, got {}", self.min_node_height),
            ));
        }
        if self.node_padding < 0.0 {
            return Err(invalid(
                "nodePadding",
                format!("must not be negative, got {}", self.node_padding),
            ));
        }
        if self.node_width <= 0.0 {
            return Err(invalid(
                "nodeWidth",
                format!("must be positive, got {}", self.node_width),
            ));
        }
        if self.width < self.node_width {
            return Err(invalid(
                "width",
                format!(
                    "{} is narrower than nodeWidth {}",
                    self.width, self.node_width
                ),
            ));
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &LayoutOverrides) {
        if let Some(v) = overrides.width {
            self.width = v;
        }
        if let Some(v) = overrides.height {
            self.height = v;
        }
        if let Some(v) = overrides.node_width {
            self.node_width = v;
        }
        if let Some(v) = overrides.node_padding {
            self.node_padding = v;
        }
        if let Some(v) = overrides.min_node_height {
            self.min_node_height = v;
        }
    }
}

fn invalid(option: &'static str, reason: String) -> Error {
    Error::InvalidConfig { option, reason }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub tooltips: bool,
    pub id_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            background: "#FFFFFF".to_string(),
            tooltips: true,
            id_prefix: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    text_color: Option<String>,
    node_stroke: Option<String>,
    node_stroke_width: Option<NumberOrString>,
    node_corner_radius: Option<NumberOrString>,
    link_opacity: Option<NumberOrString>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SankeyConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    node_width: Option<f32>,
    node_padding: Option<f32>,
    min_node_height: Option<f32>,
    curvature: Option<f32>,
    link_width_scale: Option<f32>,
    link_anchor: Option<LinkAnchor>,
    color_seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    background: Option<String>,
    tooltips: Option<bool>,
    id_prefix: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    sankey: Option<SankeyConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    apply_config_file(&mut config, parsed);
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Merges a `%%{init: ...}%%` directive into an existing config.
pub fn merge_init_config(mut config: Config, init: serde_json::Value) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_value(init)?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        } else {
            log::warn!("unknown theme {theme_name:?}, keeping current theme");
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.node_stroke {
            config.theme.node_stroke = v;
        }
        if let Some(v) = vars
            .node_stroke_width
            .as_ref()
            .and_then(NumberOrString::as_f32)
        {
            config.theme.node_stroke_width = v;
        }
        if let Some(v) = vars
            .node_corner_radius
            .as_ref()
            .and_then(NumberOrString::as_f32)
        {
            config.theme.node_corner_radius = v;
        }
        if let Some(v) = vars.link_opacity.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.link_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = vars.background {
            config.theme.background = v.clone();
            config.render.background = v;
        }
    }

    if let Some(sankey) = parsed.sankey {
        let layout = &mut config.layout;
        if let Some(v) = sankey.width {
            layout.width = v;
            config.render.width = v;
        }
        if let Some(v) = sankey.height {
            layout.height = v;
            config.render.height = v;
        }
        if let Some(v) = sankey.node_width {
            layout.node_width = v;
        }
        if let Some(v) = sankey.node_padding {
            layout.node_padding = v;
        }
        if let Some(v) = sankey.min_node_height {
            layout.min_node_height = v;
        }
        if let Some(v) = sankey.curvature {
            layout.curvature = v;
        }
        if let Some(v) = sankey.link_width_scale {
            layout.link_width_scale = v;
        }
        if let Some(v) = sankey.link_anchor {
            layout.link_anchor = v;
        }
        if sankey.color_seed.is_some() {
            layout.color_seed = sankey.color_seed;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if let Some(v) = render.tooltips {
            config.render.tooltips = v;
        }
        if let Some(v) = render.id_prefix {
            config.render.id_prefix = v;
        }
    }
}
