use crate::config::LayoutOverrides;
use crate::ir::{LinkSpec, LinkValue, NodeRef, NodeSpec, SankeyData};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^sankey(-beta)?\s*$").unwrap());
static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*init\s*:\s*(\{.*\})\s*\}%%").unwrap());

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub data: SankeyData,
    pub overrides: LayoutOverrides,
    pub init_config: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartDocument {
    #[serde(default)]
    nodes: Vec<NodeSpec>,
    #[serde(default)]
    links: Vec<LinkSpec>,
    width: Option<f32>,
    height: Option<f32>,
    node_width: Option<f32>,
    node_padding: Option<f32>,
    min_node_height: Option<f32>,
}

/// Parses either a JSON/JSON5 chart document or `source,target,value` lines.
pub fn parse_sankey(input: &str) -> Result<ParseOutput> {
    if looks_like_document(input) {
        parse_document(input)
    } else {
        parse_csv(input)
    }
}

fn looks_like_document(input: &str) -> bool {
    input
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("//"))
        .map(|line| line.starts_with('{'))
        .unwrap_or(false)
}

fn parse_document(input: &str) -> Result<ParseOutput> {
    let doc: ChartDocument = match serde_json::from_str(input) {
        Ok(doc) => doc,
        Err(json_err) => json5::from_str(input)
            .map_err(|_| json_err)
            .context("invalid chart document")?,
    };
    Ok(ParseOutput {
        data: SankeyData {
            nodes: doc.nodes,
            links: doc.links,
        },
        overrides: LayoutOverrides {
            width: doc.width,
            height: doc.height,
            node_width: doc.node_width,
            node_padding: doc.node_padding,
            min_node_height: doc.min_node_height,
        },
        init_config: None,
    })
}

fn parse_csv(input: &str) -> Result<ParseOutput> {
    let (lines, init_config) = preprocess_input(input);
    let mut data = SankeyData::new();

    for line in lines {
        if HEADER_RE.is_match(&line) {
            continue;
        }
        let parts = split_args(&line);
        if parts.len() < 3 {
            log::debug!("skipping line without three fields: {line:?}");
            continue;
        }
        let from = strip_quotes(&parts[0]);
        let to = strip_quotes(&parts[1]);
        if from.is_empty() || to.is_empty() {
            continue;
        }
        data.ensure_node(&from);
        data.ensure_node(&to);
        data.links.push(LinkSpec {
            source: NodeRef::Name(from),
            target: NodeRef::Name(to),
            value: LinkValue::Text(strip_quotes(&parts[2])),
        });
    }

    Ok(ParseOutput {
        data,
        overrides: LayoutOverrides::default(),
        init_config,
    })
}

fn preprocess_input(input: &str) -> (Vec<String>, Option<serde_json::Value>) {
    let mut init_config: Option<serde_json::Value> = None;
    let mut lines = Vec::new();

    for raw_line in input.lines() {
        let trimmed_line = raw_line.trim();
        if trimmed_line.is_empty() {
            continue;
        }
        if let Some(caps) = INIT_RE.captures(trimmed_line) {
            if let Some(json_str) = caps.get(1).map(|m| m.as_str()) {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(json_str) {
                    init_config = Some(value);
                } else if let Ok(value) = json5::from_str::<serde_json::Value>(json_str) {
                    init_config = Some(value);
                } else {
                    log::warn!("ignoring unparsable init directive");
                }
            }
            continue;
        }
        if trimmed_line.starts_with("%%") {
            continue;
        }
        lines.push(trimmed_line.to_string());
    }

    (lines, init_config)
}

fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in input.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            current.push(ch);
            continue;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            current.push(ch);
            continue;
        }
        if ch == ',' {
            args.push(current.trim().to_string());
            current.clear();
            continue;
        }
        current.push(ch);
    }
    args.push(current.trim().to_string());
    args
}

fn strip_quotes(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else if trimmed.starts_with('\'') && trimmed.ends_with('\'') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
