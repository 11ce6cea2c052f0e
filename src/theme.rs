use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub node_stroke: String,
    pub node_stroke_width: f32,
    pub node_corner_radius: f32,
    pub link_opacity: f32,
    pub background: String,
}

impl Theme {
    /// White node outlines, rounded corners and faint links.
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
            text_color: "#000000".to_string(),
            node_stroke: "#ffffff".to_string(),
            node_stroke_width: 2.0,
            node_corner_radius: 5.0,
            link_opacity: 0.2,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            text_color: "#1C2430".to_string(),
            node_stroke: "#F8FAFF".to_string(),
            node_stroke_width: 1.5,
            node_corner_radius: 3.0,
            link_opacity: 0.35,
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
