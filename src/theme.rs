use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub title_font_size: f32,
    pub box_fill: String,
    pub box_border: String,
    pub title_color: String,
    pub text_color: String,
    pub line_color: String,
    pub annotation_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            font_size: 14.0,
            title_font_size: 16.0,
            box_fill: "#FFFFFF".to_string(),
            box_border: "#333333".to_string(),
            title_color: "#111111".to_string(),
            text_color: "#333333".to_string(),
            line_color: "#333333".to_string(),
            annotation_color: "#555555".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            title_font_size: 15.0,
            box_fill: "#F8FAFF".to_string(),
            box_border: "#C7D2E5".to_string(),
            title_color: "#1C2430".to_string(),
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            annotation_color: "#4A5870".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
