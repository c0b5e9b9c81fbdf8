use crate::error::ConfigError;
use crate::ir::Column;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub box_width: f32,
    pub min_box_height: f32,
    pub max_box_height: f32,
    pub title_height: f32,
    pub trailing_padding: f32,
    pub text_padding: f32,
    pub label_line_height: f32,
    pub row_gap: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub left_column_x: f32,
    pub center_column_x: f32,
    pub right_column_x: f32,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000.0,
            box_width: 300.0,
            min_box_height: 150.0,
            max_box_height: 1000.0,
            title_height: 40.0,
            trailing_padding: 24.0,
            text_padding: 20.0,
            label_line_height: 1.5,
            row_gap: 120.0,
            top_margin: 50.0,
            bottom_margin: 50.0,
            left_column_x: 50.0,
            center_column_x: 350.0,
            right_column_x: 650.0,
            fast_text_metrics: false,
        }
    }
}

impl LayoutConfig {
    pub fn column_x(&self, column: Column) -> f32 {
        match column {
            Column::Left => self.left_column_x,
            Column::Center => self.center_column_x,
            Column::Right => self.right_column_x,
        }
    }

    /// Width available to wrapped body text inside a box.
    pub fn text_width(&self) -> f32 {
        self.box_width - 2.0 * self.text_padding
    }

    /// Unlike `f32::clamp` this never panics on an unvalidated range.
    pub fn clamp_height(&self, height: f32) -> f32 {
        height.max(self.min_box_height).min(self.max_box_height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub scale: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: "#FFFFFF".to_string(),
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

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        let positive = [
            ("canvasWidth", layout.canvas_width),
            ("boxWidth", layout.box_width),
            ("minBoxHeight", layout.min_box_height),
            ("maxBoxHeight", layout.max_box_height),
            ("labelLineHeight", layout.label_line_height),
            ("fontSize", self.theme.font_size),
            ("titleFontSize", self.theme.title_font_size),
            ("scale", self.render.scale),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        let non_negative = [
            ("rowGap", layout.row_gap),
            ("topMargin", layout.top_margin),
            ("bottomMargin", layout.bottom_margin),
            ("titleHeight", layout.title_height),
            ("trailingPadding", layout.trailing_padding),
            ("textPadding", layout.text_padding),
            ("leftColumnX", layout.left_column_x),
            ("centerColumnX", layout.center_column_x),
            ("rightColumnX", layout.right_column_x),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if layout.min_box_height > layout.max_box_height {
            return Err(ConfigError::HeightRange {
                min: layout.min_box_height,
                max: layout.max_box_height,
            });
        }
        if layout.text_width() <= 0.0 {
            return Err(ConfigError::TextArea {
                box_width: layout.box_width,
                padding: layout.text_padding,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    title_font_size: Option<f32>,
    box_fill: Option<String>,
    box_border: Option<String>,
    title_color: Option<String>,
    text_color: Option<String>,
    line_color: Option<String>,
    annotation_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    canvas_width: Option<f32>,
    box_width: Option<f32>,
    min_box_height: Option<f32>,
    max_box_height: Option<f32>,
    title_height: Option<f32>,
    trailing_padding: Option<f32>,
    text_padding: Option<f32>,
    label_line_height: Option<f32>,
    row_gap: Option<f32>,
    top_margin: Option<f32>,
    bottom_margin: Option<f32>,
    left_column_x: Option<f32>,
    center_column_x: Option<f32>,
    right_column_x: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    scale: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    let config = parse_config(&contents, is_json5)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

pub fn parse_config(contents: &str, json5: bool) -> anyhow::Result<Config> {
    let parsed: ConfigFile = if json5 {
        json5::from_str(contents)?
    } else {
        serde_json::from_str(contents)?
    };
    let config = apply_config_file(Config::default(), parsed);
    config.validate()?;
    Ok(config)
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> Config {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.title_font_size {
            config.theme.title_font_size = v;
        }
        if let Some(v) = vars.box_fill {
            config.theme.box_fill = v;
        }
        if let Some(v) = vars.box_border {
            config.theme.box_border = v;
        }
        if let Some(v) = vars.title_color {
            config.theme.title_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.annotation_color {
            config.theme.annotation_color = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        let overrides = [
            (layout.canvas_width, &mut target.canvas_width),
            (layout.box_width, &mut target.box_width),
            (layout.min_box_height, &mut target.min_box_height),
            (layout.max_box_height, &mut target.max_box_height),
            (layout.title_height, &mut target.title_height),
            (layout.trailing_padding, &mut target.trailing_padding),
            (layout.text_padding, &mut target.text_padding),
            (layout.label_line_height, &mut target.label_line_height),
            (layout.row_gap, &mut target.row_gap),
            (layout.top_margin, &mut target.top_margin),
            (layout.bottom_margin, &mut target.bottom_margin),
            (layout.left_column_x, &mut target.left_column_x),
            (layout.center_column_x, &mut target.center_column_x),
            (layout.right_column_x, &mut target.right_column_x),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(v) = layout.fast_text_metrics {
            target.fast_text_metrics = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.scale {
            config.render.scale = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_columns_center_on_canvas() {
        let layout = LayoutConfig::default();
        let center_mid = layout.column_x(Column::Center) + layout.box_width / 2.0;
        assert_eq!(center_mid, layout.canvas_width / 2.0);
        assert_eq!(layout.text_width(), 260.0);
    }

    #[test]
    fn parse_json_overrides() {
        let json = r##"{
            "theme": "modern",
            "themeVariables": { "lineColor": "#ff0000" },
            "layout": { "rowGap": 80, "fastTextMetrics": true },
            "render": { "scale": 3 }
        }"##;
        let config = parse_config(json, false).unwrap();
        assert_eq!(config.theme.line_color, "#ff0000");
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
        assert_eq!(config.layout.row_gap, 80.0);
        assert!(config.layout.fast_text_metrics);
        assert_eq!(config.render.scale, 3.0);
        assert_eq!(config.layout.box_width, 300.0);
    }

    #[test]
    fn parse_json5_with_comments() {
        let src = "{\n  // tighter rows\n  layout: { rowGap: 60, },\n}";
        let config = parse_config(src, true).unwrap();
        assert_eq!(config.layout.row_gap, 60.0);
    }

    #[test]
    fn rejects_inverted_height_range() {
        let json = r#"{ "layout": { "minBoxHeight": 500, "maxBoxHeight": 200 } }"#;
        let err = parse_config(json, false).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn rejects_negative_row_gap() {
        let json = r#"{ "layout": { "rowGap": -400 } }"#;
        let err = parse_config(json, false).unwrap_err();
        assert!(err.to_string().contains("rowGap"));
    }

    #[test]
    fn rejects_non_finite_geometry() {
        let err = parse_config("{ layout: { maxBoxHeight: NaN } }", true).unwrap_err();
        assert!(err.to_string().contains("maxBoxHeight"));
        assert!(parse_config("{ layout: { topMargin: Infinity } }", true).is_err());

        let mut config = Config::default();
        config.layout.center_column_x = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "centerColumnX", .. })
        ));
    }

    #[test]
    fn rejects_padding_wider_than_box() {
        let mut config = Config::default();
        config.layout.text_padding = 200.0;
        assert!(matches!(config.validate(), Err(ConfigError::TextArea { .. })));
    }
}
