use serde::Deserialize;
use toulmin_diagram::{RenderOptions, export_template, render_with_options};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArgumentRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    fast_text: Option<bool>,
}

fn build_render_options(options: ArgumentRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.config.theme.font_family = font_family;
    }
    // No system fonts in the browser sandbox; the width table is the default.
    render_options.config.layout.fast_text_metrics = options.fast_text.unwrap_or(true);

    render_options
}

#[wasm_bindgen]
pub fn render_argument_svg(text: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ArgumentRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ArgumentRenderOptions::default()
    };

    render_with_options(text, build_render_options(options))
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn argument_template() -> String {
    export_template()
}

#[cfg(test)]
mod tests {
    use toulmin_diagram::render_with_options;

    use crate::{ArgumentRenderOptions, build_render_options};

    #[test]
    fn renders_imported_argument() {
        let code = "CLAIM\nHarry is a British subject.\n\n---\n\nDATA\nHarry was born in Bermuda.\n\n";
        let svg = render_with_options(code, build_render_options(ArgumentRenderOptions::default()))
            .expect("argument should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Harry is a British subject."));
        assert!(svg.contains("Therefore"));
    }

    #[test]
    fn modern_theme_option_is_applied() {
        let options = build_render_options(ArgumentRenderOptions {
            theme: Some("modern".to_string()),
            ..Default::default()
        });
        assert_eq!(options.config.theme.box_fill, "#F8FAFF");
        assert!(options.config.layout.fast_text_metrics);
    }
}
