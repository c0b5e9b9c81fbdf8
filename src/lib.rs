#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod diagram;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod template;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use diagram::{Diagram, DiagramSnapshot};
pub use error::{DiagramError, ExportError, ImportError};
pub use ir::{BoxKey, Contents};
pub use layout::{Layout, compute_layout};
pub use render::render_svg;
pub use template::{export_template, export_text, import_text};
pub use theme::Theme;

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: Config,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        let mut config = Config::default();
        config.theme = Theme::modern();
        config.render.background = config.theme.background.clone();
        Self { config }
    }
}

/// Imports a plain-text argument document and renders it to SVG.
pub fn render_with_options(text: &str, options: RenderOptions) -> Result<String, ImportError> {
    let mut diagram = Diagram::new(options.config);
    import_text(&mut diagram, text)?;
    let config = diagram.config();
    Ok(render_svg(diagram.layout(), &config.theme, &config.layout))
}
