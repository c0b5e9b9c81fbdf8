use crate::config::LayoutConfig;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
#[cfg(feature = "png")]
use crate::error::ExportError;
#[cfg(feature = "png")]
use crate::text_metrics::{
    MONOSPACE_FALLBACKS, SANS_SERIF_FALLBACKS, SERIF_FALLBACKS, pick_installed_family,
};
use crate::layout::{Annotation, BoxLayout, Connector, Layout, line_height};
use crate::theme::Theme;
use std::path::Path;

const CORNER_RADIUS: f32 = 8.0;
const TITLE_BASELINE: f32 = 26.0;

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"7\" markerHeight=\"7\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    for node in layout.boxes.values() {
        svg.push_str(&format!(
            "<clipPath id=\"clip-{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath>",
            node.key.name(),
            node.position.x,
            node.position.y,
            node.position.width,
            node.position.height
        ));
    }
    svg.push_str("</defs>");

    for connector in &layout.connectors {
        svg.push_str(&connector_svg(connector, theme));
    }

    for annotation in &layout.annotations {
        svg.push_str(&annotation_svg(annotation, theme));
    }

    for node in layout.boxes.values() {
        svg.push_str(&box_svg(node, theme, config));
    }

    svg.push_str("</svg>");
    svg
}

fn connector_svg(connector: &Connector, theme: &Theme) -> String {
    let marker = if connector.arrow_end {
        " marker-end=\"url(#arrow)\""
    } else {
        ""
    };
    format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"{} />",
        points_to_path(&connector.points),
        theme.line_color,
        marker
    )
}

fn annotation_svg(annotation: &Annotation, theme: &Theme) -> String {
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{}\" font-style=\"italic\" fill=\"{}\">{}</text>",
        annotation.x,
        annotation.y,
        annotation.anchor.as_svg(),
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.annotation_color,
        escape_xml(annotation.text)
    )
}

fn box_svg(node: &BoxLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let pos = node.position;
    let mut out = String::new();
    out.push_str(&format!(
        "<g class=\"box box-{}\">",
        node.key.name()
    ));
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{CORNER_RADIUS}\" ry=\"{CORNER_RADIUS}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
        pos.x, pos.y, pos.width, pos.height, theme.box_fill, theme.box_border
    ));
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
        pos.x + config.text_padding,
        pos.y + TITLE_BASELINE,
        escape_xml(&theme.font_family),
        theme.title_font_size,
        theme.title_color,
        escape_xml(node.title)
    ));

    if !node.body.lines.is_empty() {
        let x = pos.x + config.text_padding;
        let step = line_height(theme, config);
        // First baseline sits inside the first line box, below the title row.
        let start_y =
            pos.y + config.title_height + (step + theme.font_size) / 2.0 - theme.font_size * 0.15;
        out.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{start_y:.2}\" clip-path=\"url(#clip-{})\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" xml:space=\"preserve\">",
            node.key.name(),
            escape_xml(&theme.font_family),
            theme.font_size,
            theme.text_color
        ));
        // Absolute baselines: an empty tspan would drop a relative dy.
        for (idx, line) in node.body.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = start_y + idx as f32 * step;
            out.push_str(&format!(
                "<tspan x=\"{x:.2}\" y=\"{y:.2}\">{}</tspan>",
                escape_xml(line)
            ));
        }
        out.push_str("</text>");
    }

    out.push_str("</g>");
    out
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    let mut d = String::new();
    for (idx, (x, y)) in points.iter().enumerate() {
        let cmd = if idx == 0 { "M" } else { " L" };
        d.push_str(&format!("{cmd} {x:.2} {y:.2}"));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> anyhow::Result<()> {
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

/// Rasterizes an already rendered scene. The scene is an owned string taken
/// from a snapshot, so nothing here touches diagram state.
#[cfg(feature = "png")]
pub fn render_png(svg: &str, render_cfg: &RenderConfig) -> Result<Vec<u8>, ExportError> {
    let mut opt = usvg::Options::default();
    let fontdb = opt.fontdb_mut();
    fontdb.load_system_fonts();
    resolve_generic_families(fontdb);

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|err| ExportError::Scene(err.to_string()))?;
    let scale = render_cfg.scale;
    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or(ExportError::Pixmap { width, height })?;
    pixmap.fill(parse_background(&render_cfg.background));

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    tracing::debug!(width, height, "rasterized scene");
    pixmap
        .encode_png()
        .map_err(|err| ExportError::Encode(err.to_string()))
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
) -> Result<(), ExportError> {
    let png = render_png(svg, render_cfg)?;
    std::fs::write(output, png)?;
    Ok(())
}

/// Points generic families that resolve to nothing at an installed face, so
/// `sans-serif` still draws text on hosts without the fontdb defaults.
#[cfg(feature = "png")]
fn resolve_generic_families(db: &mut usvg::fontdb::Database) {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    let installed: Vec<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    let resolves = |db: &usvg::fontdb::Database, family: Family<'_>| {
        let families = [family];
        db.query(&Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })
        .is_some()
    };

    if !resolves(db, Family::SansSerif) {
        if let Some(name) = pick_installed_family(SANS_SERIF_FALLBACKS, &installed) {
            tracing::debug!(family = name, "sans-serif fallback");
            db.set_sans_serif_family(name);
        }
    }
    if !resolves(db, Family::Serif) {
        if let Some(name) = pick_installed_family(SERIF_FALLBACKS, &installed) {
            db.set_serif_family(name);
        }
    }
    if !resolves(db, Family::Monospace) {
        if let Some(name) = pick_installed_family(MONOSPACE_FALLBACKS, &installed) {
            db.set_monospace_family(name);
        }
    }
}

/// `#rgb`/`#rrggbb` to an opaque color; anything else falls back to white.
#[cfg(feature = "png")]
fn parse_background(value: &str) -> resvg::tiny_skia::Color {
    let rgb = parse_hex_rgb(value).unwrap_or((255, 255, 255));
    resvg::tiny_skia::Color::from_rgba8(rgb.0, rgb.1, rgb.2, 255)
}

#[cfg(feature = "png")]
fn parse_hex_rgb(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|ch| ch.to_digit(16).map(|d| (d * 17) as u8));
            Some((digits.next()??, digits.next()??, digits.next()??))
        }
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
