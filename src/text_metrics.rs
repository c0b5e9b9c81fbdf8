use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

pub(crate) const SANS_SERIF_FALLBACKS: &[&str] = &[
    "Arial",
    "Helvetica",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "FreeSans",
    "Verdana",
];
pub(crate) const SERIF_FALLBACKS: &[&str] = &[
    "Times New Roman",
    "DejaVu Serif",
    "Liberation Serif",
    "Noto Serif",
    "FreeSerif",
];
pub(crate) const MONOSPACE_FALLBACKS: &[&str] = &[
    "Courier New",
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "FreeMono",
];

/// First preferred family that is installed, else any installed family.
pub(crate) fn pick_installed_family<'a>(
    preferred: &[&str],
    installed: &'a [String],
) -> Option<&'a str> {
    preferred
        .iter()
        .find_map(|want| installed.iter().find(|name| name.eq_ignore_ascii_case(want)))
        .or_else(|| installed.first())
        .map(String::as_str)
}

/// Advance width of `text` in the first installed face of `font_family`.
/// `None` when no usable system font exists; callers fall back to the
/// per-character width table.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let family_key = normalize_family_key(font_family);
        if !self.faces.contains_key(&family_key) {
            let face = self.load_face(&family_key);
            if face.is_none() {
                tracing::warn!(family = %family_key, "no system font found, using width table");
            }
            self.faces.insert(family_key.clone(), face);
        }
        let face = self.faces.get_mut(&family_key)?.as_mut()?;
        face.measure_width(text, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let names = family_names(font_family);
        let families: Vec<Family<'_>> = names.iter().map(FamilyName::as_family).collect();

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            resolve_generic_families(&mut self.db);
            self.loaded_system_fonts = true;
        }

        let id = self.db.query(&family_query(&families))?;
        self.db
            .with_face_data(id, |data, index| FontFace::parse(data.to_vec(), index))
            .flatten()
    }
}

fn family_query<'a>(families: &'a [Family<'a>]) -> Query<'a> {
    Query {
        families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    }
}

/// Points generic families that resolve to nothing at an installed face.
fn resolve_generic_families(db: &mut Database) {
    let installed: Vec<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    let resolves = |db: &Database, family: Family<'_>| db.query(&family_query(&[family])).is_some();

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

enum FamilyName {
    Generic(Family<'static>),
    Named(String),
}

impl FamilyName {
    fn as_family(&self) -> Family<'_> {
        match self {
            FamilyName::Generic(family) => *family,
            FamilyName::Named(name) => Family::Name(name.as_str()),
        }
    }
}

/// Splits a CSS font-family list into fontdb families, mapping the generic
/// keywords. Always ends up with at least `sans-serif`.
fn family_names(font_family: &str) -> Vec<FamilyName> {
    let mut names = Vec::new();
    for part in font_family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        let name = match raw.to_ascii_lowercase().as_str() {
            "serif" => FamilyName::Generic(Family::Serif),
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                FamilyName::Generic(Family::SansSerif)
            }
            "monospace" | "ui-monospace" => FamilyName::Generic(Family::Monospace),
            "cursive" => FamilyName::Generic(Family::Cursive),
            "fantasy" => FamilyName::Generic(Family::Fantasy),
            _ => FamilyName::Named(raw.to_string()),
        };
        names.push(name);
    }
    if names.is_empty() {
        names.push(FamilyName::Generic(Family::SansSerif));
    }
    names
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    advances: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let units_per_em = Face::parse(&data, index).ok()?.units_per_em().max(1) as f32;
        Some(Self {
            data,
            index,
            units_per_em,
            advances: HashMap::new(),
        })
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em;
        let fallback = font_size * 0.56;
        let mut width = 0.0f32;
        let mut face: Option<Face<'_>> = None;

        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let ch = if ch == '\t' { ' ' } else { ch };
            let advance = match self.advances.get(&ch) {
                Some(cached) => *cached,
                None => {
                    if face.is_none() {
                        face = Some(Face::parse(&self.data, self.index).ok()?);
                    }
                    let parsed = face.as_ref()?;
                    let advance = parsed
                        .glyph_index(ch)
                        .and_then(|glyph| parsed.glyph_hor_advance(glyph));
                    self.advances.insert(ch, advance);
                    advance
                }
            };
            width += match advance {
                Some(units) if units > 0 => units as f32 * scale,
                _ => fallback,
            };
        }

        Some(width.max(0.0))
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
