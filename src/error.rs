use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("unknown box `{0}` (expected one of claim, warrant, rebuttal, backing, rebuttalBacking, data)")]
    UnknownBox(String),
}

/// Import is best-effort: this is only returned when nothing at all could be
/// applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("failed to import file: no recognized sections")]
    NoRecognizedSections,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to parse rendered scene: {0}")]
    Scene(String),
    #[error("failed to allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Encode(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("minimum box height {min} exceeds maximum {max}")]
    HeightRange { min: f32, max: f32 },
    #[error("box width {box_width} leaves no room for text padding {padding}")]
    TextArea { box_width: f32, padding: f32 },
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("`{field}` must be a finite non-negative number, got {value}")]
    Negative { field: &'static str, value: f32 },
}
