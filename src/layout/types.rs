use std::collections::BTreeMap;

use crate::ir::{BoxKey, Column, Row};

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Position {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    pub key: BoxKey,
    pub title: &'static str,
    pub row: Row,
    pub column: Column,
    pub position: Position,
    pub body: TextBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Data up to the claim along the center column.
    Inference,
    /// Warrant or rebuttal down to the inference line.
    Qualifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub from: BoxKey,
    pub to: Option<BoxKey>,
    pub kind: ConnectorKind,
    pub points: Vec<(f32, f32)>,
    pub arrow_end: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: &'static str,
    pub x: f32,
    pub y: f32,
    pub anchor: TextAnchor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub boxes: BTreeMap<BoxKey, BoxLayout>,
    pub connectors: Vec<Connector>,
    pub annotations: Vec<Annotation>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn position(&self, key: BoxKey) -> Position {
        self.boxes[&key].position
    }

    pub fn row_y(&self, row: Row) -> f32 {
        row.members()
            .next()
            .map(|key| self.position(key).y)
            .unwrap_or(0.0)
    }
}
