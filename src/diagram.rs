use crate::config::Config;
use crate::error::DiagramError;
use crate::ir::{BoxKey, Contents};
use crate::layout::{Layout, Position, compute_layout};
use serde::Serialize;

/// Session state: six boxes plus the layout derived from their contents.
///
/// The layout is replaced wholesale after every edit, so it is never stale.
#[derive(Debug, Clone)]
pub struct Diagram {
    config: Config,
    contents: Contents,
    layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSnapshot {
    pub key: BoxKey,
    pub title: &'static str,
    pub content: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramSnapshot {
    pub boxes: Vec<BoxSnapshot>,
    pub width: f32,
    pub height: f32,
}

impl DiagramSnapshot {
    pub fn get(&self, key: BoxKey) -> &BoxSnapshot {
        &self.boxes[key as usize]
    }
}

impl Diagram {
    pub fn new(config: Config) -> Self {
        let contents = Contents::new();
        let layout = compute_layout(&contents, &config.theme, &config.layout);
        Self {
            config,
            contents,
            layout,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn content(&self, key: BoxKey) -> &str {
        self.contents.get(key)
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn position(&self, key: BoxKey) -> Position {
        self.layout.position(key)
    }

    pub fn set_content(&mut self, key: BoxKey, text: impl Into<String>) {
        self.contents.set(key, text);
        self.relayout();
    }

    pub fn set_content_by_name(
        &mut self,
        name: &str,
        text: impl Into<String>,
    ) -> Result<BoxKey, DiagramError> {
        let key =
            BoxKey::from_token(name).ok_or_else(|| DiagramError::UnknownBox(name.to_string()))?;
        self.set_content(key, text);
        Ok(key)
    }

    /// Applies several edits as one event with a single recomputation.
    pub fn set_contents<I, S>(&mut self, edits: I) -> usize
    where
        I: IntoIterator<Item = (BoxKey, S)>,
        S: Into<String>,
    {
        let mut applied = 0;
        for (key, text) in edits {
            self.contents.set(key, text);
            applied += 1;
        }
        if applied > 0 {
            self.relayout();
        }
        applied
    }

    pub fn snapshot(&self) -> DiagramSnapshot {
        let boxes = BoxKey::ALL
            .into_iter()
            .map(|key| {
                let position = self.layout.position(key);
                BoxSnapshot {
                    key,
                    title: key.title(),
                    content: self.contents.get(key).to_string(),
                    x: position.x,
                    y: position.y,
                    width: position.width,
                    height: position.height,
                }
            })
            .collect();
        DiagramSnapshot {
            boxes,
            width: self.layout.width,
            height: self.layout.height,
        }
    }

    fn relayout(&mut self) {
        self.layout = compute_layout(&self.contents, &self.config.theme, &self.config.layout);
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
