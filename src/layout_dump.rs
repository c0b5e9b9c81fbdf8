use crate::ir::{BoxKey, Column, Row};
use crate::layout::Layout;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub boxes: Vec<BoxDump>,
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct BoxDump {
    pub key: BoxKey,
    pub title: &'static str,
    pub row: Row,
    pub column: Column,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub from: BoxKey,
    pub to: Option<BoxKey>,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let boxes = layout
            .boxes
            .values()
            .map(|node| BoxDump {
                key: node.key,
                title: node.title,
                row: node.row,
                column: node.column,
                x: node.position.x,
                y: node.position.y,
                width: node.position.width,
                height: node.position.height,
                lines: node.body.lines.clone(),
            })
            .collect();

        let connectors = layout
            .connectors
            .iter()
            .map(|connector| ConnectorDump {
                from: connector.from,
                to: connector.to,
                points: connector.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            boxes,
            connectors,
        }
    }
}

pub fn write_layout_dump(writer: impl Write, layout: &Layout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::Contents;
    use crate::layout::compute_layout;
    use crate::theme::Theme;

    #[test]
    fn dump_lists_boxes_in_schema_order() {
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        let contents: Contents = [(BoxKey::Data, "Harry was born in Bermuda.")]
            .into_iter()
            .collect();
        let layout = compute_layout(&contents, &Theme::classic(), &config);

        let mut out = Vec::new();
        write_layout_dump(&mut out, &layout).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let keys: Vec<&str> = value["boxes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["key"].as_str().unwrap())
            .collect();
        assert_eq!(
            keys,
            vec!["claim", "warrant", "rebuttal", "backing", "rebuttalBacking", "data"]
        );
        assert_eq!(value["boxes"][5]["y"], 860.0);
        assert_eq!(value["boxes"][5]["lines"][0], "Harry was born in Bermuda.");
        assert_eq!(value["boxes"][1]["column"], "Left");
        assert_eq!(value["connectors"].as_array().unwrap().len(), 3);
    }
}
