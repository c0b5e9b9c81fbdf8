mod text;
pub(crate) mod types;
pub use text::{box_height, line_height, measure_body, measure_height};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{BoxKey, Contents, Row};
use crate::theme::Theme;
use std::collections::BTreeMap;

// Annotation placement as fractions of the claim/reasons row gap.
const THEREFORE_GAP_FRACTION: f32 = 0.3;
const JUNCTION_GAP_FRACTION: f32 = 0.5;
const QUALIFIER_LABEL_GAP_FRACTION: f32 = 0.8;
const ANNOTATION_OFFSET_X: f32 = 10.0;

/// Recomputes every box position from scratch.
///
/// Rows are stacked top to bottom; each row starts `row_gap` below the
/// tallest box of the row above, and every box in a row shares its y. The x of
/// a box only depends on its schema column.
pub fn compute_layout(contents: &Contents, theme: &Theme, config: &LayoutConfig) -> Layout {
    let mut boxes = BTreeMap::new();
    let mut row_y = config.top_margin;
    let mut bottom: f32 = 0.0;

    for row in Row::ALL {
        let mut row_height: f32 = 0.0;
        for key in row.members() {
            let content = contents.get(key);
            let body = measure_body(content, config.box_width, theme, config);
            let height = text::body_box_height(content, &body, config);
            let position = Position {
                x: config.column_x(key.column()),
                y: row_y,
                width: config.box_width,
                height,
            };
            row_height = row_height.max(height);
            bottom = bottom.max(position.bottom());
            boxes.insert(
                key,
                BoxLayout {
                    key,
                    title: key.title(),
                    row,
                    column: key.column(),
                    position,
                    body,
                },
            );
        }
        tracing::debug!(row = ?row, y = row_y, height = row_height, "placed row");
        row_y += row_height + config.row_gap;
    }

    let height = bottom + config.bottom_margin;
    let connectors = compute_connectors(&boxes, config);
    let annotations = compute_annotations(&boxes, config);
    tracing::debug!(width = config.canvas_width, height, "layout recomputed");

    Layout {
        boxes,
        connectors,
        annotations,
        width: config.canvas_width,
        height,
    }
}

fn compute_connectors(
    boxes: &BTreeMap<BoxKey, BoxLayout>,
    config: &LayoutConfig,
) -> Vec<Connector> {
    let claim = boxes[&BoxKey::Claim].position;
    let data = boxes[&BoxKey::Data].position;
    let center_x = claim.center_x();
    let junction_y = claim.bottom() + config.row_gap * JUNCTION_GAP_FRACTION;

    let mut connectors = vec![Connector {
        from: BoxKey::Data,
        to: Some(BoxKey::Claim),
        kind: ConnectorKind::Inference,
        points: vec![(center_x, data.y), (center_x, claim.bottom())],
        arrow_end: true,
    }];

    for key in Row::Reasons.members() {
        let position = boxes[&key].position;
        // Leave from the edge facing the center column, just under the title.
        let start_x = if position.center_x() < center_x {
            position.x + position.width
        } else {
            position.x
        };
        let start_y = position.y + config.title_height.min(position.height);
        connectors.push(Connector {
            from: key,
            to: None,
            kind: ConnectorKind::Qualifier,
            points: vec![(start_x, start_y), (center_x, junction_y)],
            arrow_end: true,
        });
    }

    connectors
}

fn compute_annotations(
    boxes: &BTreeMap<BoxKey, BoxLayout>,
    config: &LayoutConfig,
) -> Vec<Annotation> {
    let claim = boxes[&BoxKey::Claim].position;
    let center_x = claim.center_x();
    let boundary = claim.bottom();
    let qualifier_y = boundary + config.row_gap * QUALIFIER_LABEL_GAP_FRACTION;

    vec![
        Annotation {
            text: "Therefore",
            x: center_x + ANNOTATION_OFFSET_X,
            y: boundary + config.row_gap * THEREFORE_GAP_FRACTION,
            anchor: TextAnchor::Start,
        },
        Annotation {
            text: "Since",
            x: center_x - ANNOTATION_OFFSET_X,
            y: qualifier_y,
            anchor: TextAnchor::End,
        },
        Annotation {
            text: "Unless",
            x: center_x + ANNOTATION_OFFSET_X,
            y: qualifier_y,
            anchor: TextAnchor::Start,
        },
    ]
}
