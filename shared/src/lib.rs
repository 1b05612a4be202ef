use serde::{Deserialize, Serialize};

/// A canvas coordinate. The wire carries coordinates as flat fields
/// (`x`, `startX`, ...); `Point` exists for the geometry code.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Triangle,
    Text,
}

/// One protocol message. Every variant is self-contained: applying it
/// needs only the current raster, never prior traffic, which is what lets
/// the relay forward payloads without inspecting them.
///
/// Encoded as one JSON object per WebSocket text message, tagged on
/// `type`. Receivers drop anything that fails to decode, including
/// messages with a `type` they do not know.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Operation {
    /// A single pencil segment from (startX, startY) to (x, y).
    #[serde(rename = "draw")]
    Draw {
        x: f64,
        y: f64,
        #[serde(rename = "startX")]
        start_x: f64,
        #[serde(rename = "startY")]
        start_y: f64,
        color: String,
        size: f64,
    },
    /// A committed drag-to-draw shape, anchor (startX, startY) to end
    /// (endX, endY).
    #[serde(rename = "shape")]
    Shape {
        tool: ShapeKind,
        #[serde(rename = "startX")]
        start_x: f64,
        #[serde(rename = "startY")]
        start_y: f64,
        #[serde(rename = "endX")]
        end_x: f64,
        #[serde(rename = "endY")]
        end_y: f64,
        color: String,
        size: f64,
        fill: bool,
    },
    /// Blank the whole raster.
    #[serde(rename = "clear")]
    Clear,
    /// Replace the whole raster with an encoded image (a data URI).
    /// Emitted by undo so that peers converge on the restored state even
    /// if they never saw the snapshot being taken.
    #[serde(rename = "image")]
    Image { data: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_uses_the_wire_field_names() {
        let operation = Operation::Draw {
            x: 50.0,
            y: 10.0,
            start_x: 10.0,
            start_y: 10.0,
            color: "#ff0000".to_string(),
            size: 4.0,
        };
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&operation).unwrap()).unwrap();
        assert_eq!(value["type"], "draw");
        assert_eq!(value["startX"], 10.0);
        assert_eq!(value["startY"], 10.0);
        assert_eq!(value["x"], 50.0);
        assert_eq!(value["y"], 10.0);
        assert_eq!(value["color"], "#ff0000");
        assert_eq!(value["size"], 4.0);
    }

    #[test]
    fn shape_kinds_are_lowercase_on_the_wire() {
        let operation = Operation::Shape {
            tool: ShapeKind::Triangle,
            start_x: 0.0,
            start_y: 0.0,
            end_x: 20.0,
            end_y: 30.0,
            color: "#1f1f1f".to_string(),
            size: 2.0,
            fill: true,
        };
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&operation).unwrap()).unwrap();
        assert_eq!(value["type"], "shape");
        assert_eq!(value["tool"], "triangle");
        assert_eq!(value["endX"], 20.0);
        assert_eq!(value["fill"], true);
    }

    #[test]
    fn clear_is_a_bare_type_tag() {
        assert_eq!(
            serde_json::to_string(&Operation::Clear).unwrap(),
            r#"{"type":"clear"}"#
        );
    }

    #[test]
    fn image_carries_its_payload_whole() {
        let parsed: Operation =
            serde_json::from_str(r#"{"type":"image","data":"data:image/png;base64,AAAA"}"#)
                .unwrap();
        assert_eq!(
            parsed,
            Operation::Image {
                data: "data:image/png;base64,AAAA".to_string()
            }
        );
    }

    #[test]
    fn unknown_operation_kinds_fail_to_decode() {
        // Receivers treat this as a silent no-op; the decode error is the
        // signal to drop the message.
        assert!(serde_json::from_str::<Operation>(r#"{"type":"rotate","angle":90}"#).is_err());
        assert!(serde_json::from_str::<Operation>("{not json").is_err());
        assert!(serde_json::from_str::<Operation>(r#"{"type":"draw","x":1}"#).is_err());
    }
}
