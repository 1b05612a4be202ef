use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use inkboard_shared::{Point, ShapeKind};

use crate::history::History;

pub const DEFAULT_COLOR: &str = "#1f1f1f";
pub const DEFAULT_SIZE: f64 = 4.0;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pencil,
    Shape(ShapeKind),
}

pub enum DragMode {
    Idle,
    /// Pencil held down; `last` is the tail of the streamed segment chain.
    /// `moved` gates the history entry taken on release.
    Stroking { last: Point, moved: bool },
    /// Shape drag in progress. `pristine` is the raster as it looked at
    /// pointer-down; every move repaints from it. `end` is None until the
    /// first move, so a click without a drag commits nothing.
    Shaping {
        kind: ShapeKind,
        anchor: Point,
        pristine: ImageData,
        end: Option<Point>,
    },
}

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub tool: Tool,
    pub color: String,
    pub size: f64,
    pub fill: bool,
    pub drag: DragMode,
    pub history: History,
}
