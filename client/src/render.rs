use web_sys::CanvasRenderingContext2d;

use inkboard_shared::{Point, ShapeKind};

use crate::geometry::{circle_radius, rect_bounds, text_font_px, triangle_third_vertex};
use crate::state::State;

/// What the text tool stamps onto the canvas. The protocol carries no
/// string payload, so every peer renders the same placeholder.
pub const TEXT_PLACEHOLDER: &str = "Text";

/// One pencil segment. Local input and remote `draw` operations both land
/// here, which is what keeps peers visually in step.
pub fn draw_segment(
    ctx: &CanvasRenderingContext2d,
    from: Point,
    to: Point,
    color: &str,
    size: f64,
) {
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(size);
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke();
}

pub fn draw_shape(
    ctx: &CanvasRenderingContext2d,
    kind: ShapeKind,
    anchor: Point,
    end: Point,
    color: &str,
    size: f64,
    fill: bool,
) {
    ctx.set_stroke_style_str(color);
    ctx.set_fill_style_str(color);
    ctx.set_line_width(size);
    match kind {
        ShapeKind::Rectangle => {
            let bounds = rect_bounds(anchor, end);
            ctx.begin_path();
            ctx.rect(bounds.x, bounds.y, bounds.width, bounds.height);
            paint(ctx, fill);
        }
        ShapeKind::Ellipse => {
            let radius = circle_radius(anchor, end);
            ctx.begin_path();
            let _ = ctx.arc(anchor.x, anchor.y, radius, 0.0, std::f64::consts::PI * 2.0);
            paint(ctx, fill);
        }
        ShapeKind::Line => {
            ctx.begin_path();
            ctx.move_to(anchor.x, anchor.y);
            ctx.line_to(end.x, end.y);
            ctx.stroke();
        }
        ShapeKind::Triangle => {
            let third = triangle_third_vertex(anchor, end);
            ctx.begin_path();
            ctx.move_to(anchor.x, anchor.y);
            ctx.line_to(end.x, end.y);
            ctx.line_to(third.x, third.y);
            ctx.close_path();
            paint(ctx, fill);
        }
        ShapeKind::Text => {
            ctx.set_font(&format!("{}px sans-serif", text_font_px(size)));
            let _ = ctx.fill_text(TEXT_PLACEHOLDER, end.x, end.y);
        }
    }
}

fn paint(ctx: &CanvasRenderingContext2d, fill: bool) {
    if fill {
        ctx.fill();
    } else {
        ctx.stroke();
    }
}

pub fn clear_surface(state: &State) {
    state.ctx.clear_rect(
        0.0,
        0.0,
        state.canvas.width() as f64,
        state.canvas.height() as f64,
    );
}
