use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, CloseEvent, Event, HtmlButtonElement, HtmlCanvasElement,
    HtmlInputElement, HtmlSpanElement, MessageEvent, PointerEvent, WebSocket,
};

use inkboard_shared::{Operation, Point, ShapeKind};

use crate::actions::{
    apply_remote, apply_snapshot, record_history, sanitize_color, sanitize_size, undo_operations,
};
use crate::dom::{
    event_to_point, get_element, resize_canvas, set_canvas_cursor, set_status, set_tool_button,
    update_size_label,
};
use crate::history::History;
use crate::net::{send_operation, websocket_url};
use crate::preview::{capture_pristine, render_preview};
use crate::render::{clear_surface, draw_segment};
use crate::state::{DragMode, State, Tool, DEFAULT_SIZE};

fn sync_tool_buttons(buttons: &[(HtmlButtonElement, Tool)], active: Tool) {
    for (button, tool) in buttons {
        set_tool_button(button, *tool == active);
    }
}

/// Ends whatever drag is in flight. A pencil stroke was already streamed
/// segment by segment, so release only records the history entry; a shape
/// drag commits here: final render, one `shape` operation, one history
/// entry. A shape drag that never moved has no preview and commits
/// nothing.
fn finish_drag(state: &mut State, socket: &WebSocket, release: Option<Point>) {
    match std::mem::replace(&mut state.drag, DragMode::Idle) {
        DragMode::Idle => {}
        DragMode::Stroking { moved, .. } => {
            if moved {
                record_history(state);
            }
        }
        DragMode::Shaping {
            kind,
            anchor,
            pristine,
            end,
        } => {
            let Some(last) = end else {
                return;
            };
            let end = release.unwrap_or(last);
            render_preview(
                &state.ctx,
                &pristine,
                kind,
                anchor,
                end,
                &state.color,
                state.size,
                state.fill,
            );
            send_operation(
                socket,
                &Operation::Shape {
                    tool: kind,
                    start_x: anchor.x,
                    start_y: anchor.y,
                    end_x: end.x,
                    end_y: end.y,
                    color: state.color.clone(),
                    size: state.size,
                    fill: state.fill,
                },
            );
            record_history(state);
        }
    }
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "board")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let color_input: HtmlInputElement = get_element(&document, "color")?;
    let size_input: HtmlInputElement = get_element(&document, "size")?;
    let size_value: HtmlSpanElement = get_element(&document, "sizeValue")?;
    let fill_input: HtmlInputElement = get_element(&document, "fill")?;
    let clear_button: HtmlButtonElement = get_element(&document, "clear")?;
    let undo_button: HtmlButtonElement = get_element(&document, "undo")?;
    let status_el = document
        .get_element_by_id("status")
        .ok_or_else(|| JsValue::from_str("Missing status element"))?;
    let status_text = document
        .get_element_by_id("statusText")
        .ok_or_else(|| JsValue::from_str("Missing status text"))?;

    let tool_buttons: Rc<Vec<(HtmlButtonElement, Tool)>> = Rc::new(vec![
        (get_element(&document, "pencil")?, Tool::Pencil),
        (
            get_element(&document, "rect")?,
            Tool::Shape(ShapeKind::Rectangle),
        ),
        (
            get_element(&document, "ellipse")?,
            Tool::Shape(ShapeKind::Ellipse),
        ),
        (get_element(&document, "line")?, Tool::Shape(ShapeKind::Line)),
        (
            get_element(&document, "triangle")?,
            Tool::Shape(ShapeKind::Triangle),
        ),
        (get_element(&document, "text")?, Tool::Shape(ShapeKind::Text)),
    ]);

    let state = Rc::new(RefCell::new(State {
        canvas: canvas.clone(),
        ctx,
        tool: Tool::Pencil,
        color: sanitize_color(color_input.value()),
        size: sanitize_size(size_input.value().parse::<f64>().unwrap_or(DEFAULT_SIZE)),
        fill: fill_input.checked(),
        drag: DragMode::Idle,
        history: History::new(),
    }));

    update_size_label(&size_input, &size_value);
    set_status(&status_el, &status_text, "connecting", "Connecting...");
    sync_tool_buttons(&tool_buttons, Tool::Pencil);

    {
        let mut guard = state.borrow_mut();
        let state = &mut *guard;
        resize_canvas(&window, state);
        set_canvas_cursor(state);
        // Baseline entry so the first committed change is undoable back
        // to the empty raster.
        record_history(state);
    }

    let socket = Rc::new(WebSocket::new(&websocket_url(&window)?)?);

    {
        let status_el = status_el.clone();
        let status_text = status_text.clone();
        let onopen = Closure::<dyn FnMut(Event)>::new(move |_| {
            set_status(&status_el, &status_text, "open", "Live connection");
        });
        socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();
    }

    {
        let status_el = status_el.clone();
        let status_text = status_text.clone();
        let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            web_sys::console::warn_1(
                &format!("ws closed code={} clean={}", event.code(), event.was_clean()).into(),
            );
            set_status(&status_el, &status_text, "closed", "Offline");
        });
        socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();
    }

    {
        let status_el = status_el.clone();
        let status_text = status_text.clone();
        let onerror = Closure::<dyn FnMut(Event)>::new(move |_| {
            set_status(&status_el, &status_text, "closed", "Connection error");
        });
        socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }

    {
        let message_state = state.clone();
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(text) = event.data().as_string() else {
                web_sys::console::warn_1(&"ws message is not text, dropped".into());
                return;
            };
            let operation = match serde_json::from_str::<Operation>(&text) {
                Ok(operation) => operation,
                Err(error) => {
                    // Unknown or malformed kinds degrade to a skipped
                    // update, never a visible failure.
                    web_sys::console::warn_1(&format!("ws message dropped: {error}").into());
                    return;
                }
            };
            let state = message_state.borrow();
            apply_remote(&state, operation);
        });
        socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();
    }

    {
        let socket = socket.clone();
        let onbeforeunload = Closure::<dyn FnMut(Event)>::new(move |_| {
            let _ = socket.close();
        });
        window.add_event_listener_with_callback(
            "beforeunload",
            onbeforeunload.as_ref().unchecked_ref(),
        )?;
        onbeforeunload.forget();
    }

    {
        let resize_state = state.clone();
        let window_cb = window.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            let state = resize_state.borrow();
            resize_canvas(&window_cb, &state);
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    for (button, tool) in tool_buttons.iter() {
        let tool = *tool;
        let tool_state = state.clone();
        let buttons = tool_buttons.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = tool_state.borrow_mut();
            if !matches!(state.drag, DragMode::Idle) {
                return;
            }
            state.tool = tool;
            sync_tool_buttons(&buttons, tool);
            set_canvas_cursor(&state);
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let color_state = state.clone();
        let color_input_cb = color_input.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            color_state.borrow_mut().color = sanitize_color(color_input_cb.value());
        });
        color_input.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let size_state = state.clone();
        let size_input_cb = size_input.clone();
        let size_value_cb = size_value.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let size = size_input_cb.value().parse::<f64>().unwrap_or(DEFAULT_SIZE);
            size_state.borrow_mut().size = sanitize_size(size);
            update_size_label(&size_input_cb, &size_value_cb);
        });
        size_input.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let fill_state = state.clone();
        let fill_input_cb = fill_input.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
            fill_state.borrow_mut().fill = fill_input_cb.checked();
        });
        fill_input.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    {
        let clear_state = state.clone();
        let clear_socket = socket.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut guard = clear_state.borrow_mut();
            let state = &mut *guard;
            state.drag = DragMode::Idle;
            clear_surface(state);
            record_history(state);
            send_operation(&clear_socket, &Operation::Clear);
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let undo_state = state.clone();
        let undo_socket = socket.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut guard = undo_state.borrow_mut();
            let state = &mut *guard;
            let Some(snapshot) = state.history.undo() else {
                return;
            };
            apply_snapshot(state, &snapshot);
            for operation in undo_operations(snapshot) {
                send_operation(&undo_socket, &operation);
            }
        });
        undo_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let down_state = state.clone();
        let onpointerdown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            let mut guard = down_state.borrow_mut();
            let state = &mut *guard;
            let Some(point) = event_to_point(&state.canvas, &event) else {
                return;
            };
            state.drag = match state.tool {
                Tool::Pencil => DragMode::Stroking {
                    last: point,
                    moved: false,
                },
                Tool::Shape(kind) => {
                    let Some(pristine) = capture_pristine(state) else {
                        return;
                    };
                    DragMode::Shaping {
                        kind,
                        anchor: point,
                        pristine,
                        end: None,
                    }
                }
            };
        });
        canvas.add_event_listener_with_callback(
            "pointerdown",
            onpointerdown.as_ref().unchecked_ref(),
        )?;
        onpointerdown.forget();
    }

    {
        let move_state = state.clone();
        let move_socket = socket.clone();
        let onpointermove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut guard = move_state.borrow_mut();
            let state = &mut *guard;
            let Some(point) = event_to_point(&state.canvas, &event) else {
                return;
            };
            match &mut state.drag {
                DragMode::Idle => {}
                DragMode::Stroking { last, moved } => {
                    let from = *last;
                    *last = point;
                    *moved = true;
                    draw_segment(&state.ctx, from, point, &state.color, state.size);
                    send_operation(
                        &move_socket,
                        &Operation::Draw {
                            x: point.x,
                            y: point.y,
                            start_x: from.x,
                            start_y: from.y,
                            color: state.color.clone(),
                            size: state.size,
                        },
                    );
                }
                DragMode::Shaping {
                    kind,
                    anchor,
                    pristine,
                    end,
                } => {
                    *end = Some(point);
                    render_preview(
                        &state.ctx,
                        pristine,
                        *kind,
                        *anchor,
                        point,
                        &state.color,
                        state.size,
                        state.fill,
                    );
                }
            }
        });
        canvas.add_event_listener_with_callback(
            "pointermove",
            onpointermove.as_ref().unchecked_ref(),
        )?;
        onpointermove.forget();
    }

    {
        let up_state = state.clone();
        let up_socket = socket.clone();
        let onpointerup = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut guard = up_state.borrow_mut();
            let state = &mut *guard;
            let release = event_to_point(&state.canvas, &event);
            finish_drag(state, &up_socket, release);
        });
        canvas
            .add_event_listener_with_callback("pointerup", onpointerup.as_ref().unchecked_ref())?;
        onpointerup.forget();
    }

    {
        let leave_state = state.clone();
        let leave_socket = socket.clone();
        let onpointerleave = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut guard = leave_state.borrow_mut();
            let state = &mut *guard;
            let release = event_to_point(&state.canvas, &event);
            finish_drag(state, &leave_socket, release);
        });
        canvas.add_event_listener_with_callback(
            "pointerleave",
            onpointerleave.as_ref().unchecked_ref(),
        )?;
        onpointerleave.forget();
    }

    Ok(())
}
