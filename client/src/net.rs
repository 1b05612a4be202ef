use wasm_bindgen::JsValue;
use web_sys::{WebSocket, Window};

use inkboard_shared::Operation;

pub fn websocket_url(window: &Window) -> Result<String, JsValue> {
    let location = window.location();
    let protocol = location.protocol()?;
    let host = location.host()?;
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    Ok(format!("{scheme}://{host}/ws"))
}

/// Fire-and-forget: nothing is queued for a socket that is not open, and
/// a failed send is not retried.
pub fn send_operation(socket: &WebSocket, operation: &Operation) {
    if socket.ready_state() == WebSocket::OPEN {
        if let Ok(payload) = serde_json::to_string(operation) {
            let _ = socket.send_with_str(&payload);
        }
    }
}
