use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::state::AppState;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut socket_sender, mut socket_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let connection_id = Uuid::new_v4();

    state.relay.subscribe(connection_id, tx).await;
    let peers = state.relay.len().await;
    tracing::info!(conn = %connection_id, peers, "ws connected");

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if socket_sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let mut close_frame = None;

    while let Some(Ok(message)) = socket_receiver.next().await {
        match message {
            // Data frames go out verbatim. The relay has no opinion on
            // payload structure; receivers drop what they cannot decode.
            Message::Text(_) | Message::Binary(_) => {
                state.relay.publish(connection_id, message).await;
            }
            Message::Close(frame) => {
                close_frame = frame;
                break;
            }
            _ => {}
        }
    }

    state.relay.unsubscribe(connection_id).await;
    send_task.abort();

    let peers = state.relay.len().await;
    match close_frame {
        Some(frame) => tracing::info!(
            conn = %connection_id,
            peers,
            code = frame.code,
            reason = %frame.reason,
            "ws disconnected"
        ),
        None => tracing::info!(conn = %connection_id, peers, "ws disconnected"),
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::ws::Message;
    use inkboard_shared::{Operation, ShapeKind};
    use tokio::sync::mpsc;
    use uuid::Uuid;

    use crate::relay::Relay;

    async fn peer(relay: &Relay<Message>) -> (Uuid, mpsc::UnboundedReceiver<Message>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        relay.subscribe(id, tx).await;
        (id, rx)
    }

    fn text(message: Message) -> String {
        match message {
            Message::Text(text) => text,
            other => panic!("expected a text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn operations_cross_the_relay_unaltered() {
        let relay = Relay::new();
        let (a, _rx_a) = peer(&relay).await;
        let (_b, mut rx_b) = peer(&relay).await;

        let operation = Operation::Shape {
            tool: ShapeKind::Rectangle,
            start_x: 0.0,
            start_y: 0.0,
            end_x: -20.0,
            end_y: -10.0,
            color: "#ff0000".to_string(),
            size: 4.0,
            fill: false,
        };
        let encoded = serde_json::to_string(&operation).unwrap();
        relay.publish(a, Message::Text(encoded.clone())).await;

        let forwarded = text(rx_b.try_recv().unwrap());
        assert_eq!(forwarded, encoded);
        assert_eq!(
            serde_json::from_str::<Operation>(&forwarded).unwrap(),
            operation
        );
    }

    #[tokio::test]
    async fn malformed_payloads_are_forwarded_as_is() {
        // Garbage in, garbage out: validation is the receiver's problem.
        let relay = Relay::new();
        let (a, _rx_a) = peer(&relay).await;
        let (_b, mut rx_b) = peer(&relay).await;

        let garbage = r#"{"type":"draw","x":"#;
        relay.publish(a, Message::Text(garbage.to_string())).await;
        assert_eq!(text(rx_b.try_recv().unwrap()), garbage);

        relay.publish(a, Message::Binary(vec![0xde, 0xad])).await;
        match rx_b.try_recv().unwrap() {
            Message::Binary(bytes) => assert_eq!(bytes, vec![0xde, 0xad]),
            other => panic!("expected a binary frame, got {other:?}"),
        }
    }
}
