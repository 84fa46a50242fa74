use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use stringline::{PointerEvent, PointerKind, PointerPhase, StringlineChart};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Each text frame is one `PointerEvent`; each reply is the resulting
/// `ScrubReadout`.
pub async fn handle_scrub_socket(
    mut socket: WebSocket,
    chart: Arc<Mutex<StringlineChart>>,
    id: Uuid,
) {
    info!("scrub socket opened: {}", id);

    while let Some(message) = socket.recv().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("scrub socket receive failed: {}", e);
                break;
            }
        };

        let event: PointerEvent = match serde_json::from_str(text.as_str()) {
            Ok(event) => event,
            Err(e) => {
                warn!("invalid pointer event: {}", e);
                continue;
            }
        };

        let readout = chart.lock().await.handle_pointer(&event);

        let json = match serde_json::to_string(&readout) {
            Ok(j) => j,
            Err(e) => {
                warn!("readout serialize error: {}", e);
                continue;
            }
        };

        if let Err(e) = socket.send(Message::Text(json.into())).await {
            warn!("scrub socket send failed: {}", e);
            break;
        }
    }

    // A dropped connection ends the gesture like a pointer leave
    let leave = PointerEvent::new(PointerKind::Mouse, PointerPhase::Leave, 0.0, false);
    chart.lock().await.handle_pointer(&leave);

    info!("scrub socket closed: {}", id);
}
