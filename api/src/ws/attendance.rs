use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::IntoResponse,
};
use services::store::attendance_topic;
use util::state::AppState;

use super::serve::{WsServerOptions, serve_topic};

/// GET /ws/activities/{activity_id}/attendance
///
/// Live feed of `attendance.inserted` events for one activity. Each frame is
/// the broker envelope:
///
/// ```json
/// {
///   "type": "event",
///   "event": "attendance.inserted",
///   "topic": "attendance:activity:1",
///   "payload": { "id": 9, "student_id": 4, "activity_id": 1, "check_in_time": "..." },
///   "ts": "..."
/// }
/// ```
pub async fn attendance_ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Path(activity_id): Path<i64>,
) -> impl IntoResponse {
    let manager = app_state.ws_clone();
    let topic = attendance_topic(activity_id);
    ws.on_upgrade(move |socket| serve_topic(socket, manager, topic, WsServerOptions::default()))
}
