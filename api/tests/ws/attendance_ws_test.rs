#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use api::auth::generate_jwt;
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use db::models::activity::{Model as ActivityModel, NewActivity};
    use futures::{SinkExt, StreamExt};
    use serde_json::{Value, json};
    use serial_test::serial;
    use tokio::time::timeout;
    use tokio_tungstenite::tungstenite::{Error, protocol::Message};
    use tower::ServiceExt;

    use crate::helpers::{bearer, connect_ws, make_test_app, seed, spawn_server};

    /// Next text frame, skipping transport pings.
    async fn next_text<S>(ws: &mut S) -> Value
    where
        S: futures::Stream<Item = Result<Message, Error>> + Unpin,
    {
        loop {
            let frame = timeout(StdDuration::from_secs(5), ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("socket closed")
                .expect("socket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    #[tokio::test]
    #[serial]
    async fn admin_receives_inserted_events_for_the_activity() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let now = Utc::now();
        let activity = ActivityModel::create(
            state.db(),
            NewActivity::open_to_all("Assembly", now - Duration::minutes(5), now + Duration::minutes(30)),
        )
        .await
        .unwrap();

        let addr = spawn_server(app.clone()).await;
        let (token, _) = generate_jwt(data.admin.id, data.admin.role).unwrap();
        let (mut ws, _) = connect_ws(
            &addr.to_string(),
            &format!("activities/{}/attendance", activity.id),
            &token,
        )
        .await
        .unwrap();

        // Wait for the server side to subscribe before checking in.
        let topic = format!("attendance:activity:{}", activity.id);
        for _ in 0..50 {
            if state.ws().subscriber_count(&topic).await > 0 {
                break;
            }
            tokio::time::sleep(StdDuration::from_millis(20)).await;
        }

        let req = Request::builder()
            .method("POST")
            .uri(format!("/api/activities/{}/check-in", activity.id))
            .header("Authorization", bearer(&data.alice))
            .header("Content-Type", "application/json")
            .body(AxumBody::from("{}"))
            .unwrap();
        assert_eq!(app.oneshot(req).await.unwrap().status(), StatusCode::CREATED);

        let event = next_text(&mut ws).await;
        assert_eq!(event["type"], "event");
        assert_eq!(event["event"], "attendance.inserted");
        assert_eq!(event["topic"], topic);
        assert_eq!(event["payload"]["student_id"], data.alice.id);
        assert_eq!(event["payload"]["activity_id"], activity.id);

        ws.close(None).await.unwrap();
    }

    #[tokio::test]
    #[serial]
    async fn app_ping_gets_a_pong() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let addr = spawn_server(app).await;
        let (token, _) = generate_jwt(data.admin.id, data.admin.role).unwrap();

        let (mut ws, _) = connect_ws(&addr.to_string(), "activities/1/attendance", &token)
            .await
            .unwrap();
        ws.send(Message::Text(json!({ "type": "ping" }).to_string().into()))
            .await
            .unwrap();

        let reply = next_text(&mut ws).await;
        assert_eq!(reply["event"], "pong");
        ws.close(None).await.unwrap();
    }

    #[tokio::test]
    #[serial]
    async fn students_cannot_watch_the_roster() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let addr = spawn_server(app).await;
        let (token, _) = generate_jwt(data.alice.id, data.alice.role).unwrap();

        match connect_ws(&addr.to_string(), "activities/1/attendance", &token).await {
            Ok(_) => panic!("student should not connect"),
            Err(Error::Http(resp)) => assert_eq!(resp.status(), 403),
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }
}
