#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use serial_test::serial;
    use tower::ServiceExt;

    use crate::helpers::{bearer, make_test_app, read_json, seed};

    fn codes(json: &Value) -> Vec<String> {
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["student_code"].as_str().unwrap().to_owned())
            .collect()
    }

    #[tokio::test]
    #[serial]
    async fn admin_lists_every_profile() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let req = Request::builder()
            .uri("/api/profiles")
            .header("Authorization", bearer(&data.admin))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(codes(&json), ["A1", "S100", "S200", "T1"]);
        let alice = &json["data"][1];
        assert_eq!(alice["full_name"], "Alice Nguyen");
        assert_eq!(alice["role"], "student");
        assert_eq!(alice["classroom_id"], data.room_a.id);
        assert_eq!(alice["active"], true);
    }

    #[tokio::test]
    #[serial]
    async fn role_filter_narrows_and_rejects_unknown_roles() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let req = Request::builder()
            .uri("/api/profiles?role=student")
            .header("Authorization", bearer(&data.admin))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(codes(&read_json(response).await), ["S100", "S200"]);

        let req = Request::builder()
            .uri("/api/profiles?role=janitor")
            .header("Authorization", bearer(&data.admin))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["message"], "Invalid role filter 'janitor'");
    }

    #[tokio::test]
    #[serial]
    async fn teachers_cannot_list_profiles() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let req = Request::builder()
            .uri("/api/profiles")
            .header("Authorization", bearer(&data.teacher))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
