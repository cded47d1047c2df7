#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use db::models::profile::Model as ProfileModel;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    use crate::helpers::{bearer, make_test_app, read_json, seed};

    fn create(by: &ProfileModel, body: Value) -> Request<AxumBody> {
        Request::builder()
            .method("POST")
            .uri("/api/departments")
            .header("Authorization", bearer(by))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn admin_creates_department() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .oneshot(create(&data.admin, json!({ "name": " Maths ", "description": "Numbers" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = read_json(response).await;
        assert_eq!(json["data"]["name"], "Maths");
        assert_eq!(json["data"]["description"], "Numbers");
    }

    #[tokio::test]
    #[serial]
    async fn duplicate_and_blank_names_are_rejected() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .clone()
            .oneshot(create(&data.admin, json!({ "name": "Science" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            read_json(response).await["message"],
            "A department named 'Science' already exists"
        );

        let response = app
            .oneshot(create(&data.admin, json!({ "name": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await["message"],
            "Name must be between 1 and 100 characters"
        );
    }

    #[tokio::test]
    #[serial]
    async fn teachers_cannot_create_departments() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .oneshot(create(&data.teacher, json!({ "name": "History" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
