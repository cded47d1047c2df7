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
            .uri("/api/classrooms")
            .header("Authorization", bearer(by))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn admin_creates_classroom_in_department() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .oneshot(create(
                &data.admin,
                json!({ "name": "1C", "department_id": data.science.id, "year_level": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = read_json(response).await;
        assert_eq!(json["data"]["name"], "1C");
        assert_eq!(json["data"]["department_id"], data.science.id);
        assert_eq!(json["data"]["year_level"], 1);
    }

    #[tokio::test]
    #[serial]
    async fn unknown_department_and_bad_year_are_rejected() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .clone()
            .oneshot(create(&data.admin, json!({ "name": "1C", "department_id": 777, "year_level": 1 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["message"], "Department 777 not found");

        let response = app
            .oneshot(create(
                &data.admin,
                json!({ "name": "6A", "department_id": data.science.id, "year_level": 6 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["message"], "Year level must be between 1 and 5");
    }
}
