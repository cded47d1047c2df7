#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use db::models::activity::{Entity as ActivityEntity, Model as ActivityModel, NewActivity};
    use sea_orm::EntityTrait;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    use crate::helpers::{bearer, make_test_app, read_json, seed};

    #[tokio::test]
    #[serial]
    async fn admin_changes_status() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let now = Utc::now();
        let activity = ActivityModel::create(
            state.db(),
            NewActivity::open_to_all("Assembly", now, now + Duration::hours(1)),
        )
        .await
        .unwrap();

        let req = Request::builder()
            .method("PUT")
            .uri(format!("/api/activities/{}/status", activity.id))
            .header("Authorization", bearer(&data.admin))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(json!({ "status": "cancelled" }).to_string()))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["data"]["status"], "cancelled");

        let stored = ActivityEntity::find_by_id(activity.id)
            .one(state.db())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status.to_string(), "cancelled");
    }

    #[tokio::test]
    #[serial]
    async fn teacher_cannot_change_status_and_unknown_is_404() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let req = Request::builder()
            .method("PUT")
            .uri("/api/activities/1/status")
            .header("Authorization", bearer(&data.teacher))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(json!({ "status": "inactive" }).to_string()))
            .unwrap();
        assert_eq!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::FORBIDDEN);

        let req = Request::builder()
            .method("PUT")
            .uri("/api/activities/404/status")
            .header("Authorization", bearer(&data.admin))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(json!({ "status": "inactive" }).to_string()))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["message"], "Activity 404 not found");
    }
}
