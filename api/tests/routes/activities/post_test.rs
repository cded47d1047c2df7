#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, TimeZone, Utc};
    use db::models::activity::{ActivityStatus, Model as ActivityModel, NewActivity};
    use db::models::profile::Model as ProfileModel;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    use crate::helpers::{bearer, make_test_app, read_json, seed};

    fn check_in_request(activity_id: i64, who: &ProfileModel, body: Value) -> Request<AxumBody> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/activities/{activity_id}/check-in"))
            .header("Authorization", bearer(who))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(body.to_string()))
            .unwrap()
    }

    fn check_out_request(activity_id: i64, who: &ProfileModel) -> Request<AxumBody> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/activities/{activity_id}/check-out"))
            .header("Authorization", bearer(who))
            .body(AxumBody::empty())
            .unwrap()
    }

    async fn open_activity(db: &sea_orm::DatabaseConnection, requires_photo: bool) -> ActivityModel {
        let now = Utc::now();
        let mut new = NewActivity::open_to_all("Assembly", now - Duration::minutes(5), now + Duration::minutes(25));
        new.requires_photo = requires_photo;
        ActivityModel::create(db, new).await.unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn admin_creates_activity() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let body = json!({
            "title": "Morning assembly",
            "start_time": "2030-01-01T08:00:00Z",
            "end_time": "2030-01-01T08:30:00Z",
            "requires_photo": true,
            "target_year_levels": [2, 1]
        });
        let req = Request::builder()
            .method("POST")
            .uri("/api/activities")
            .header("Authorization", bearer(&data.admin))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = read_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["title"], "Morning assembly");
        assert_eq!(json["data"]["status"], "active");
        assert_eq!(json["data"]["requires_photo"], true);
        assert_eq!(json["data"]["target_year_levels"], json!([1, 2]));
        assert_eq!(json["data"]["created_by"], data.admin.id);
    }

    #[tokio::test]
    #[serial]
    async fn create_rejects_bad_window_and_year_levels() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let backwards = json!({
            "title": "Backwards",
            "start_time": "2030-01-01T09:00:00Z",
            "end_time": "2030-01-01T08:00:00Z"
        });
        let req = Request::builder()
            .method("POST")
            .uri("/api/activities")
            .header("Authorization", bearer(&data.admin))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(backwards.to_string()))
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["message"], "End time must not be before start time");

        let bad_year = json!({
            "title": "Year 9",
            "start_time": "2030-01-01T08:00:00Z",
            "end_time": "2030-01-01T09:00:00Z",
            "target_year_levels": [9]
        });
        let req = Request::builder()
            .method("POST")
            .uri("/api/activities")
            .header("Authorization", bearer(&data.admin))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(bad_year.to_string()))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn students_cannot_create_activities() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let body = json!({
            "title": "Party",
            "start_time": "2030-01-01T08:00:00Z",
            "end_time": "2030-01-01T09:00:00Z"
        });
        let req = Request::builder()
            .method("POST")
            .uri("/api/activities")
            .header("Authorization", bearer(&data.alice))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = read_json(response).await;
        assert_eq!(json["message"], "You do not have permission to access this page");
    }

    #[tokio::test]
    #[serial]
    async fn check_in_succeeds_once_then_conflicts() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let activity = open_activity(state.db(), false).await;

        let response = app
            .clone()
            .oneshot(check_in_request(activity.id, &data.alice, json!({ "location": "Hall" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = read_json(response).await;
        assert_eq!(json["data"]["student_id"], data.alice.id);
        assert_eq!(json["data"]["activity_id"], activity.id);
        assert_eq!(json["data"]["status"], "present");
        assert_eq!(json["data"]["location"], "Hall");

        let response = app
            .oneshot(check_in_request(activity.id, &data.alice, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = read_json(response).await;
        assert_eq!(json["message"], "You have already checked in");
    }

    #[tokio::test]
    #[serial]
    async fn photo_activities_need_a_photo() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let activity = open_activity(state.db(), true).await;

        let response = app
            .clone()
            .oneshot(check_in_request(activity.id, &data.alice, json!({ "photo_url": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(read_json(response).await["message"], "A photo is required to check in");

        let response = app
            .oneshot(check_in_request(
                activity.id,
                &data.alice,
                json!({ "photo_url": "photos/alice.jpg" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(read_json(response).await["data"]["photo_url"], "photos/alice.jpg");
    }

    #[tokio::test]
    #[serial]
    async fn ineligible_student_is_forbidden() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let now = Utc::now();

        let mut new = NewActivity::open_to_all("Room 3B only", now - Duration::minutes(1), now + Duration::minutes(10));
        new.target_classrooms = [data.room_b.id].into_iter().collect();
        let activity = ActivityModel::create(state.db(), new).await.unwrap();

        let response = app
            .oneshot(check_in_request(activity.id, &data.alice, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(read_json(response).await["message"], "You are not eligible for this activity");
    }

    #[tokio::test]
    #[serial]
    async fn window_and_status_are_enforced() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let now = Utc::now();

        let future = ActivityModel::create(
            state.db(),
            NewActivity::open_to_all("Tomorrow", now + Duration::days(1), now + Duration::days(1) + Duration::hours(1)),
        )
        .await
        .unwrap();
        let past = ActivityModel::create(
            state.db(),
            NewActivity::open_to_all("Yesterday", now - Duration::days(1), now - Duration::days(1) + Duration::hours(1)),
        )
        .await
        .unwrap();
        let paused = open_activity(state.db(), false).await;
        ActivityModel::set_status(state.db(), paused.id, ActivityStatus::Inactive)
            .await
            .unwrap();

        let cases = [
            (future.id, "This activity has not started"),
            (past.id, "This activity has ended"),
            (paused.id, "This activity is not open"),
        ];
        for (id, message) in cases {
            let response = app
                .clone()
                .oneshot(check_in_request(id, &data.alice, json!({})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "activity {id}");
            assert_eq!(read_json(response).await["message"], message);
        }
    }

    #[tokio::test]
    #[serial]
    async fn unknown_activity_is_not_found() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .oneshot(check_in_request(9999, &data.alice, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["message"], "Activity 9999 not found");
    }

    #[tokio::test]
    #[serial]
    async fn fixed_window_from_the_past_has_ended() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let activity = ActivityModel::create(
            state.db(),
            NewActivity::open_to_all("Old assembly", start, start + Duration::minutes(30)),
        )
        .await
        .unwrap();

        let response = app
            .oneshot(check_in_request(activity.id, &data.bob, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn check_out_closes_the_record_once() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let activity = open_activity(state.db(), false).await;

        let response = app
            .clone()
            .oneshot(check_out_request(activity.id, &data.alice))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await["message"],
            "You have not checked in to this activity"
        );

        let response = app
            .clone()
            .oneshot(check_in_request(activity.id, &data.alice, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(read_json(response).await["data"]["check_out_time"].is_null());

        let response = app
            .clone()
            .oneshot(check_out_request(activity.id, &data.alice))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["message"], "Checked out successfully");
        assert_eq!(json["data"]["student_id"], data.alice.id);
        assert!(json["data"]["check_out_time"].is_string());

        let response = app
            .clone()
            .oneshot(check_out_request(activity.id, &data.alice))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(read_json(response).await["message"], "You have already checked out");

        // bob's own record is untouched by alice's check-out
        let response = app
            .oneshot(check_out_request(activity.id, &data.bob))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn check_out_of_unknown_activity_is_not_found() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .oneshot(check_out_request(4242, &data.alice))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["message"], "Activity 4242 not found");
    }
}
