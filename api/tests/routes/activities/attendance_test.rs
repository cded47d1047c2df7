#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use db::models::activity::{Model as ActivityModel, NewActivity};
    use db::models::attendance_record::{
        AttendanceStatus, Model as AttendanceRecordModel, NewAttendanceRecord,
    };
    use db::models::profile::Model as ProfileModel;
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use serial_test::serial;
    use tower::ServiceExt;

    use crate::helpers::app::Seed;
    use crate::helpers::{bearer, make_test_app, read_json, seed};

    async fn record(
        db: &DatabaseConnection,
        activity: &ActivityModel,
        who: &ProfileModel,
        minutes_in: i64,
    ) -> AttendanceRecordModel {
        AttendanceRecordModel::insert_new(
            db,
            NewAttendanceRecord {
                student_id: who.id,
                activity_id: activity.id,
                check_in_time: activity.start_time + Duration::minutes(minutes_in),
                photo_url: None,
                location: None,
                status: AttendanceStatus::Present,
            },
        )
        .await
        .unwrap()
    }

    async fn populated(db: &DatabaseConnection, data: &Seed) -> ActivityModel {
        let now = Utc::now();
        let activity = ActivityModel::create(
            db,
            NewActivity::open_to_all("Assembly", now - Duration::hours(1), now + Duration::hours(1)),
        )
        .await
        .unwrap();
        record(db, &activity, &data.alice, 1).await;
        record(db, &activity, &data.bob, 2).await;
        record(db, &activity, &data.teacher, 3).await;
        activity
    }

    async fn get(app: axum::Router, uri: &str, who: &ProfileModel) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .header("Authorization", bearer(who))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        (status, read_json(response).await)
    }

    #[tokio::test]
    #[serial]
    async fn roster_is_newest_first_and_enriched() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let activity = populated(state.db(), &data).await;

        let (status, json) = get(app, &format!("/api/activities/{}/attendance", activity.id), &data.admin).await;
        assert_eq!(status, StatusCode::OK);

        let rows = json["data"].as_array().unwrap();
        let students: Vec<i64> = rows.iter().map(|r| r["student_id"].as_i64().unwrap()).collect();
        assert_eq!(students, vec![data.teacher.id, data.bob.id, data.alice.id]);

        let alice = &rows[2];
        assert_eq!(alice["full_name"], "Alice Nguyen");
        assert_eq!(alice["student_code"], "S100");
        assert_eq!(alice["classroom_name"], "2A");
        assert_eq!(alice["department_name"], "Science");
        assert_eq!(alice["year_level"], 2);
    }

    #[tokio::test]
    #[serial]
    async fn roster_filters_combine_with_and() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let activity = populated(state.db(), &data).await;
        let base = format!("/api/activities/{}/attendance", activity.id);

        let (_, json) = get(app.clone(), &format!("{base}?department={}", data.science.id), &data.admin).await;
        let students: Vec<i64> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["student_id"].as_i64().unwrap())
            .collect();
        assert_eq!(students, vec![data.teacher.id, data.alice.id]);

        let (_, json) = get(
            app.clone(),
            &format!("{base}?department={}&classroom={}", data.science.id, data.room_a.id),
            &data.admin,
        )
        .await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (_, json) = get(
            app.clone(),
            &format!("{base}?department={}&year_level=3", data.science.id),
            &data.admin,
        )
        .await;
        assert!(json["data"].as_array().unwrap().is_empty());

        let (_, json) = get(app.clone(), &format!("{base}?department=&classroom="), &data.admin).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 3);

        let (status, json) = get(app, &format!("{base}?year_level=first"), &data.admin).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Invalid year_level filter 'first'");
    }

    #[tokio::test]
    #[serial]
    async fn summary_counts_per_department() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let activity = populated(state.db(), &data).await;

        let (status, json) = get(
            app,
            &format!("/api/activities/{}/attendance/summary", activity.id),
            &data.admin,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 3);

        let groups = json["data"]["by_department"].as_array().unwrap();
        let science = groups
            .iter()
            .find(|g| g["department_id"] == data.science.id)
            .unwrap();
        let arts = groups.iter().find(|g| g["department_id"] == data.arts.id).unwrap();
        assert_eq!(science["count"], 2);
        assert_eq!(science["department_name"], "Science");
        assert_eq!(arts["count"], 1);
    }

    #[tokio::test]
    #[serial]
    async fn roster_is_admin_only_and_checks_the_activity() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let activity = populated(state.db(), &data).await;

        let (status, _) = get(
            app.clone(),
            &format!("/api/activities/{}/attendance", activity.id),
            &data.teacher,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = get(app, "/api/activities/777/attendance/summary", &data.admin).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Activity 777 not found");
    }
}
