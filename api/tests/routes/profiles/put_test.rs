#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use db::models::profile::Model as ProfileModel;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    use crate::helpers::{bearer, make_test_app, read_json, seed};

    fn set_active(profile_id: i64, by: &ProfileModel, active: bool) -> Request<AxumBody> {
        Request::builder()
            .method("PUT")
            .uri(format!("/api/profiles/{profile_id}/active"))
            .header("Authorization", bearer(by))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(json!({ "active": active }).to_string()))
            .unwrap()
    }

    fn list_activities(who: &ProfileModel) -> Request<AxumBody> {
        Request::builder()
            .uri("/api/activities")
            .header("Authorization", bearer(who))
            .body(AxumBody::empty())
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn disabled_profile_is_locked_out_until_enabled() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .clone()
            .oneshot(set_active(data.alice.id, &data.admin, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["message"], "Profile disabled");
        assert_eq!(json["data"]["active"], false);

        let response = app.clone().oneshot(list_activities(&data.alice)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(read_json(response).await["message"], "This account has been disabled");

        let response = app
            .clone()
            .oneshot(set_active(data.alice.id, &data.admin, true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["message"], "Profile enabled");

        let response = app.oneshot(list_activities(&data.alice)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    #[serial]
    async fn unknown_profile_and_self_disable_are_refused() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .clone()
            .oneshot(set_active(9999, &data.admin, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["message"], "Profile 9999 not found");

        let response = app
            .oneshot(set_active(data.admin.id, &data.admin, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["message"], "You cannot disable your own account");
    }

    #[tokio::test]
    #[serial]
    async fn students_cannot_toggle_profiles() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;

        let response = app
            .oneshot(set_active(data.bob.id, &data.alice, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let bob = ProfileModel::list(state.db(), None)
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.id == data.bob.id)
            .unwrap();
        assert!(bob.active);
    }
}
