#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use db::models::announcement::{Audience, Model as AnnouncementModel, NewAnnouncement};
    use db::models::profile::Model as ProfileModel;
    use serde_json::Value;
    use serial_test::serial;
    use tower::ServiceExt;

    use crate::helpers::{bearer, make_test_app, read_json, seed};

    async fn titles_for(app: axum::Router, who: &ProfileModel) -> Vec<(String, bool)> {
        let req = Request::builder()
            .method("GET")
            .uri("/api/announcements")
            .header("Authorization", bearer(who))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a: &Value| {
                (
                    a["title"].as_str().unwrap().to_owned(),
                    a["expired"].as_bool().unwrap(),
                )
            })
            .collect()
    }

    #[tokio::test]
    #[serial]
    async fn audience_and_targets_decide_visibility() {
        let (app, state) = make_test_app().await;
        let data = seed(state.db()).await;
        let db = state.db();

        AnnouncementModel::create(db, NewAnnouncement::for_audience("Everyone", "hi", Audience::All), true)
            .await
            .unwrap();
        AnnouncementModel::create(db, NewAnnouncement::for_audience("Teachers", "meeting", Audience::Teachers), true)
            .await
            .unwrap();
        let mut science = NewAnnouncement::for_audience("Science department", "lab", Audience::Staff);
        science.target_departments = [data.science.id].into_iter().collect();
        AnnouncementModel::create(db, science, true).await.unwrap();
        let mut stale = NewAnnouncement::for_audience("Old news", "done", Audience::Students);
        stale.expires_at = Some(Utc::now() - Duration::days(1));
        AnnouncementModel::create(db, stale, true).await.unwrap();
        AnnouncementModel::create(db, NewAnnouncement::for_audience("Draft", "wip", Audience::All), false)
            .await
            .unwrap();

        let mut alice = titles_for(app.clone(), &data.alice).await;
        alice.sort();
        assert_eq!(
            alice,
            vec![
                ("Everyone".to_owned(), false),
                ("Old news".to_owned(), true),
                ("Science department".to_owned(), false),
            ]
        );

        let mut bob = titles_for(app.clone(), &data.bob).await;
        bob.sort();
        assert_eq!(
            bob,
            vec![("Everyone".to_owned(), false), ("Old news".to_owned(), true)]
        );

        let mut teacher = titles_for(app, &data.teacher).await;
        teacher.sort();
        assert_eq!(
            teacher,
            vec![
                ("Everyone".to_owned(), false),
                ("Science department".to_owned(), false),
                ("Teachers".to_owned(), false),
            ]
        );
    }
}
