//! Integration tests for the schedule API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::{DateTime, Utc};
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::util::ServiceExt;

    use tutor_schedule::api::{USER_ADMIN_HEADER, USER_ID_HEADER};
    use tutor_schedule::students::{LessonStore, StudentLessons, Tutor};

    use crate::test_utils::{
        ADA, GRACE, NOBODY, body_to_json, test_app, test_app_with_store,
        test_app_with_store_and_config, test_config,
    };

    fn get_as(uri: &str, caller: i64) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(USER_ID_HEADER, caller.to_string())
            .body(Body::empty())
            .unwrap()
    }

    fn lesson_instants(body: &Value) -> Vec<&str> {
        body["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["lessonInstant"].as_str().unwrap())
            .collect()
    }

    /// Tests the day view lists the client's day in local time order
    #[tokio::test]
    #[serial]
    async fn it_returns_the_agenda_for_a_day() {
        let app = test_app().await;

        let response = app
            .oneshot(get_as("/api/schedule?date=20240301", ADA))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;

        assert_eq!(body["mode"], "day-view");
        assert_eq!(body["dayOfYear"], 61);
        assert_eq!(
            lesson_instants(&body),
            vec![
                "2024-03-01T17:00:00Z",
                "2024-03-01T20:00:00Z",
                "2024-03-02T02:30:00Z",
            ]
        );
        assert!(body.get("dateIndex").is_none());

        // 7:30pm Pacific, stored as 2:30am UTC the next day
        let last = &body["entries"][2];
        assert_eq!(last["name"], "Sam");
        assert_eq!(last["lessonLocalInstant"], "2024-03-01T19:30:00Z");
        assert_eq!(last["clientDayOfYear"], 61);
        assert_eq!(last["testLabel"], "SAT");
        assert_eq!(last["locationSummary"], "Sam Lane");
        assert_eq!(last["slug"], "sam");
    }

    /// Tests the front end's parameter names and empty tutor selection
    #[tokio::test]
    #[serial]
    async fn it_accepts_front_end_parameters() {
        let app = test_app().await;

        let response = app
            .oneshot(get_as("/api/schedule?tutor=&date=20240302&getDates=true", ADA))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;

        assert_eq!(lesson_instants(&body), vec!["2024-03-02T20:00:00Z"]);
        assert_eq!(
            body["dateIndex"],
            json!([
                "2024-03-01T17:00:00Z",
                "2024-03-01T20:00:00Z",
                "2024-03-02T02:30:00Z",
                "2024-03-02T20:00:00Z",
            ])
        );
    }

    /// Tests the client offset cookie changes which day a lesson lands on
    #[tokio::test]
    #[serial]
    async fn it_buckets_with_the_client_offset_cookie() {
        let app = test_app().await;

        // A client one hour ahead of UTC sees the 2:30am lesson on March 2nd
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/schedule?date=2024-03-01")
                    .header(USER_ID_HEADER, ADA.to_string())
                    .header(header::COOKIE, "browserUtcOffset=60")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(
            lesson_instants(&body),
            vec!["2024-03-01T17:00:00Z", "2024-03-01T20:00:00Z"]
        );
        assert_eq!(body["entries"][0]["lessonLocalInstant"], "2024-03-01T18:00:00Z");
    }

    /// Tests an unparsable cookie falls back to the default offset
    #[tokio::test]
    #[serial]
    async fn it_ignores_an_invalid_offset_cookie() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/schedule?date=20240301")
                    .header(USER_ID_HEADER, ADA.to_string())
                    .header(header::COOKIE, "browserUtcOffset=pacific")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(lesson_instants(&body).len(), 3);
    }

    /// Tests the client's today is used when no date is given
    #[tokio::test]
    #[serial]
    async fn it_defaults_to_the_client_today() {
        let app = test_app().await;

        let response = app.oneshot(get_as("/api/schedule", ADA)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        // The server clock reads March 2nd, the client is still on March 1st
        assert_eq!(body["dayOfYear"], 61);
        assert_eq!(lesson_instants(&body).len(), 3);
    }

    /// Tests an admin switching tutors always gets the date index
    #[tokio::test]
    #[serial]
    async fn it_sends_the_date_index_on_tutor_change() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/schedule?tutorId={}&date=20240301", ADA))
                    .header(USER_ID_HEADER, GRACE.to_string())
                    .header(USER_ADMIN_HEADER, "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["mode"], "tutor-change");
        assert_eq!(lesson_instants(&body).len(), 3);
        assert_eq!(body["dateIndex"].as_array().unwrap().len(), 4);
    }

    /// Tests a non-admin can not view another tutor
    #[tokio::test]
    #[serial]
    async fn it_returns_403_for_another_tutor() {
        let app = test_app().await;

        let response = app
            .oneshot(get_as(&format!("/api/schedule?tutor={}", GRACE), ADA))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    /// Tests a request without a caller is rejected
    #[tokio::test]
    #[serial]
    async fn it_returns_401_without_a_caller() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/schedule?date=20240301")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// Tests a tutor without students gets empty results
    #[tokio::test]
    #[serial]
    async fn it_returns_empty_results_for_a_tutor_without_students() {
        let app = test_app().await;

        let response = app
            .oneshot(get_as(
                "/api/schedule?date=20240301&includeDateIndex=true",
                NOBODY,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["entries"], json!([]));
        assert_eq!(body["dateIndex"], json!([]));
    }

    /// Tests a malformed date is a bad request
    #[tokio::test]
    #[serial]
    async fn it_returns_400_for_a_bad_date() {
        let app = test_app().await;

        let response = app
            .oneshot(get_as("/api/schedule?date=tomorrow", ADA))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Tests the landing view for a tutor
    #[tokio::test]
    #[serial]
    async fn it_returns_the_landing_view() {
        let app = test_app().await;

        let response = app
            .oneshot(get_as("/api/schedule/today", ADA))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["dayOfYear"], 61);
        assert_eq!(lesson_instants(&body).len(), 3);
        assert_eq!(body["dateIndex"].as_array().unwrap().len(), 4);
        assert!(body.get("tutors").is_none());
    }

    /// Tests admins also get the tutor list on the landing view
    #[tokio::test]
    #[serial]
    async fn it_lists_tutors_for_admins() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/schedule/today")
                    .header(USER_ID_HEADER, GRACE.to_string())
                    .header(USER_ADMIN_HEADER, "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(lesson_instants(&body), vec!["2024-03-01T18:00:00Z"]);

        let names: Vec<_> = body["tutors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ada", "Grace", "Nobody"]);
    }

    /// Tests recording the client offset sets a long lived cookie
    #[tokio::test]
    #[serial]
    async fn it_records_the_client_offset() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/schedule/offset")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "offset": -300 }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.contains("browserUtcOffset=-300"));
        assert!(cookie.contains("Max-Age=31536000"));

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["clientOffset"], -300);
        assert_eq!(body["adjustment"], 300);
    }

    /// Tests an impossible offset is rejected
    #[tokio::test]
    #[serial]
    async fn it_returns_400_for_an_impossible_offset() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/schedule/offset")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "offset": 5000 }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    struct UnreachableStore;

    #[async_trait]
    impl LessonStore for UnreachableStore {
        async fn fetch_lessons_by_tutor(&self, _: i64) -> Result<Vec<StudentLessons>> {
            Err(anyhow!("connection refused"))
        }

        async fn fetch_student_lessons(&self, _: i64) -> Result<Option<StudentLessons>> {
            Err(anyhow!("connection refused"))
        }

        async fn replace_lessons(&self, _: i64, _: Vec<DateTime<Utc>>) -> Result<bool> {
            Err(anyhow!("connection refused"))
        }

        async fn list_tutors(&self) -> Result<Vec<Tutor>> {
            Err(anyhow!("connection refused"))
        }
    }

    /// Tests an unreachable store is reported as retryable
    #[tokio::test]
    #[serial]
    async fn it_returns_503_when_the_store_is_down() {
        let app = test_app_with_store(UnreachableStore).await;

        let response = app
            .oneshot(get_as("/api/schedule?date=20240301", ADA))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["retryable"], true);
    }

    struct StalledStore;

    #[async_trait]
    impl LessonStore for StalledStore {
        async fn fetch_lessons_by_tutor(&self, _: i64) -> Result<Vec<StudentLessons>> {
            std::future::pending().await
        }

        async fn fetch_student_lessons(&self, _: i64) -> Result<Option<StudentLessons>> {
            std::future::pending().await
        }

        async fn replace_lessons(&self, _: i64, _: Vec<DateTime<Utc>>) -> Result<bool> {
            std::future::pending().await
        }

        async fn list_tutors(&self) -> Result<Vec<Tutor>> {
            std::future::pending().await
        }
    }

    /// Tests a store that stops answering is reported as retryable
    #[tokio::test]
    #[serial]
    async fn it_returns_503_when_the_store_stalls() {
        let mut config = test_config();
        config.fetch_timeout_secs = 1;
        let app = test_app_with_store_and_config(StalledStore, config).await;

        let response = app
            .oneshot(get_as("/api/schedule?date=20240301", ADA))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["retryable"], true);
        assert!(body["error"].as_str().unwrap().contains("timed out"));
    }
}
