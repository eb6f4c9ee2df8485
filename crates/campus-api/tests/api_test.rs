//! Router-level tests over the in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use campus_api::{app, AppState};
use campus_assist::{AssistConfig, Assistant};
use campus_core::{Profile, StudyBuddyRepository, UpsertStudyBuddyRequest, UserRole};
use campus_db::MemoryStore;

fn test_profile(id: Uuid, name: &str, role: UserRole, subjects: &[&str]) -> Profile {
    let now = Utc::now();
    Profile {
        id,
        username: name.to_lowercase().replace(' ', "_"),
        full_name: Some(name.to_string()),
        avatar_url: None,
        role,
        major: None,
        department: None,
        institution: None,
        year_of_study: None,
        academic_goals: None,
        bio: None,
        website: None,
        subjects_of_interest: subjects.iter().map(|s| s.to_string()).collect(),
        skills: vec![],
        achievements: vec![],
        research_interests: vec![],
        availability: None,
        created_at: now,
        updated_at: now,
    }
}

async fn test_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let assistant = Arc::new(Assistant::new(
        AssistConfig::default(),
        Arc::new(store.clone()),
    ));
    let state = AppState::from_memory(store.clone(), assistant);
    (app(state), store)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, user: Option<Uuid>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn upload(app: &Router, user: Uuid, title: &str, category: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/resources",
            Some(user),
            json!({
                "title": title,
                "category": category,
                "file_url": "https://files.example/doc.pdf"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_app().await;
    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let (app, _) = test_app().await;
    let response = app.oneshot(get("/api/v1/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_upload_requires_session() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/resources",
            None,
            json!({"title": "x", "category": "note", "file_url": "https://f"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_starts_with_zero_downloads() {
    let (app, _) = test_app().await;
    let resource = upload(&app, Uuid::new_v4(), "Calculus Notes", "note").await;
    assert_eq!(resource["downloads"], 0);
    assert!(resource["id"].is_string());
}

#[tokio::test]
async fn test_upload_validation_creates_no_rows() {
    let (app, _) = test_app().await;
    let user = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/resources",
            Some(user),
            json!({"title": "   ", "category": "note", "file_url": "https://f"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Resource title is required");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/resources",
            Some(user),
            json!({"title": "Valid", "category": "note", "file_url": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Resource file is required");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/resources",
            Some(user),
            json!({"title": "Valid", "file_url": "https://f"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Resource category is required");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/resources",
            Some(user),
            json!({"title": "Valid", "category": "screencast", "file_url": "https://f"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // None of the failed requests left a row behind.
    let response = app.clone().oneshot(get("/api/v1/resources")).await.unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_resource_filters_are_conjunctive() {
    let (app, _) = test_app().await;
    let user = Uuid::new_v4();
    upload(&app, user, "Machine Learning Intro", "note").await;
    upload(&app, user, "Machine Learning Papers", "paper").await;
    upload(&app, user, "Organic Chemistry", "note").await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/resources?q=machine&type=note"))
        .await
        .unwrap();
    let listing = body_json(response).await;
    let titles: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Machine Learning Intro"]);
}

#[tokio::test]
async fn test_unknown_category_filter_yields_empty_list() {
    let (app, _) = test_app().await;
    upload(&app, Uuid::new_v4(), "Anything", "book").await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/resources?subject=screencast"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_upload_with_duplicate_tags_stores_a_set() {
    let (app, _) = test_app().await;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/resources",
            Some(Uuid::new_v4()),
            json!({
                "title": "Linear Algebra",
                "category": "note",
                "file_url": "https://files.example/la.pdf",
                "tags": ["algebra", "algebra", " algebra "]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let resource = body_json(response).await;
    assert_eq!(resource["tags"], json!(["algebra"]));
}

#[tokio::test]
async fn test_structured_filters_narrow_the_listing() {
    let (app, _) = test_app().await;
    let user = Uuid::new_v4();

    let tagged = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/resources",
            Some(user),
            json!({
                "title": "Tagged Notes",
                "category": "note",
                "file_url": "https://files.example/t.pdf",
                "tags": ["algebra"]
            }),
        ))
        .await
        .unwrap();
    let tagged = body_json(tagged).await;
    upload(&app, user, "Untagged Notes", "note").await;

    let id = tagged["id"].as_str().unwrap();
    for _ in 0..2 {
        app.clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resources/{}/download", id),
                None,
                json!({}),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get("/api/v1/resources?tag=algebra&downloads_over=1"))
        .await
        .unwrap();
    let listing = body_json(response).await;
    let titles: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Tagged Notes"]);

    // The download bound is strict.
    let response = app
        .clone()
        .oneshot(get("/api/v1/resources?downloads_over=2"))
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_popular_sort_orders_by_downloads() {
    let (app, _) = test_app().await;
    let user = Uuid::new_v4();
    let first = upload(&app, user, "First", "note").await;
    upload(&app, user, "Second", "note").await;

    let id = first["id"].as_str().unwrap();
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resources/{}/download", id),
                None,
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get("/api/v1/resources?sort=popular"))
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing[0]["title"], "First");
    assert_eq!(listing[0]["downloads"], 3);
}

#[tokio::test]
async fn test_tag_add_is_idempotent_over_http() {
    let (app, _) = test_app().await;
    let user = Uuid::new_v4();
    let resource = upload(&app, user, "Tagged", "note").await;
    let id = resource["id"].as_str().unwrap();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resources/{}/tags", id),
                Some(user),
                json!({"tag": "algebra"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/resources/{}", id)))
        .await
        .unwrap();
    let fetched = body_json(response).await;
    assert_eq!(fetched["tags"], json!(["algebra"]));
}

#[tokio::test]
async fn test_like_toggles_over_http() {
    let (app, _) = test_app().await;
    let user = Uuid::new_v4();
    let resource = upload(&app, user, "Liked", "note").await;
    let id = resource["id"].as_str().unwrap();
    let uri = format!("/api/v1/resources/{}/like", id);

    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(user), json!({})))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["liked"], true);

    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(user), json!({})))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["liked"], false);
}

#[tokio::test]
async fn test_profile_update_is_owner_only() {
    let (app, store) = test_app().await;
    let owner = Uuid::new_v4();
    store
        .seed_profile(test_profile(owner, "Dana Owner", UserRole::Student, &[]))
        .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/profiles/{}", owner),
            Some(Uuid::new_v4()),
            json!({"bio": "intruder"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/profiles/{}", owner),
            Some(owner),
            json!({"bio": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["bio"], "hello");
}

#[tokio::test]
async fn test_alumni_directory_filters_by_role_and_query() {
    let (app, store) = test_app().await;
    let mut alum = test_profile(Uuid::new_v4(), "Grace Hopper", UserRole::Alumni, &[]);
    alum.institution = Some("Naval Research Lab".to_string());
    store.seed_profile(alum).await;
    store
        .seed_profile(test_profile(
            Uuid::new_v4(),
            "Current Student",
            UserRole::Student,
            &[],
        ))
        .await;

    let response = app.clone().oneshot(get("/api/v1/alumni")).await.unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get("/api/v1/alumni?q=naval"))
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing[0]["full_name"], "Grace Hopper");

    let response = app
        .clone()
        .oneshot(get("/api/v1/alumni?q=zzz"))
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_event_join_enforces_cap() {
    let (app, _) = test_app().await;
    let organizer = Uuid::new_v4();
    let start = Utc::now() + Duration::days(1);
    let end = start + Duration::hours(2);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/events",
            Some(organizer),
            json!({
                "title": "Study Jam",
                "start_time": start,
                "end_time": end,
                "max_participants": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let event = body_json(response).await;
    let id = event["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/events/{}/join", id),
            Some(Uuid::new_v4()),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/events/{}/join", id),
            Some(Uuid::new_v4()),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Event is full");
}

#[tokio::test]
async fn test_rejoining_a_full_event_is_a_noop() {
    let (app, _) = test_app().await;
    let member = Uuid::new_v4();
    let start = Utc::now() + Duration::days(1);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/events",
            Some(Uuid::new_v4()),
            json!({
                "title": "Capstone Review",
                "start_time": start,
                "end_time": start + Duration::hours(1),
                "max_participants": 1
            }),
        ))
        .await
        .unwrap();
    let event = body_json(response).await;
    let id = event["id"].as_str().unwrap();

    // The member who filled the last slot can re-join without being
    // told the event is full.
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/events/{}/join", id),
                Some(member),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/events/{}", id)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["participant_count"], 1);
}

#[tokio::test]
async fn test_messaging_flow_with_ordered_timestamps() {
    let (app, _) = test_app().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/conversations",
            Some(alice),
            json!({"participant_ids": [bob]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let conversation = body_json(response).await;
    let id = conversation["id"].as_str().unwrap().to_string();

    for content in ["first", "second", "third"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/conversations/{}/messages", id),
                Some(alice),
                json!({"content": content}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/conversations/{}/messages", id))
                .header("x-user-id", bob.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let messages = body_json(response).await;
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["content"], "first");
    for pair in messages.windows(2) {
        assert!(pair[0]["created_at"].as_str() <= pair[1]["created_at"].as_str());
    }

    // An outsider cannot read the conversation.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/conversations/{}/messages", id))
                .header("x-user-id", Uuid::new_v4().to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_duplicate_connection_request_returns_conflict() {
    let (app, _) = test_app().await;
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/connections",
            Some(a),
            json!({"addressee_id": b}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/connections",
            Some(a),
            json!({"addressee_id": b}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_study_buddy_candidates_hold_score_invariants() {
    let (app, store) = test_app().await;
    let requester = Uuid::new_v4();
    let partial = Uuid::new_v4();
    let disjoint = Uuid::new_v4();

    store
        .seed_profile(test_profile(
            requester,
            "Req Uester",
            UserRole::Student,
            &["Calculus", "Physics"],
        ))
        .await;
    store
        .seed_profile(test_profile(
            partial,
            "Pat Partial",
            UserRole::Student,
            &["Physics"],
        ))
        .await;
    store
        .seed_profile(test_profile(
            disjoint,
            "Dee Disjoint",
            UserRole::Student,
            &["History"],
        ))
        .await;

    for (user, subjects) in [
        (requester, vec!["Calculus", "Physics"]),
        (partial, vec!["Physics"]),
        (disjoint, vec!["History"]),
    ] {
        store
            .upsert_request(
                user,
                UpsertStudyBuddyRequest {
                    subjects: subjects.into_iter().map(String::from).collect(),
                    availability: None,
                    description: None,
                    is_active: true,
                },
            )
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/study-buddies")
                .header("x-user-id", requester.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let candidates = body_json(response).await;
    let candidates = candidates.as_array().unwrap();
    assert_eq!(candidates.len(), 2);

    // Ranked descending, scores clamped to [0, 100], shared interests
    // a subset of the requester's set.
    assert_eq!(candidates[0]["full_name"], "Pat Partial");
    assert_eq!(candidates[0]["match_score"], 50);
    assert_eq!(candidates[0]["shared_interests"], json!(["Physics"]));
    assert_eq!(candidates[1]["match_score"], 0);
    for candidate in candidates {
        let score = candidate["match_score"].as_u64().unwrap();
        assert!(score <= 100);
    }
}

#[tokio::test]
async fn test_recorded_match_freezes_score() {
    let (app, store) = test_app().await;
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    store
        .seed_profile(test_profile(a, "A", UserRole::Student, &["Physics"]))
        .await;
    store
        .seed_profile(test_profile(b, "B", UserRole::Student, &["Physics"]))
        .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/study-buddies/matches",
            Some(a),
            json!({"user_id": b}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let recorded = body_json(response).await;
    assert_eq!(recorded["match_score"], 100);

    // Later subject edits do not rewrite the stored score.
    store
        .upsert_request(
            b,
            UpsertStudyBuddyRequest {
                subjects: vec!["History".to_string()],
                availability: None,
                description: None,
                is_active: true,
            },
        )
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/study-buddies/matches")
                .header("x-user-id", a.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let matches = body_json(response).await;
    assert_eq!(matches[0]["match_score"], 100);
}

#[tokio::test]
async fn test_assistant_chat_fallback_is_deterministic_per_topic() {
    let (app, _) = test_app().await;

    let mut replies = Vec::new();
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/assistant/chat",
                None,
                json!({"message": "help me with a calculus equation"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        replies.push(body_json(response).await["reply"].as_str().unwrap().to_string());
    }

    assert!(replies[0].contains("Mathematics"));
    assert!(replies.iter().all(|r| r == &replies[0]));
}

#[tokio::test]
async fn test_assistant_history_opens_with_greeting() {
    let (app, _) = test_app().await;
    let user = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/assistant/chat",
            Some(user),
            json!({"message": "what is physics"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/assistant/history")
                .header("x-user-id", user.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history = body_json(response).await;
    let history = history.as_array().unwrap();

    // Greeting plus the persisted question and answer.
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["is_assistant"], true);
    assert!(history[0]["content"].as_str().unwrap().contains("study assistant"));
    assert_eq!(history[1]["content"], "what is physics");
}

#[tokio::test]
async fn test_assistant_settings_round_trip() {
    let (app, _) = test_app().await;
    let user = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/settings/assistant")
                .header("x-user-id", user.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["configured"], false);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/settings/assistant",
            Some(user),
            json!({"api_key": "sk-test"}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["configured"], true);
}

#[tokio::test]
async fn test_malformed_user_header_is_rejected() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/assistant/chat")
                .header("content-type", "application/json")
                .header("x-user-id", "not-a-uuid")
                .body(Body::from(json!({"message": "hi"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
