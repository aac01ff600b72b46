//! REST surface - router, shared state, identity extraction and error mapping.
//!
//! Every route except `/health` resolves the caller from the `X-Auth-Subject`
//! header and hands the user id to the core as the acting user.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;

use crate::config::AppConfig;
use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database pool
    pub db: DatabaseConnection,
    /// Loaded application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundles the pool and configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(profile_routes())
        .merge(event_routes())
        .merge(participant_routes())
        .merge(assignment_routes())
        .merge(notification_routes())
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn profile_routes() -> Router<AppState> {
    use handlers::profile;
    Router::new()
        .route(
            "/profile",
            get(profile::get_profile).post(profile::create_profile),
        )
        .route("/friends", get(profile::list_friends))
        .route("/friends/{user_id}", post(profile::add_friend))
}

fn event_routes() -> Router<AppState> {
    use handlers::events;
    Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
}

fn participant_routes() -> Router<AppState> {
    use handlers::participants;
    Router::new()
        .route(
            "/events/{id}/participants",
            get(participants::list_participants).post(participants::invite_participant),
        )
        .route(
            "/events/{id}/participants/accept",
            post(participants::accept_invitation),
        )
        .route(
            "/events/{id}/participants/decline",
            post(participants::decline_invitation),
        )
        .route(
            "/events/{id}/participants/{user_id}",
            axum::routing::delete(participants::remove_participant),
        )
        .route(
            "/invitations/pending/count",
            get(participants::pending_invitation_count),
        )
}

fn assignment_routes() -> Router<AppState> {
    use handlers::assignments;
    Router::new()
        .route("/events/{id}/draw", post(assignments::draw_names))
        .route("/events/{id}/assignment", get(assignments::get_my_assignment))
        .route(
            "/events/{id}/assignment/reveal",
            post(assignments::reveal_assignment),
        )
        .route(
            "/events/{id}/assignments",
            get(assignments::get_all_assignments),
        )
        .route("/events/{id}/progress", get(assignments::get_progress))
        .route("/events/{id}/complete", post(assignments::mark_as_completed))
}

fn notification_routes() -> Router<AppState> {
    use handlers::notifications;
    Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/{id}/read",
            post(notifications::mark_read),
        )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = setup_test_db().await.unwrap();
        app(AppState::new(db, AppConfig::default()))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        subject: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(subject) = subject {
            builder = builder.header(extractors::SUBJECT_HEADER, subject);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let res = app.clone().oneshot(request).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn signup(app: &Router, subject: &str, name: &str) -> i64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/profile",
            Some(subject),
            Some(json!({ "display_name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    async fn befriend(app: &Router, a: (&str, i64), b: (&str, i64)) {
        let (status, _) = send(app, Method::POST, &format!("/friends/{}", b.1), Some(a.0), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) =
            send(app, Method::POST, &format!("/friends/{}", a.1), Some(b.0), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ACCEPTED");
    }

    #[tokio::test]
    async fn test_state_clones_share_database() {
        let db = setup_test_db().await.unwrap();
        let state = AppState::new(db, AppConfig::default());
        let copy = state.clone();
        crate::core::identity::create_profile(&state.db, "shared", "Shared", None)
            .await
            .unwrap();
        let found = crate::core::identity::resolve_user(&copy.db, "shared").await.unwrap();
        assert_eq!(found.display_name, "Shared");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_shape() {
        let app = test_app().await;
        signup(&app, "a", "Alice").await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/events")
            .header(extractors::SUBJECT_HEADER, "a")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app.clone().oneshot(request).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));

        // Well-formed JSON missing a required field
        let (status, body) = send(
            &app,
            Method::POST,
            "/events",
            Some("a"),
            Some(json!({ "title": "No dates" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        let (status, body) =
            send(&app, Method::POST, "/profile", Some("b"), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_patch_can_clear_budget() {
        let app = test_app().await;
        signup(&app, "a", "Alice").await;
        let (_, event) = send(
            &app,
            Method::POST,
            "/events",
            Some("a"),
            Some(json!({
                "title": "Budgeted",
                "draw_date": "2025-12-01",
                "exchange_date": "2025-12-25",
                "budget": 30.0,
            })),
        )
        .await;
        let uri = format!("/events/{}", event["id"]);

        let (status, kept) =
            send(&app, Method::PATCH, &uri, Some("a"), Some(json!({ "title": "Renamed" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(kept["budget"], 30.0);

        let (status, cleared) =
            send(&app, Method::PATCH, &uri, Some("a"), Some(json!({ "budget": null }))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(cleared["budget"].is_null());
        assert_eq!(cleared["title"], "Renamed");
    }

    #[tokio::test]
    async fn test_health_needs_no_identity() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["events"], 0);
    }

    #[tokio::test]
    async fn test_identity_errors() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/events", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHENTICATED");

        let (status, body) = send(&app, Method::GET, "/events", Some("auth0|ghost"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "PROFILE_NOT_FOUND");

        signup(&app, "auth0|ghost", "Ghost").await;
        let (status, body) = send(&app, Method::GET, "/profile", Some("auth0|ghost"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display_name"], "Ghost");
        assert!(body.get("auth_subject").is_none());
    }

    #[tokio::test]
    async fn test_create_event_validation_errors() {
        let app = test_app().await;
        signup(&app, "a", "Alice").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/events",
            Some("a"),
            Some(json!({
                "title": "Party",
                "draw_date": "2025-12-25",
                "exchange_date": "2025-12-01",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        let (status, _) = send(&app, Method::GET, "/events/42", Some("a"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_exchange_over_http() {
        let app = test_app().await;
        let alice = ("alice", signup(&app, "alice", "Alice").await);
        let bob = ("bob", signup(&app, "bob", "Bob").await);
        let carol = ("carol", signup(&app, "carol", "Carol").await);
        befriend(&app, alice, bob).await;
        befriend(&app, alice, carol).await;

        let (status, event) = send(
            &app,
            Method::POST,
            "/events",
            Some(alice.0),
            Some(json!({
                "title": "Office Secret Santa",
                "draw_date": "2025-12-01",
                "exchange_date": "2025-12-25",
                "budget": 25.0,
                "participant_ids": [bob.1, carol.1],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(event["status"], "PENDING");
        let id = event["id"].as_i64().unwrap();

        let (_, count) =
            send(&app, Method::GET, "/invitations/pending/count", Some(bob.0), None).await;
        assert_eq!(count["count"], 1);

        for who in [bob.0, carol.0] {
            let uri = format!("/events/{id}/participants/accept");
            let (status, _) = send(&app, Method::POST, &uri, Some(who), None).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, _) = send(&app, Method::POST, &format!("/events/{id}/draw"), Some(bob.0), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, drawn) =
            send(&app, Method::POST, &format!("/events/{id}/draw"), Some(alice.0), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(drawn["assignment_count"], 3);
        assert_eq!(drawn["event"]["status"], "DRAWN");

        let (status, again) =
            send(&app, Method::POST, &format!("/events/{id}/draw"), Some(alice.0), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(again["error"], "VALIDATION_ERROR");

        let (_, hidden) =
            send(&app, Method::GET, &format!("/events/{id}/assignment"), Some(bob.0), None).await;
        assert_eq!(hidden["revealed"], false);
        assert!(hidden.get("receiver").is_none());

        let uri = format!("/events/{id}/assignment/reveal");
        let (status, shown) = send(&app, Method::POST, &uri, Some(bob.0), None).await;
        assert_eq!(status, StatusCode::OK);
        let receiver = shown["receiver"]["id"].as_i64().unwrap();
        assert!(receiver == alice.1 || receiver == carol.1);

        let (_, progress) =
            send(&app, Method::GET, &format!("/events/{id}/progress"), Some(carol.0), None).await;
        assert_eq!(progress["status"], "IN_PROGRESS");
        assert_eq!(progress["revealed_assignments"], 1);

        let uri = format!("/events/{id}/assignments");
        let (status, _) = send(&app, Method::GET, &uri, Some(alice.0), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, done) =
            send(&app, Method::POST, &format!("/events/{id}/complete"), Some(alice.0), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(done["status"], "COMPLETED");

        let (status, pairs) = send(&app, Method::GET, &uri, Some(alice.0), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pairs.as_array().unwrap().len(), 3);

        let (_, inbox) = send(&app, Method::GET, "/notifications", Some(carol.0), None).await;
        let inbox = inbox.as_array().unwrap();
        assert_eq!(inbox[0]["kind"], "secret_santa_completed");

        let read_uri = format!("/notifications/{}/read", inbox[0]["id"]);
        let (status, read) = send(&app, Method::POST, &read_uri, Some(carol.0), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(read["is_read"], true);

        let (status, _) = send(&app, Method::DELETE, &format!("/events/{id}"), Some(alice.0), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, health) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(health["events"], 0);
    }
}
