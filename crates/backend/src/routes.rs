use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth;
use crate::AppState;

/// All routes, with the token check applied to the protected ones only.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/protected", get(auth::protected))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Build CORS layer from the configured origins.
///
/// With no origins configured, defaults to permissive CORS (for development only).
pub fn build_cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .unwrap_or_default()
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            "CORS_ALLOWED_ORIGINS not set, using permissive CORS (not recommended for production)"
        );
        return CorsLayer::permissive();
    }

    tracing::info!("CORS configured for origins: {:?}", origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::AUTHORIZATION])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::MIN_COST;
    use crate::auth::{AuthConfig, JwtSecret, PasswordHasher, PROTECTED_RESOURCE};
    use crate::repository::MemoryUserStore;
    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    fn app() -> Router {
        let config = AuthConfig::new(JwtSecret::new(SECRET).unwrap());
        let state = AppState::new(
            Arc::new(MemoryUserStore::new()),
            PasswordHasher::new(MIN_COST).unwrap(),
            config,
        );
        build_router(state)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_protected(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn signup_and_login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@b.com", "password": "pw123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({"email": "a@b.com", "password": "pw123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signup_returns_id_and_email_only() {
        let response = app()
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@b.com", "password": "pw123"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["id"].as_i64().unwrap() > 0);
        assert_eq!(body["email"], "a@b.com");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_signup_missing_fields() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json("/signup", json!({"email": "", "password": "pw123"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Email is missing."})
        );

        let response = app
            .oneshot(post_json("/signup", json!({"email": "a@b.com"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Password is missing."})
        );
    }

    #[tokio::test]
    async fn test_null_password_is_reported_missing() {
        let response = app()
            .oneshot(post_json(
                "/login",
                json!({"email": "a@b.com", "password": null}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Password is missing."})
        );
    }

    #[tokio::test]
    async fn test_undecodable_body_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_duplicate_signup_is_server_error() {
        let app = app();
        let body = json!({"email": "a@b.com", "password": "pw123"});

        let first = app.clone().oneshot(post_json("/signup", body.clone())).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(post_json("/signup", body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(second).await, json!({"message": "Server error."}));
    }

    #[tokio::test]
    async fn test_login_sets_header_to_token() {
        let app = app();
        app.clone()
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@b.com", "password": "pw123"}),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/login",
                json!({"email": "a@b.com", "password": "pw123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let header_token = response
            .headers()
            .get(header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = json_body(response).await;
        let token = body["token"].as_str().unwrap();
        assert!(!token.is_empty());
        assert_eq!(token, header_token);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user() {
        let app = app();
        signup_and_login(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({"email": "a@b.com", "password": "nope"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::AUTHORIZATION).is_none());
        assert_eq!(
            json_body(response).await,
            json!({"message": "The provided password is invalid."})
        );

        let response = app
            .oneshot(post_json(
                "/login",
                json!({"email": "nobody@b.com", "password": "pw123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"message": "The user does not exist."})
        );
    }

    #[tokio::test]
    async fn test_protected_requires_valid_token() {
        let app = app();
        let token = signup_and_login(&app).await;

        let response = app.clone().oneshot(get_protected(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(json_body(response).await["message"].is_string());

        let response = app
            .clone()
            .oneshot(get_protected(Some(format!("Bearer {}", token).as_str())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"data": PROTECTED_RESOURCE})
        );
    }

    #[tokio::test]
    async fn test_protected_rejects_foreign_and_malformed_tokens() {
        let app = app();
        let token = signup_and_login(&app).await;

        let foreign_config = AuthConfig::new(JwtSecret::new("some-other-secret").unwrap());
        let foreign = crate::auth::create_token(&foreign_config, "a@b.com").unwrap();

        for value in [
            format!("Bearer {}", foreign),
            token.clone(),
            format!("Bearer {} extra", token),
            "Bearer not.a.token".to_string(),
        ] {
            let response = app
                .clone()
                .oneshot(get_protected(Some(value.as_str())))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{:?} should be rejected",
                value
            );
        }
    }
}
