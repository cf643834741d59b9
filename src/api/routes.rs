use axum::{
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{api as auth_api, auth_middleware, AuthState};
use crate::middleware::request_logging;

/// Create the gateway router. `prefix` is either empty or a path such as
/// `/api/v1` under which the auth routes are nested.
pub fn create_router(state: AuthState, prefix: &str) -> Router {
    let protected_routes = Router::new()
        .route("/users/me", get(auth_api::read_users_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let auth_router = Router::new()
        .route("/token", post(auth_api::login))
        .merge(protected_routes)
        .with_state(state);

    let auth_router = if prefix.is_empty() {
        auth_router
    } else {
        Router::new().nest(prefix, auth_router)
    };

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_router)
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AuthState::from_config(&Config::default()), "")
    }

    fn login_request(path: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn me_request(path: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn obtain_token(app: &Router, path: &str) -> String {
        let response = app
            .clone()
            .oneshot(login_request(
                path,
                "username=user1%40example.com&password=1234",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_login_then_read_me() {
        let app = app();

        let response = app
            .clone()
            .oneshot(login_request(
                "/token",
                "username=user1%40example.com&password=1234",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["token_type"], "bearer");
        let token = body["access_token"].as_str().unwrap();

        let response = app
            .oneshot(me_request("/users/me", Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(
            body,
            serde_json::json!({"email": "user1@example.com", "password": "1234"})
        );
    }

    #[tokio::test]
    async fn test_bad_credentials_are_indistinguishable() {
        let app = app();

        let wrong_password = app
            .clone()
            .oneshot(login_request(
                "/token",
                "username=user1%40example.com&password=nope",
            ))
            .await
            .unwrap();
        let unknown_user = app
            .oneshot(login_request(
                "/token",
                "username=ghost%40example.com&password=1234",
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
        assert!(wrong_password
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .is_none());
        assert_eq!(json_body(wrong_password).await, json_body(unknown_user).await);
    }

    #[tokio::test]
    async fn test_login_missing_field_rejected() {
        let response = app()
            .oneshot(login_request("/token", "username=user1%40example.com"))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert_ne!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_me_without_header() {
        let response = app().oneshot(me_request("/users/me", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        assert_eq!(json_body(response).await["detail"], "Not authenticated");
    }

    #[tokio::test]
    async fn test_me_with_wrong_scheme() {
        let response = app()
            .oneshot(me_request("/users/me", Some("Basic dXNlcjE6MTIzNA==")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_with_garbage_token() {
        let response = app()
            .oneshot(me_request("/users/me", Some("Bearer not.a.token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await["detail"],
            "Could not validate credentials"
        );
    }

    #[tokio::test]
    async fn test_bearer_scheme_is_case_insensitive() {
        let app = app();
        let token = obtain_token(&app, "/token").await;

        let response = app
            .oneshot(me_request("/users/me", Some(&format!("bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_prefixed_routes() {
        let app = create_router(AuthState::from_config(&Config::default()), "/api/v1");
        let token = obtain_token(&app, "/api/v1/token").await;

        let response = app
            .clone()
            .oneshot(me_request(
                "/api/v1/users/me",
                Some(&format!("Bearer {}", token)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(login_request(
                "/token",
                "username=user1%40example.com&password=1234",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }
}
