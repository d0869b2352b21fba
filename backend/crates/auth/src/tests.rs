//! HTTP-level tests for the auth crate
//!
//! Drive the composed router (auth endpoints, account endpoints, request
//! gate) with `tower::ServiceExt::oneshot` against the in-memory repository.

#[cfg(test)]
mod gateway_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderMap, HeaderName, Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::response::Response;
    use axum::routing::get;
    use axum::{Json, extract::Extension};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, SystemTime};
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::application::token::TokenIssuer;
    use crate::domain::entity::identity::{Subject, VerifiedIdentity};
    use crate::domain::value_object::{email::Email, user_id::UserId};
    use crate::infra::memory::InMemoryCredentialRepository;
    use crate::presentation::{
        GateState, USER_EMAIL_HEADER, USER_ID_HEADER, auth_router_generic, me_router_generic,
        request_gate,
    };

    const SECRET: &str = "test_secret_key_for_testing_purposes_only";

    fn echo_identity_headers(headers: HeaderMap) -> Json<Value> {
        let read = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
        Json(json!({
            "id": read(USER_ID_HEADER),
            "email": read(USER_EMAIL_HEADER),
        }))
    }

    fn app_with(config: AuthConfig, hits: Arc<AtomicUsize>) -> Router {
        let config = Arc::new(config);
        let repo = InMemoryCredentialRepository::new();

        let counted = move |headers: HeaderMap| {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                echo_identity_headers(headers)
            }
        };

        Router::new()
            .nest("/api/auth", auth_router_generic(repo.clone(), config.clone()))
            .merge(me_router_generic(repo, config.clone()))
            .route("/api/me/echo", get(counted.clone()))
            .route("/api/public/echo", get(counted))
            .route(
                "/api/me/extension",
                get(|Extension(identity): Extension<VerifiedIdentity>| async move {
                    identity.subject_email
                }),
            )
            .layer(from_fn_with_state(GateState::new(config), request_gate))
    }

    fn app() -> Router {
        app_with(AuthConfig::development(SECRET), Arc::new(AtomicUsize::new(0)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with(uri: &str, headers: &[(header::HeaderName, String)]) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// `token=<value>` pair from a `Set-Cookie` header
    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn sign_up(app: &Router, email: &str, password: &str) -> Response {
        app.clone()
            .oneshot(post_json(
                "/api/auth/signup",
                json!({ "email": email, "password": password }),
            ))
            .await
            .unwrap()
    }

    async fn sign_in(app: &Router, email: &str, password: &str) -> Response {
        app.clone()
            .oneshot(post_json(
                "/api/auth/signin",
                json!({ "email": email, "password": password }),
            ))
            .await
            .unwrap()
    }

    /// Register and sign in; returns (user id, `token=...` cookie pair)
    async fn signed_in(app: &Router) -> (String, String) {
        let created = body_json(sign_up(app, "a@test.com", "secret123").await).await;
        let response = sign_in(app, "a@test.com", "secret123").await;
        let cookie = cookie_pair(&set_cookie(&response).unwrap());
        (created["id"].as_str().unwrap().to_string(), cookie)
    }

    #[tokio::test]
    async fn test_register_sign_in_then_reach_protected_path() {
        let app = app();

        let response = sign_up(&app, "a@test.com", "secret123").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["email"], "a@test.com");

        let response = sign_in(&app, "a@test.com", "secret123").await;
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = set_cookie(&response).unwrap();
        assert!(set_cookie.starts_with("token="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("Max-Age=604800"));
        assert!(!set_cookie.contains("Secure"));

        let response = app
            .clone()
            .oneshot(get_with("/api/me", &[(header::COOKIE, cookie_pair(&set_cookie))]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let me = body_json(response).await;
        assert_eq!(me["id"], created["id"]);
        assert_eq!(me["email"], "a@test.com");
    }

    #[tokio::test]
    async fn test_secure_cookie_outside_development() {
        let config = AuthConfig {
            jwt_secret: AuthConfig::development(SECRET).jwt_secret,
            ..AuthConfig::default()
        };
        let app = app_with(config, Arc::new(AtomicUsize::new(0)));
        sign_up(&app, "a@test.com", "secret123").await;

        let response = sign_in(&app, "a@test.com", "secret123").await;
        assert!(set_cookie(&response).unwrap().contains("; Secure"));
    }

    #[tokio::test]
    async fn test_wrong_password_gets_401_without_cookie() {
        let app = app();
        sign_up(&app, "a@test.com", "secret123").await;

        let wrong_password = sign_in(&app, "a@test.com", "secret124").await;
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&wrong_password).is_none());

        let unknown_email = sign_in(&app, "nobody@test.com", "secret123").await;
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&unknown_email).is_none());

        assert_eq!(body_json(wrong_password).await, body_json(unknown_email).await);
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let app = app();
        assert_eq!(
            sign_up(&app, "a@test.com", "secret123").await.status(),
            StatusCode::CREATED
        );

        let response = sign_up(&app, "a@test.com", "another-pass9").await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["status"], 409);
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let app = app();
        assert_eq!(
            sign_up(&app, "not-an-email", "secret123").await.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            sign_up(&app, "a@test.com", "short").await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_gated_path_without_token_never_reaches_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app_with(AuthConfig::development(SECRET), hits.clone());

        let response = app
            .oneshot(get_with("/api/me/echo", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(body_json(response).await["detail"], "authentication required");
    }

    #[tokio::test]
    async fn test_public_path_without_token_passes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app_with(AuthConfig::development(SECRET), hits.clone());

        let response = app
            .oneshot(get_with("/api/public/echo", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_public_path_passes_even_without_secret() {
        let app = app_with(AuthConfig::default(), Arc::new(AtomicUsize::new(0)));
        let response = app
            .oneshot(get_with("/api/public/echo", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_spoofed_identity_headers_are_stripped() {
        let app = app();
        let spoofed = [
            (USER_ID_HEADER, UserId::new().to_string()),
            (USER_EMAIL_HEADER, "admin@test.com".to_string()),
        ];

        let response = app
            .clone()
            .oneshot(get_with("/api/public/echo", &spoofed))
            .await
            .unwrap();
        let echoed = body_json(response).await;
        assert!(echoed["id"].is_null());
        assert!(echoed["email"].is_null());

        let (id, cookie) = signed_in(&app).await;
        let mut headers = spoofed.to_vec();
        headers.push((header::COOKIE, cookie));

        let response = app
            .oneshot(get_with("/api/me/echo", &headers))
            .await
            .unwrap();
        let echoed = body_json(response).await;
        assert_eq!(echoed["id"], id.as_str());
        assert_eq!(echoed["email"], "a@test.com");
    }

    #[tokio::test]
    async fn test_gate_attaches_identity_extension() {
        let app = app();
        let (_, cookie) = signed_in(&app).await;

        let response = app
            .oneshot(get_with("/api/me/extension", &[(header::COOKIE, cookie)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"a@test.com");
    }

    #[tokio::test]
    async fn test_bearer_header_accepted() {
        let app = app();
        let (id, cookie) = signed_in(&app).await;
        let token = cookie.trim_start_matches("token=").to_string();

        let response = app
            .oneshot(get_with(
                "/api/me",
                &[(header::AUTHORIZATION, format!("Bearer {token}"))],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_malformed_bearer_falls_back_to_cookie() {
        let app = app();
        let (_, cookie) = signed_in(&app).await;

        let response = app
            .oneshot(get_with(
                "/api/me",
                &[
                    (header::AUTHORIZATION, "Token abc".to_string()),
                    (header::COOKIE, cookie),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_expired_and_tampered_tokens_get_uniform_401() {
        let app = app();
        let subject = Subject {
            id: UserId::new(),
            email: Email::new("a@test.com").unwrap(),
        };
        let expired = TokenIssuer::new(
            AuthConfig::development(SECRET).jwt_secret,
            Duration::from_secs(1),
        )
        .issue(&subject, SystemTime::now() - Duration::from_secs(2))
        .unwrap()
        .token;

        let response = app
            .clone()
            .oneshot(get_with("/api/me", &[(header::COOKIE, format!("token={expired}"))]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let expired_body = body_json(response).await;
        assert_eq!(expired_body["detail"], "authentication failed");

        let forged = TokenIssuer::new(
            AuthConfig::development("someone-else").jwt_secret,
            Duration::from_secs(60),
        )
        .issue(&subject, SystemTime::now())
        .unwrap()
        .token;

        let response = app
            .oneshot(get_with("/api/me", &[(header::COOKIE, format!("token={forged}"))]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, expired_body);
    }

    #[tokio::test]
    async fn test_missing_secret_is_server_error() {
        let app = app_with(AuthConfig::default(), Arc::new(AtomicUsize::new(0)));

        assert_eq!(
            sign_up(&app, "a@test.com", "secret123").await.status(),
            StatusCode::CREATED
        );
        let response = sign_in(&app, "a@test.com", "secret123").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(set_cookie(&response).is_none());

        let response = app
            .oneshot(get_with("/api/me", &[(header::COOKIE, "token=a.b.c".to_string())]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_sign_out_expires_cookie() {
        let response = app()
            .oneshot(post_json("/api/auth/signout", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let set_cookie = set_cookie(&response).unwrap();
        assert!(set_cookie.starts_with("token=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_status_reports_session() {
        let app = app();

        let response = app
            .clone()
            .oneshot(get_with("/api/auth/status", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "authenticated": false }));

        let response = app
            .clone()
            .oneshot(get_with(
                "/api/auth/status",
                &[(header::COOKIE, "token=garbage".to_string())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["authenticated"], false);

        let (id, cookie) = signed_in(&app).await;
        let response = app
            .oneshot(get_with("/api/auth/status", &[(header::COOKIE, cookie)]))
            .await
            .unwrap();
        let status = body_json(response).await;
        assert_eq!(status["authenticated"], true);
        assert_eq!(status["id"], id.as_str());
        assert_eq!(status["email"], "a@test.com");
        assert!(status["expiresAt"].is_string());
    }

    #[tokio::test]
    async fn test_profile() {
        let app = app();
        let (id, cookie) = signed_in(&app).await;

        let response = app
            .oneshot(get_with("/api/me/profile", &[(header::COOKIE, cookie)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let profile = body_json(response).await;
        assert_eq!(profile["id"], id.as_str());
        assert_eq!(profile["email"], "a@test.com");
        assert!(profile["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_change_password() {
        let app = app();
        let (_, cookie) = signed_in(&app).await;

        let mut request = post_json(
            "/api/me/password",
            json!({ "currentPassword": "wrong-pass1", "newPassword": "n3w-passw0rd" }),
        );
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut request = post_json(
            "/api/me/password",
            json!({ "currentPassword": "secret123", "newPassword": "n3w-passw0rd" }),
        );
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        assert_eq!(
            sign_in(&app, "a@test.com", "secret123").await.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            sign_in(&app, "a@test.com", "n3w-passw0rd").await.status(),
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_account_route_outside_gate_is_wiring_error() {
        let config = Arc::new(AuthConfig::development(SECRET));
        let ungated = me_router_generic(InMemoryCredentialRepository::new(), config);

        let response = ungated
            .oneshot(get_with("/api/me", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
