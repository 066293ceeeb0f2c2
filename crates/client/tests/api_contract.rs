use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};

use client::{ApiClient, Error, JobParams};
use cliplet_captions::ClipKey;
use cliplet_http::ReqwestClient;

const SESSION_COOKIE: &str = "jc_session=test-token; Path=/";

#[derive(Clone, Default)]
struct Backend {
    credits: Arc<Mutex<i64>>,
    saved_captions: Arc<Mutex<Vec<String>>>,
    job_fields: Arc<Mutex<Vec<String>>>,
}

fn logged_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.contains("jc_session="))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"detail": "Not logged in"})),
    )
        .into_response()
}

fn identity_body() -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "email": "ada@example.com",
        "username": "ada",
        "credits": 10,
        "plan": "free",
        "billing": "none",
        "next_reset_at": "2025-01-01T00:00:00"
    })
}

#[derive(serde::Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(serde::Deserialize)]
struct CaptionsForm {
    srt_text: String,
}

async fn me(headers: HeaderMap) -> Response {
    if logged_in(&headers) {
        Json(identity_body()).into_response()
    } else {
        unauthorized()
    }
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    if form.username == "ada" && form.password == "secret-pw" {
        (
            [(header::SET_COOKIE, SESSION_COOKIE)],
            Json(identity_body()),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"detail": "Invalid username/email or password"})),
        )
            .into_response()
    }
}

async fn plans() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "plans": [
            {"key": "free", "name": "Free", "credits": 10, "price_monthly": 0},
            {"key": "basic", "name": "Basic", "credits": 30, "price_monthly": 12, "price_id": "p1"},
            {"key": "plus", "name": "Plus", "credits": 45, "price_monthly": 18, "price_id": "p2"},
            {"key": "pro", "name": "Pro", "credits": 75, "price_monthly": 28, "price_id": "p3"}
        ]
    }))
}

async fn create_job(
    State(backend): State<Backend>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !logged_in(&headers) {
        return unauthorized();
    }

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let _ = field.bytes().await;
        backend.job_fields.lock().unwrap().push(name);
    }

    let mut credits = backend.credits.lock().unwrap();
    if *credits < 1 {
        return (
            StatusCode::PAYMENT_REQUIRED,
            Json(serde_json::json!({"detail": "No credits left"})),
        )
            .into_response();
    }
    *credits -= 1;
    Json(serde_json::json!({"job_id": "ab12cd34", "credits": *credits})).into_response()
}

async fn list_clips(headers: HeaderMap, Path(_job): Path<String>) -> Response {
    if !logged_in(&headers) {
        return unauthorized();
    }
    Json(serde_json::json!({
        "clips": [
            {"index": 0, "start": 0.0, "end": 25.0, "filename": "clip_0.mp4", "thumb": "thumb_0.jpg"},
            {"index": 1, "start": 30.0, "end": 55.0, "filename": "clip_1.mp4", "thumb": "thumb_1.jpg"}
        ]
    }))
    .into_response()
}

async fn clip_words(headers: HeaderMap, Path((_job, idx)): Path<(String, u32)>) -> Response {
    if !logged_in(&headers) {
        return unauthorized();
    }
    if idx > 1 {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "Clip not found"})),
        )
            .into_response();
    }
    Json(serde_json::json!({
        "words": [
            {"word": "hi", "start": 0.0, "end": 1.0},
            {"word": "there"},
            {"word": "friend", "start": "bad", "end": 3.0}
        ]
    }))
    .into_response()
}

async fn clip_srt(headers: HeaderMap, Path((_job, _idx)): Path<(String, u32)>) -> Response {
    if !logged_in(&headers) {
        return unauthorized();
    }
    "1\n00:00:00,000 --> 00:00:01,000\nhi\n".into_response()
}

async fn save_captions(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path((_job, _idx)): Path<(String, u32)>,
    Form(form): Form<CaptionsForm>,
) -> Response {
    if !logged_in(&headers) {
        return unauthorized();
    }
    backend.saved_captions.lock().unwrap().push(form.srt_text);
    Json(serde_json::json!({"ok": true})).into_response()
}

async fn start_backend() -> (SocketAddr, Backend) {
    let backend = Backend {
        credits: Arc::new(Mutex::new(1)),
        ..Default::default()
    };

    let app = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/login", post(login))
        .route(
            "/api/auth/logout",
            post(|| async { Json(serde_json::json!({"ok": true})) }),
        )
        .route("/api/billing/plans", get(plans))
        .route("/api/jobs", post(create_job))
        .route("/api/jobs/{job}/clips", get(list_clips))
        .route("/api/jobs/{job}/clips/{idx}/words", get(clip_words))
        .route("/api/jobs/{job}/clips/{idx}/captions.srt", get(clip_srt))
        .route("/api/jobs/{job}/clips/{idx}/captions", post(save_captions))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, backend)
}

fn api_for(addr: SocketAddr) -> ApiClient<ReqwestClient> {
    ApiClient::new(ReqwestClient::new(format!("http://{addr}")))
}

async fn logged_in_api(addr: SocketAddr) -> ApiClient<ReqwestClient> {
    let api = api_for(addr);
    api.login("ada", "secret-pw").await.unwrap();
    api
}

fn clip_key(idx: u32) -> ClipKey {
    ClipKey {
        job_id: "ab12cd34".to_string(),
        clip_index: idx,
    }
}

#[tokio::test]
async fn identity_is_none_before_login() {
    let (addr, _) = start_backend().await;
    let api = api_for(addr);

    assert!(api.identity().await.unwrap().is_none());
}

#[tokio::test]
async fn login_carries_the_session_to_later_calls() {
    let (addr, _) = start_backend().await;
    let api = api_for(addr);

    let identity = api.login("ada", "secret-pw").await.unwrap();
    assert_eq!(identity.username, "ada");
    assert_eq!(identity.credits, 10);

    let identity = api.identity().await.unwrap().expect("cookie should stick");
    assert_eq!(identity.username, "ada");
}

#[tokio::test]
async fn session_cookie_survives_a_new_client() {
    let (addr, _) = start_backend().await;
    let base = format!("http://{addr}");

    let http = ReqwestClient::new(base.clone());
    ApiClient::new(http.clone())
        .login("ada", "secret-pw")
        .await
        .unwrap();

    let cookie = http.session_cookie().expect("login should set a cookie");
    assert!(cookie.contains("jc_session="));

    let revived = ApiClient::new(ReqwestClient::with_session_cookie(base, &cookie));
    assert!(revived.identity().await.unwrap().is_some());
}

#[tokio::test]
async fn bad_credentials_surface_the_backend_detail() {
    let (addr, _) = start_backend().await;
    let api = api_for(addr);

    let err = api.login("ada", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::AuthRequired(m) if m.contains("Invalid")));
}

#[tokio::test]
async fn words_decode_with_missing_and_malformed_timings() {
    let (addr, _) = start_backend().await;
    let api = logged_in_api(addr).await;

    let words = api.clip_words(&clip_key(0)).await.unwrap();
    assert_eq!(words.len(), 3);
    assert_eq!(words[0].text, "hi");
    assert_eq!((words[1].start, words[1].end), (0.0, 0.0));
    assert_eq!((words[2].start, words[2].end), (0.0, 3.0));
}

#[tokio::test]
async fn unauthenticated_words_load_is_auth_required() {
    let (addr, _) = start_backend().await;
    let api = api_for(addr);

    let err = api.clip_words(&clip_key(0)).await.unwrap_err();
    assert!(matches!(err, Error::AuthRequired(_)));
}

#[tokio::test]
async fn missing_clip_is_a_plain_api_error() {
    let (addr, _) = start_backend().await;
    let api = logged_in_api(addr).await;

    let err = api.clip_words(&clip_key(7)).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Api { status: 404, message } if message == "Clip not found"
    ));
}

#[tokio::test]
async fn save_captions_posts_the_form_field() {
    let (addr, backend) = start_backend().await;
    let api = logged_in_api(addr).await;

    let text = "1\n00:00:00,000 --> 00:00:01,000\nhello & goodbye\n";
    api.save_captions(&clip_key(0), text).await.unwrap();

    let saved = backend.saved_captions.lock().unwrap();
    assert_eq!(saved.as_slice(), [text]);
}

#[tokio::test]
async fn create_job_uploads_and_spends_a_credit() {
    let (addr, backend) = start_backend().await;
    let api = logged_in_api(addr).await;

    let created = api
        .create_job("talk.mp4", vec![0u8; 64], &JobParams::default())
        .await
        .unwrap();
    assert_eq!(created.job_id, "ab12cd34");
    assert_eq!(created.credits, 0);

    let fields = backend.job_fields.lock().unwrap().clone();
    for expected in ["video", "clip_len", "max_clips", "out_aspect"] {
        assert!(fields.contains(&expected.to_string()), "missing {expected}");
    }
}

#[tokio::test]
async fn create_job_without_credits_is_no_credits() {
    let (addr, backend) = start_backend().await;
    let api = logged_in_api(addr).await;
    *backend.credits.lock().unwrap() = 0;

    let err = api
        .create_job("talk.mp4", vec![0u8; 64], &JobParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoCredits));
}

#[tokio::test]
async fn clips_lists_the_job() {
    let (addr, _) = start_backend().await;
    let api = logged_in_api(addr).await;

    let clips = api.clips("ab12cd34").await.unwrap();
    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].index, 0);
    assert_eq!(clips[1].duration(), 25.0);
}

#[tokio::test]
async fn plans_list_matches_the_service() {
    let (addr, _) = start_backend().await;
    let api = api_for(addr);

    let plans = api.plans().await.unwrap();
    assert_eq!(plans.len(), 4);
    assert_eq!(plans[0].key, "free");
    assert_eq!(plans[0].price_monthly, 0);
    assert_eq!(plans[3].credits, 75);
}

#[tokio::test]
async fn captions_srt_passes_the_text_through() {
    let (addr, _) = start_backend().await;
    let api = logged_in_api(addr).await;

    let srt = api.captions_srt(&clip_key(0)).await.unwrap();
    assert!(srt.starts_with("1\n00:00:00,000"));
}
