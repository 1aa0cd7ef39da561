//! End-to-end API tests: the real router over an in-memory SQLite pool, a
//! temp-dir archive store and a mailer that records instead of sending.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use codehub_backend::{
    AppState,
    activation::CodeStore,
    config::Config,
    database,
    database::repositories::ProjectRepository,
    mail::{MailError, Mailer},
    routes,
    storage::ArchiveStore,
};

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    fn last_code(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let (_, _, body) = sent.last().expect("no mail was sent");
        body.rsplit(' ').next().unwrap().to_string()
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Rejected(502));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

struct TestApp {
    router: Router,
    mailer: Arc<RecordingMailer>,
    state: AppState,
    _upload_dir: tempfile::TempDir,
}

async fn spawn_app() -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    database::init_schema(&pool).await.unwrap();

    let upload_dir = tempfile::tempdir().unwrap();
    let archives = ArchiveStore::init(upload_dir.path().to_str().unwrap())
        .await
        .unwrap();

    let config = Config {
        database_url: "sqlite::memory:".into(),
        server_host: "127.0.0.1".into(),
        server_port: 0,
        mail_api_url: "http://mail.invalid/send".into(),
        mail_api_key: "test-key".into(),
        mail_from: "hub@simplon.test".into(),
        upload_dir: upload_dir.path().to_string_lossy().into_owned(),
        max_upload_mb: 50,
    };

    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState {
        pool,
        config,
        codes: Arc::new(CodeStore::new()),
        mailer: mailer.clone(),
        archives,
    };

    TestApp {
        router: routes::router(state.clone()),
        mailer,
        state,
        _upload_dir: upload_dir,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn patch_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn delete_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

const BOUNDARY: &str = "test-boundary-7e58";

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_multipart(
    router: &Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, file)))
        .unwrap();
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Runs the full activation handshake and returns the new user's id.
async fn register_user(app: &TestApp, email: &str, matricule: &str, pseudo: &str) -> String {
    let (status, _) = post_json(
        &app.router,
        "/api/send-code",
        json!({"email": email, "matricule": matricule}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let code = app.mailer.last_code();
    let (status, _) = post_json(
        &app.router,
        "/api/verify-code",
        json!({"email": email, "code": code}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app.router,
        "/api/activation",
        json!({"email": email, "matricule": matricule, "pseudo": pseudo, "password": "pw123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &app.router,
        "/api/login",
        json!({"identifier": pseudo, "password": "pw123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["user"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn activation_flow_end_to_end() {
    let app = spawn_app().await;

    let (status, body) = post_json(
        &app.router,
        "/api/send-code",
        json!({"email": "a@x.com", "matricule": "MAT-7"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Code sent");
    assert_eq!(app.mailer.sent_count(), 1);

    let code = app.mailer.last_code();
    assert_eq!(code.len(), 6);

    // wrong code is rejected, right code verifies, and verification does not
    // consume the pending entry
    let (status, _) = post_json(
        &app.router,
        "/api/verify-code",
        json!({"email": "a@x.com", "code": "000000"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app.router,
        "/api/verify-code",
        json!({"email": "a@x.com", "code": code}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app.router,
        "/api/verify-code",
        json!({"email": "a@x.com", "code": code}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &app.router,
        "/api/activation",
        json!({"email": "a@x.com", "matricule": "MAT-7", "pseudo": "bob", "password": "pw"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "trainee");

    // activation consumed the code
    let (status, _) = post_json(
        &app.router,
        "/api/verify-code",
        json!({"email": "a@x.com", "code": code}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // same email, different matricule: no second account
    let (status, _) = post_json(
        &app.router,
        "/api/activation",
        json!({"email": "a@x.com", "matricule": "MAT-8", "pseudo": "other", "password": "pw"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = get_json(&app.router, "/api/admin/users").await;
    assert_eq!(body["users"].as_array().unwrap().len(), 1);

    // a Registration activity was appended
    let (_, body) = get_json(&app.router, "/api/admin/activities").await;
    let actions: Vec<&str> = body["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"Registration"));
}

#[tokio::test]
async fn send_code_rejects_invalid_matricule() {
    let app = spawn_app().await;

    for matricule in ["XX-12", "MAT-", "MAT-1a", "AD12", ""] {
        let (status, _) = post_json(
            &app.router,
            "/api/send-code",
            json!({"email": "a@x.com", "matricule": matricule}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "matricule {matricule:?}");
    }
    assert_eq!(app.mailer.sent_count(), 0);

    // nothing was stored either
    let (status, _) = post_json(
        &app.router,
        "/api/verify-code",
        json!({"email": "a@x.com", "code": "123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reissue_overwrites_previous_code() {
    let app = spawn_app().await;

    post_json(
        &app.router,
        "/api/send-code",
        json!({"email": "a@x.com", "matricule": "MAT-7"}),
    )
    .await;
    let first = app.mailer.last_code();

    post_json(
        &app.router,
        "/api/send-code",
        json!({"email": "a@x.com", "matricule": "MAT-7"}),
    )
    .await;
    let second = app.mailer.last_code();

    if first != second {
        let (status, _) = post_json(
            &app.router,
            "/api/verify-code",
            json!({"email": "a@x.com", "code": first}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = post_json(
        &app.router,
        "/api/verify-code",
        json!({"email": "a@x.com", "code": second}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delivery_failure_leaves_no_live_code() {
    let app = spawn_app().await;
    app.mailer.fail.store(true, Ordering::SeqCst);

    let (status, _) = post_json(
        &app.router,
        "/api/send-code",
        json!({"email": "a@x.com", "matricule": "MAT-7"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = post_json(
        &app.router,
        "/api/verify-code",
        json!({"email": "a@x.com", "code": "123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_matricule_gets_admin_role_and_redirect() {
    let app = spawn_app().await;
    register_user(&app, "boss@x.com", "AD-0001", "boss").await;

    let (status, body) = post_json(
        &app.router,
        "/api/login",
        json!({"identifier": "AD-0001", "password": "pw123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["redirectTo"], "/admin");
}

#[tokio::test]
async fn login_accepts_email_pseudo_or_matricule_and_fails_uniformly() {
    let app = spawn_app().await;
    register_user(&app, "a@x.com", "MAT-7", "bob").await;

    for identifier in ["a@x.com", "A@X.com", "bob", "BOB", "MAT-7"] {
        let (status, body) = post_json(
            &app.router,
            "/api/login",
            json!({"identifier": identifier, "password": "pw123456"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "identifier {identifier:?}");
        assert_eq!(body["redirectTo"], "/dashboard");
        assert!(body["user"].get("passwordHash").is_none());
        assert!(body["user"].get("password_hash").is_none());
    }

    // wrong password and unknown identifier are indistinguishable
    let (status, wrong_pw) = post_json(
        &app.router,
        "/api/login",
        json!({"identifier": "bob", "password": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown) = post_json(
        &app.router,
        "/api/login",
        json!({"identifier": "nobody", "password": "pw123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw, unknown);
}

#[tokio::test]
async fn upload_download_and_ledger_bookkeeping() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "a@x.com", "MAT-7", "bob").await;

    let archive = vec![0x5a_u8; 2 * 1024 * 1024];
    let (status, body) = post_multipart(
        &app.router,
        "/api/projects",
        &[
            ("title", "Demo App"),
            ("description", "A demo"),
            ("technologies", "Rust"),
            ("technologies", "Axum"),
            ("category", "web"),
            ("author_id", user_id.as_str()),
            ("author_name", "bob"),
        ],
        Some(("demo.zip", &archive)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = body["projectId"].as_str().unwrap().to_string();

    let (_, body) = get_json(&app.router, "/api/projects").await;
    let project = &body["projects"][0];
    assert_eq!(project["title"], "Demo App");
    assert_eq!(project["archiveSize"], "2.0 MB");
    assert_eq!(project["technologies"], json!(["Rust", "Axum"]));
    assert_eq!(project["authorName"], "bob");
    assert_eq!(project["hasArchive"], true);

    // download with a known user streams the exact bytes as an attachment
    // and appends exactly one ledger row
    let request = Request::builder()
        .uri(format!("/api/download-file/{project_id}?user_id={user_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("demo.zip"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.as_ref(), archive.as_slice());

    let (_, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(body["counts"]["downloads"], 1);

    // repeat downloads are never deduplicated
    let request = Request::builder()
        .uri(format!("/api/download-file/{project_id}?user_id={user_id}"))
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap();
    let (_, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(body["counts"]["downloads"], 2);

    // anonymous download streams but records nothing
    let request = Request::builder()
        .uri(format!("/api/download-file/{project_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let (_, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(body["counts"]["downloads"], 2);

    let (_, body) = get_json(&app.router, &format!("/api/my-downloads/{user_id}")).await;
    let downloads = body["downloads"].as_array().unwrap();
    assert_eq!(downloads.len(), 2);
    assert_eq!(downloads[0]["title"], "Demo App");
    assert_eq!(downloads[0]["authorName"], "bob");

    // explicit logging endpoint
    let (status, body) = post_json(
        &app.router,
        "/api/record-download",
        json!({"user_id": user_id, "project_id": project_id}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["download"]["projectId"], project_id.as_str());

    let (status, _) = post_json(
        &app.router,
        "/api/record-download",
        json!({"user_id": user_id, "project_id": "missing"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Download activities were appended by the streaming path
    let (_, body) = get_json(&app.router, "/api/admin/activities").await;
    let download_count = body["activities"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["action"] == "Download")
        .count();
    assert_eq!(download_count, 2);
}

#[tokio::test]
async fn download_without_archive_appends_nothing() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "a@x.com", "MAT-7", "bob").await;

    let (status, body) = post_multipart(
        &app.router,
        "/api/projects",
        &[("title", "No Archive"), ("author_id", user_id.as_str())],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = body["projectId"].as_str().unwrap().to_string();

    let (status, _) = get_json(
        &app.router,
        &format!("/api/download-file/{project_id}?user_id={user_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // blob vanished from disk after upload: still 404, still no ledger row
    let (status, body) = post_multipart(
        &app.router,
        "/api/projects",
        &[("title", "Gone"), ("author_id", user_id.as_str())],
        Some(("gone.zip", b"bytes")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let gone_id = body["projectId"].as_str().unwrap().to_string();
    let record = ProjectRepository::find_by_id(&app.state.pool, &gone_id)
        .await
        .unwrap()
        .unwrap();
    app.state
        .archives
        .remove(record.archive_path.as_deref().unwrap())
        .await
        .unwrap();

    let (status, _) = get_json(
        &app.router,
        &format!("/api/download-file/{gone_id}?user_id={user_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(body["counts"]["downloads"], 0);
}

#[tokio::test]
async fn search_filters_combine_with_and_semantics() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "a@x.com", "MAT-7", "bob").await;

    for (title, tech) in [
        ("Rust Hub", "Rust"),
        ("Food Tracker", "React"),
        ("Rusty Notes", "React"),
    ] {
        let (status, _) = post_multipart(
            &app.router,
            "/api/projects",
            &[
                ("title", title),
                ("technologies", tech),
                ("author_id", user_id.as_str()),
            ],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = get_json(&app.router, "/api/projects/search?q=rust").await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 2);

    let (_, body) = get_json(&app.router, "/api/projects/search?tech=react").await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 2);

    let (_, body) = get_json(&app.router, "/api/projects/search?q=rust&tech=react").await;
    let projects = body["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["title"], "Rusty Notes");

    let (_, body) = get_json(&app.router, "/api/projects/search").await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 3);

    let (_, body) = get_json(&app.router, &format!("/api/projects/user/{user_id}")).await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn project_deletion_cascades_ledger_but_not_activities() {
    let app = spawn_app().await;
    let user_id = register_user(&app, "a@x.com", "MAT-7", "bob").await;

    let (_, body) = post_multipart(
        &app.router,
        "/api/projects",
        &[("title", "Doomed"), ("author_id", user_id.as_str())],
        Some(("doomed.zip", b"payload")),
    )
    .await;
    let project_id = body["projectId"].as_str().unwrap().to_string();
    let archive_name = ProjectRepository::find_by_id(&app.state.pool, &project_id)
        .await
        .unwrap()
        .unwrap()
        .archive_path
        .unwrap();

    get_json(
        &app.router,
        &format!("/api/download-file/{project_id}?user_id={user_id}"),
    )
    .await;

    let (status, _) = delete_json(&app.router, &format!("/api/admin/project/{project_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app.router, "/api/projects").await;
    assert!(body["projects"].as_array().unwrap().is_empty());

    // ledger rows for the project are gone
    let (_, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(body["counts"]["downloads"], 0);
    let (_, body) = get_json(&app.router, &format!("/api/my-downloads/{user_id}")).await;
    assert!(body["downloads"].as_array().unwrap().is_empty());

    // blob removed from disk
    assert!(!app.state.archives.exists(&archive_name).await);

    // activity history keeps the pre-deletion entries and gains a Deletion
    let (_, body) = get_json(&app.router, "/api/admin/activities").await;
    let actions: Vec<&str> = body["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"NewProject"));
    assert!(actions.contains(&"Download"));
    assert!(actions.contains(&"Deletion"));

    let (status, _) = delete_json(&app.router, &format!("/api/admin/project/{project_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_update_and_summary() {
    let app = spawn_app().await;
    let bob = register_user(&app, "a@x.com", "MAT-7", "bob").await;
    register_user(&app, "b@x.com", "MAT-8", "alice").await;

    // pseudo collision
    let (status, _) = patch_json(
        &app.router,
        &format!("/api/users/{bob}"),
        json!({"pseudo": "Alice"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // pseudo + password change
    let (status, body) = patch_json(
        &app.router,
        &format!("/api/users/{bob}"),
        json!({"pseudo": "bobby", "password": "newpass99"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["pseudo"], "bobby");

    let (status, _) = post_json(
        &app.router,
        "/api/login",
        json!({"identifier": "bobby", "password": "pw123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post_json(
        &app.router,
        "/api/login",
        json!({"identifier": "bobby", "password": "newpass99"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = patch_json(
        &app.router,
        "/api/users/does-not-exist",
        json!({"pseudo": "x"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // profile summary with counts
    let (_, body) = post_multipart(
        &app.router,
        "/api/projects",
        &[("title", "Counted"), ("author_id", bob.as_str())],
        Some(("c.zip", b"data")),
    )
    .await;
    let project_id = body["projectId"].as_str().unwrap().to_string();
    get_json(
        &app.router,
        &format!("/api/download-file/{project_id}?user_id={bob}"),
    )
    .await;

    let (status, body) = get_json(&app.router, &format!("/api/user/profile?user_id={bob}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pseudo"], "bobby");
    assert_eq!(body["projectCount"], 1);
    assert_eq!(body["downloadCount"], 1);

    let (status, _) = get_json(&app.router, "/api/user/profile").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get_json(&app.router, "/api/user/profile?user_id=missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_prunes_activities() {
    let app = spawn_app().await;
    register_user(&app, "a@x.com", "MAT-7", "bob").await;

    let (_, body) = get_json(&app.router, "/api/admin/activities").await;
    let first_id = body["activities"][0]["id"].as_str().unwrap().to_string();
    let before = body["activities"].as_array().unwrap().len();
    assert!(before >= 2); // Registration + Login

    let (status, _) =
        delete_json(&app.router, &format!("/api/admin/activity/{first_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) =
        delete_json(&app.router, &format!("/api/admin/activity/{first_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = delete_json(&app.router, "/api/admin/activities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], (before - 1) as u64);

    let (_, body) = get_json(&app.router, "/api/admin/activities").await;
    assert!(body["activities"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_counts() {
    let app = spawn_app().await;

    let (status, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["counts"]["users"], 0);
    assert_eq!(body["counts"]["projects"], 0);

    register_user(&app, "a@x.com", "MAT-7", "bob").await;
    let (_, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(body["counts"]["users"], 1);
    assert!(body["counts"]["activities"].as_i64().unwrap() >= 2);
}
