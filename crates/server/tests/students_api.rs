use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;

use migration::MigratorTrait;
use reqwest::{Client, StatusCode};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use server::routes::ServerState;

struct TestApp {
    base_url: String,
    db: DatabaseConnection,
    client: Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, body: Value) -> reqwest::Response {
        self.client.post(self.url("/api/student")).json(&body).send().await.unwrap()
    }

    async fn create_ok(&self, name: &str, email: &str) -> Value {
        let res = self.create(json!({ "name": name, "email": email })).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    start_server_with(opt).await
}

/// Temp-file SQLite behind a multi-connection pool, removed on drop.
struct TempDbFile(PathBuf);

impl TempDbFile {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!("student-records-api-{}-{}.db", std::process::id(), tag));
        let _ = std::fs::remove_file(&path);
        Self(path)
    }

    fn options(&self, max_connections: u32) -> ConnectOptions {
        let mut opt = ConnectOptions::new(format!("sqlite://{}?mode=rwc", self.0.display()));
        opt.max_connections(max_connections).min_connections(1).sqlx_logging(false);
        opt
    }
}

impl Drop for TempDbFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.0.display(), suffix));
        }
    }
}

async fn start_server_with(opt: ConnectOptions) -> anyhow::Result<TestApp> {
    let db = Database::connect(opt).await?;
    migration::Migrator::up(&db, None).await?;

    let app = server::startup::build_app(ServerState::new(db.clone()));
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, db, client: Client::new() })
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    Ok(())
}

#[tokio::test]
async fn create_then_get_returns_record_with_empty_marks() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.create(json!({ "name": "Ana", "email": "ana@x.com", "age": 20 })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created, json!({ "id": id, "name": "Ana", "email": "ana@x.com", "age": 20 }));

    let (status, body) = app.get_json(&format!("/api/student/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": id, "name": "Ana", "email": "ana@x.com", "age": 20, "marks": [] }));
    Ok(())
}

#[tokio::test]
async fn create_assigns_fresh_ids() -> anyhow::Result<()> {
    let app = start_server().await?;
    let a = app.create_ok("Ana", "ana@x.com").await;
    let b = app.create_ok("Bo", "bo@x.com").await;
    assert_ne!(a["id"], b["id"]);
    assert!(b["age"].is_null());
    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_or_blank_fields() -> anyhow::Result<()> {
    let app = start_server().await?;
    for body in [
        json!({ "email": "ana@x.com" }),
        json!({ "name": "Ana" }),
        json!({ "name": "  ", "email": "ana@x.com" }),
        json!({ "name": "Ana", "email": "ana@x.com", "age": -1 }),
    ] {
        let res = app.create(body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: Value = res.json().await?;
        assert!(err["error"].is_string());
    }
    let (_, page) = app.get_json("/api/students-list").await;
    assert_eq!(page["total"], 0);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app
        .client
        .post(app.url("/api/student"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await?;
    assert!(err["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.create_ok("Ana", "ana@x.com").await;
    let res = app.create(json!({ "name": "Other", "email": "ana@x.com" })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let err: Value = res.json().await?;
    assert_eq!(err, json!({ "error": "Email already exists" }));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_creates_yield_one_created() -> anyhow::Result<()> {
    let file = TempDbFile::new("race");
    let app = start_server_with(file.options(4)).await?;

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let client = app.client.clone();
            let url = app.url("/api/student");
            tokio::spawn(async move {
                client.post(url).json(&json!({ "name": format!("S{i}"), "email": "race@x.com" })).send().await
            })
        })
        .collect();
    let mut statuses = Vec::new();
    for task in tasks {
        statuses.push(task.await??.status());
    }
    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!((created, conflicts), (1, 3), "{statuses:?}");
    Ok(())
}

#[tokio::test]
async fn list_on_empty_store() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (status, body) = app.get_json("/api/students-list?page=1&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total": 0, "page": 1, "limit": 10, "totalPages": 0, "students": [] }));
    Ok(())
}

#[tokio::test]
async fn list_second_page_of_one() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.create_ok("Ana", "ana@x.com").await;
    let second = app.create_ok("Bo", "bo@x.com").await;

    let (status, body) = app.get_json("/api/students-list?page=2&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["students"], json!([second]));
    Ok(())
}

#[tokio::test]
async fn list_garbage_params_fall_back_to_defaults() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.create_ok("Ana", "ana@x.com").await;

    let (status, body) = app.get_json("/api/students-list?page=abc&limit=zero").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["students"].as_array().unwrap().len(), 1);

    let (_, body) = app.get_json("/api/students-list?page=-4&limit=-3").await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 1);

    let (_, body) = app.get_json("/api/students-list?page=9").await;
    assert_eq!(body["students"], json!([]));
    assert_eq!(body["totalPages"], 1);
    Ok(())
}

#[tokio::test]
async fn pages_partition_students_by_id() -> anyhow::Result<()> {
    let app = start_server().await?;
    let mut expected = Vec::new();
    for i in 0..7 {
        let s = app.create_ok(&format!("S{i}"), &format!("s{i}@x.com")).await;
        expected.push(s["id"].as_i64().unwrap());
    }

    let (_, first) = app.get_json("/api/students-list?page=1&limit=3").await;
    let total_pages = first["totalPages"].as_u64().unwrap();
    assert_eq!(total_pages, 3);

    let mut seen = Vec::new();
    for page in 1..=total_pages {
        let (_, body) = app.get_json(&format!("/api/students-list?page={page}&limit=3")).await;
        for s in body["students"].as_array().unwrap() {
            seen.push(s["id"].as_i64().unwrap());
        }
    }
    assert_eq!(seen, expected);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 7);
    Ok(())
}

#[tokio::test]
async fn get_unknown_or_non_numeric_id_is_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    for path in ["/api/student/4242", "/api/student/abc"] {
        let (status, body) = app.get_json(path).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Student not found" }));
    }
    Ok(())
}

#[tokio::test]
async fn get_includes_marks_in_id_order() -> anyhow::Result<()> {
    let app = start_server().await?;
    let s = app.create_ok("Ana", "ana@x.com").await;
    let id = s["id"].as_i64().unwrap() as i32;
    let m1 = models::mark::create(&app.db, id, "Math", 91.5).await?;
    let m2 = models::mark::create(&app.db, id, "Art", 70.0).await?;

    let (status, body) = app.get_json(&format!("/api/student/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["marks"],
        json!([
            { "id": m1.id, "subject": "Math", "marks": 91.5 },
            { "id": m2.id, "subject": "Art", "marks": 70.0 },
        ])
    );
    Ok(())
}

#[tokio::test]
async fn update_age_only_keeps_other_fields() -> anyhow::Result<()> {
    let app = start_server().await?;
    let s = app.create_ok("Ana", "ana@x.com").await;
    let id = s["id"].as_i64().unwrap();

    let res = app.client.put(app.url(&format!("/api/student/{id}"))).json(&json!({ "age": 21 })).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated, json!({ "id": id, "name": "Ana", "email": "ana@x.com", "age": 21 }));

    let res = app.client.put(app.url(&format!("/api/student/{id}"))).json(&json!({ "age": null })).send().await?;
    let cleared: Value = res.json().await?;
    assert!(cleared["age"].is_null());
    assert_eq!(cleared["name"], "Ana");
    Ok(())
}

#[tokio::test]
async fn update_failures() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.create_ok("Ana", "ana@x.com").await;
    let bo = app.create_ok("Bo", "bo@x.com").await;
    let bo_url = app.url(&format!("/api/student/{}", bo["id"]));

    let res = app.client.put(app.url("/api/student/4242")).json(&json!({ "age": 3 })).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.client.put(&bo_url).json(&json!({ "email": "ana@x.com" })).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.client.put(&bo_url).json(&json!({ "name": "" })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // unknown id wins over invalid fields
    let res = app.client.put(app.url("/api/student/4242")).json(&json!({ "name": "" })).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (_, body) = app.get_json(&format!("/api/student/{}", bo["id"])).await;
    assert_eq!(body["name"], "Bo");
    assert_eq!(body["email"], "bo@x.com");
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let s = app.create_ok("Ana", "ana@x.com").await;
    let url = app.url(&format!("/api/student/{}", s["id"]));

    let res = app.client.delete(&url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "message": "Deleted", "student": s }));

    let (status, _) = app.get_json(&format!("/api/student/{}", s["id"])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let res = app.client.delete(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (status, doc) = app.get_json("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/students-list"].is_object());
    assert!(doc["paths"]["/api/student/{id}"]["delete"].is_object());
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (status, body) = app.get_json("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    Ok(())
}
