use chrono::{Duration as ChronoDuration, Utc};
use edudesk_api::config::AppConfig;
use edudesk_auth::LongTokenClaims;
use edudesk_core::{SchoolId, UserId};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

const SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, seeded with the dev super admin, on an ephemeral port.
        let config = AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .expect("valid test config");
        let app = edudesk_api::app::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_token(secret: &str, role: &str, school_id: Option<SchoolId>) -> String {
    let now = Utc::now();
    let claims = LongTokenClaims {
        user_id: UserId::new(),
        role: role.to_string(),
        school_id,
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn school_body(name: &str) -> Value {
    json!({
        "name": name,
        "address": {
            "street": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zipCode": "62701"
        }
    })
}

async fn send_json(req: reqwest::RequestBuilder) -> (StatusCode, Value) {
    let res = req.send().await.unwrap();
    let status = res.status();
    let body = res.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

async fn login(client: &reqwest::Client, srv: &TestServer, username: &str, password: &str) -> (StatusCode, Value) {
    send_json(
        client
            .post(srv.url("/api/user/login"))
            .json(&json!({ "username": username, "password": password })),
    )
    .await
}

async fn create_school(client: &reqwest::Client, srv: &TestServer, token: &str, name: &str) -> String {
    let (status, body) = send_json(
        client
            .post(srv.url("/api/school/create"))
            .header("token", token)
            .json(&school_body(name)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["school"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = send_json(client.get(srv.url("/api/school/getAll"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "ok": false, "code": 401, "errors": "unauthorized" }));
}

#[tokio::test]
async fn bad_tokens_are_indistinguishable() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let forged = mint_token("another-secret", "superAdmin", None);
    let (s1, b1) = send_json(
        client
            .get(srv.url("/api/school/getAll"))
            .header("token", forged),
    )
    .await;
    let (s2, b2) = send_json(
        client
            .get(srv.url("/api/school/getAll"))
            .header("token", "not-a-jwt"),
    )
    .await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(b1, b2);
    assert_eq!(b1["errors"], "unauthorized");
}

#[tokio::test]
async fn gate_messages_name_role_and_operation() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let student = mint_token(SECRET, "student", Some(SchoolId::new()));
    let (status, body) = send_json(
        client
            .delete(srv.url("/api/classroom/delete?id=whatever"))
            .header("token", student),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errors"], "unauthorized to access classroom:delete from student");

    let parent = mint_token(SECRET, "parent", None);
    let (status, body) = send_json(
        client
            .get(srv.url("/api/school/getAll"))
            .header("token", parent),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errors"], "unauthorized to get permissions for parent");

    let school_admin = mint_token(SECRET, "schoolAdmin", Some(SchoolId::new()));
    let (status, body) = send_json(
        client
            .post(srv.url("/api/user/createUser"))
            .header("token", school_admin)
            .json(&json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errors"], "unauthorized to access user:createUser from schoolAdmin");
}

#[tokio::test]
async fn seeded_super_admin_can_log_in_and_manage_schools() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = login(&client, &srv, "superadmin", "test").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["user"]["role"], "superAdmin");
    let token = body["data"]["longToken"].as_str().unwrap().to_string();

    let id = create_school(&client, &srv, &token, "Oak Hill").await;

    let (status, body) = send_json(
        client
            .get(srv.url(&format!("/api/school/getByID?id={id}")))
            .header("token", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["school"]["name"], "Oak Hill");
    assert_eq!(body["data"]["school"]["address"]["zipCode"], "62701");

    let (status, body) = send_json(
        client
            .post(srv.url("/api/school/create"))
            .header("token", &token)
            .json(&school_body("Oak Hill")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "school already exists", "status": 409, "ok": false }));

    let (status, body) = login(&client, &srv, "superadmin", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid password");
}

#[tokio::test]
async fn school_admin_cannot_create_classroom_for_another_school() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let root = mint_token(SECRET, "superAdmin", None);
    let s1 = create_school(&client, &srv, &root, "S1").await;
    let s2 = create_school(&client, &srv, &root, "S2").await;

    let admin = mint_token(SECRET, "schoolAdmin", Some(s1.parse().unwrap()));
    let (status, body) = send_json(
        client
            .post(srv.url("/api/classroom/create"))
            .header("token", admin)
            .json(&json!({ "name": "7B", "capacity": 30, "schoolId": s2 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized", "status": 401, "ok": false }));
}

#[tokio::test]
async fn classroom_for_unknown_school_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let root = mint_token(SECRET, "superAdmin", None);
    let (status, body) = send_json(
        client
            .post(srv.url("/api/classroom/create"))
            .header("token", root)
            .json(&json!({ "name": "7B", "capacity": 30, "schoolId": SchoolId::new().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "school not found", "status": 404, "ok": false }));
}

#[tokio::test]
async fn classroom_with_students_cannot_be_deleted() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let root = mint_token(SECRET, "superAdmin", None);
    let school = create_school(&client, &srv, &root, "S").await;
    let admin = mint_token(SECRET, "schoolAdmin", Some(school.parse().unwrap()));

    let (status, body) = send_json(
        client
            .post(srv.url("/api/classroom/create"))
            .header("token", &admin)
            .json(&json!({ "name": "1A", "capacity": 25, "schoolId": school })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let classroom = body["data"]["classroom"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        client
            .post(srv.url("/api/student/create"))
            .header("token", &admin)
            .json(&json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "classroomId": classroom,
                "schoolId": school,
                "email": "ada@example.com",
                "username": "ada",
                "password": "secret"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = send_json(
        client
            .delete(srv.url(&format!("/api/classroom/delete?id={classroom}")))
            .header("token", &admin),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({ "error": "classroom has students, cannot delete", "status": 409, "ok": false })
    );

    // The student can log in and read its own classroom.
    let (status, body) = login(&client, &srv, "ada", "secret").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user"]["role"], "student");
    let student_token = body["data"]["longToken"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        client
            .get(srv.url(&format!("/api/classroom/getByID?id={classroom}")))
            .header("token", student_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["classroom"]["name"], "1A");
}

#[tokio::test]
async fn created_school_admin_is_scoped_to_its_school() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let root = mint_token(SECRET, "superAdmin", None);
    let own = create_school(&client, &srv, &root, "Own").await;
    let other = create_school(&client, &srv, &root, "Other").await;

    let (status, body) = send_json(
        client
            .post(srv.url("/api/user/createUser"))
            .header("token", &root)
            .json(&json!({
                "username": "principal",
                "email": "principal@own.edu",
                "password": "hunter22",
                "role": "schoolAdmin",
                "schoolId": own
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user"]["schoolId"], own.as_str());
    let token = body["data"]["longToken"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        client
            .get(srv.url(&format!("/api/school/getByID?id={own}")))
            .header("token", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        client
            .get(srv.url(&format!("/api/school/getByID?id={other}")))
            .header("token", &token),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, body) = send_json(
        client
            .get(srv.url("/api/school/getAll"))
            .header("token", &token),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errors"], "unauthorized to access school:getAll from schoolAdmin");
}

#[tokio::test]
async fn validation_failures_are_reported_together() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let root = mint_token(SECRET, "superAdmin", None);

    let (status, body) = send_json(
        client
            .post(srv.url("/api/classroom/create"))
            .header("token", &root)
            .json(&json!({ "capacity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "name is required; capacity must be between 1 and 10000; schoolId is required"
    );
    assert_eq!(body["ok"], false);

    let (status, body) = send_json(
        client
            .post(srv.url("/api/school/create"))
            .header("token", &root)
            .header("content-type", "application/json")
            .body("{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn school_delete_accepts_id_in_body() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(SECRET, "superAdmin", None);

    let id = create_school(&client, &srv, &token, "Birch Lane").await;

    let (status, body) = send_json(
        client
            .delete(srv.url("/api/school/delete"))
            .header("token", &token)
            .json(&json!({ "id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["school"]["id"], id.as_str());

    let (status, _) = send_json(
        client
            .get(srv.url(&format!("/api/school/getByID?id={id}")))
            .header("token", &token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreadable_query_uses_error_envelope() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(SECRET, "superAdmin", None);

    for path in [
        "/api/school/getByID?id=a&id=b",
        "/api/classroom/getByID?id=a&id=b",
        "/api/student/getByID?id=a&id=b",
    ] {
        let (status, body) = send_json(client.get(srv.url(path)).header("token", &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(body["ok"], false, "{path}: {body}");
        assert_eq!(body["status"], 400);
        assert!(body["error"].is_string());
    }

    let (status, body) = send_json(
        client
            .delete(srv.url("/api/classroom/delete?id=a&id=b"))
            .header("token", &token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
}
