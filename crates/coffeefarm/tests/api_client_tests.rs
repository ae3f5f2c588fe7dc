//! What `ApiClient` puts on the wire, checked against a loopback server.

mod common;

use std::sync::Arc;

use common::http::StubServer;
use common::{farmer, login_reply, photo, user};
use secrecy::SecretString;
use serde_json::json;

use coffeefarm::models::{
    AnalysisUpload, CreateFarmer, EnrollmentImages, FaceAngle, Farmer, FarmerQuery, Gender,
};
use coffeefarm::screens::AddFarmerScreen;
use coffeefarm::{ApiError, Tag, TagKind};

fn quality_reply() -> String {
    json!({
        "face_detected": true,
        "quality_score": 0.91
    })
    .to_string()
}

fn new_farmer() -> CreateFarmer {
    CreateFarmer {
        farmer_code: "FC-9".to_string(),
        full_name: "Le Van Minh".to_string(),
        phone: None,
        date_of_birth: None,
        gender: Gender::Male,
        address: None,
        farm_id: "farm_1".to_string(),
    }
}

#[tokio::test]
async fn login_posts_a_password_form_without_authorization() {
    let mut server = StubServer::start(vec![(200, login_reply().to_string())]).await;
    let client = server.client();

    let reply = client
        .login("manager@farm.vn", &SecretString::from("s3cret"))
        .await
        .unwrap();
    assert_eq!(reply.user.name, "Tran Thi Lan");

    let request = server.next_request().await;
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/api/v1/auth/login");
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    let body = request.text();
    assert!(body.contains("username=manager%40farm.vn"), "{}", body);
    assert!(body.contains("password=s3cret"), "{}", body);
    assert_eq!(request.header("authorization"), None);
}

#[tokio::test]
async fn requests_carry_the_bearer_token_once_logged_in() {
    let mut server = StubServer::start(vec![(200, "[]".to_string())]).await;
    let client = server.client();
    client
        .session()
        .login(user(), SecretString::from("tok-123"));

    let farmers = client.list_farmers(&FarmerQuery::default()).await.unwrap();
    assert!(farmers.is_empty());

    let request = server.next_request().await;
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/api/v1/farmers/");
    assert_eq!(request.header("authorization"), Some("Bearer tok-123"));
}

#[tokio::test]
async fn enrollment_sends_farmer_id_and_three_images() {
    let reply = json!({ "success": true, "message": "ok", "farmer_id": "f1" });
    let mut server = StubServer::start(vec![(200, reply.to_string())]).await;
    let client = server.client();

    let images = EnrollmentImages {
        front: photo("front").to_data_uri(),
        left: photo("left").to_data_uri(),
        right: photo("right").to_data_uri(),
    };
    let response = client.enroll_face("f1", &images).await.unwrap();
    assert!(response.success);

    let request = server.next_request().await;
    assert_eq!(request.target, "/api/v1/face/enroll");
    let body = request.json();
    assert_eq!(body["farmer_id"], "f1");
    for angle in ["front", "left", "right"] {
        let uri = body["images"][angle].as_str().unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"), "{}: {}", angle, uri);
    }
    assert_eq!(body["images"]["left"], json!(images.left));
}

#[tokio::test]
async fn quality_check_sends_the_expected_angle() {
    let mut server = StubServer::start(vec![(200, quality_reply())]).await;
    let client = server.client();

    client
        .check_face_quality(&photo("left"), Some(FaceAngle::Left))
        .await
        .unwrap();

    let request = server.next_request().await;
    assert_eq!(request.target, "/api/v1/face/quality-json");
    let body = request.json();
    assert_eq!(body["expected_angle"], "left");
    assert!(body["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn analysis_upload_is_multipart_with_form_fields() {
    let reply = json!({
        "id": "b1",
        "analysis": { "total_beans": 10, "good_beans": 9, "quality_score": 90.0 }
    });
    let mut server = StubServer::start(vec![(200, reply.to_string())]).await;
    let client = server.client();
    let upload = AnalysisUpload {
        farm_id: "farm_7".to_string(),
        field_id: "field_3".to_string(),
        notes: "north slope".to_string(),
    };

    let analysis = client.analyze_beans(&photo("beans"), &upload).await.unwrap();
    assert_eq!(analysis.id, "b1");

    let request = server.next_request().await;
    assert_eq!(request.target, "/api/v1/coffee-beans/analyze");
    assert!(request
        .header("content-type")
        .unwrap_or_default()
        .starts_with("multipart/form-data"));
    let body = request.text();
    assert!(body.contains(r#"name="file"; filename="beans.jpg""#), "{}", body);
    assert!(body.contains("Content-Type: image/jpeg"), "{}", body);
    for (name, value) in [
        ("farm_id", "farm_7"),
        ("field_id", "field_3"),
        ("notes", "north slope"),
    ] {
        let field = format!("name=\"{}\"\r\n\r\n{}\r\n", name, value);
        assert!(body.contains(&field), "missing {}: {}", name, body);
    }
}

#[tokio::test]
async fn only_a_successful_mutation_invalidates_the_cache() {
    let mut server = StubServer::start(vec![
        (400, json!({ "detail": "Farmer code already exists" }).to_string()),
        (201, farmer("f9", "Le Van Minh", false).to_string()),
    ])
    .await;
    let client = server.client();
    let cached: Vec<Farmer> =
        serde_json::from_value(json!([farmer("f1", "Nguyen Van A", true)])).unwrap();
    client.cache().insert(
        "GET /farmers/",
        &cached,
        vec![Tag::entity(TagKind::Farmer, "f1"), Tag::list(TagKind::Farmer)],
    );

    let err = client.create_farmer(&new_farmer()).await.unwrap_err();
    assert!(matches!(
        &err,
        ApiError::Rejected { status: 400, detail: Some(d) } if d == "Farmer code already exists"
    ));
    assert!(client.cache().contains("GET /farmers/"));
    server.next_request().await;

    let created = client.create_farmer(&new_farmer()).await.unwrap();
    assert_eq!(created.id, "f9");
    assert!(!client.cache().contains("GET /farmers/"));

    let request = server.next_request().await;
    assert_eq!(request.method, "POST");
    assert_eq!(request.json()["farmer_code"], "FC-9");
}

#[tokio::test]
async fn error_pages_fall_back_to_the_screen_message() {
    let server = StubServer::start(vec![
        (502, "<html><body>502 Bad Gateway</body></html>".to_string()),
        (500, String::new()),
    ])
    .await;
    let client = Arc::new(server.client());

    for _ in 0..2 {
        let mut screen = AddFarmerScreen::new(client.clone(), "farm_1");
        screen.form.farmer_code = "FC-9".to_string();
        screen.form.full_name = "Le Van Minh".to_string();

        let err = screen.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to create farmer");
        assert!(matches!(
            err.api_error(),
            Some(ApiError::Rejected { detail: None, .. })
        ));
    }
}
