//! Suites run against a local mock of dog.ceo and Swagger Petstore
//!
//! The blocking client must not run on a tokio worker, so every suite run
//! happens inside `spawn_blocking`.

use std::path::Path;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use restcheck_core::{Config, Outcome, ReportDocument, SuiteSummary};
use restcheck_runner::{ApiClient, SuiteKind, run_suite};

fn config_for(server: &MockServer, report_dir: &Path) -> Config {
    let mut config = Config::default();
    config.report_dir = report_dir.to_path_buf();
    config.tester = "ci".to_string();
    config.dog.base_url = format!("{}/api", server.uri());
    config.petstore.base_url = format!("{}/v2", server.uri());
    config
}

async fn run(kind: SuiteKind, config: Config) -> SuiteSummary {
    tokio::task::spawn_blocking(move || {
        let client = ApiClient::new(Duration::from_secs(5)).unwrap();
        run_suite(kind, &client, &config).unwrap()
    })
    .await
    .unwrap()
}

fn dog_envelope(message: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "success", "message": message}))
}

async fn mount_dog(server: &MockServer, breeds: Value) {
    Mock::given(method("GET"))
        .and(path("/api/breed/hound/images/random"))
        .respond_with(dog_envelope(json!(
            "https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg"
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/breeds/list/all"))
        .respond_with(dog_envelope(breeds))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/breed/bulldog/list"))
        .respond_with(dog_envelope(json!(["boston", "english"])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/breed/bulldog/[a-z]+/images$"))
        .respond_with(dog_envelope(json!(["a.jpg", "b.jpg", "c.jpg"])))
        .expect(2)
        .mount(server)
        .await;
}

fn read_document(path: &Path) -> ReportDocument {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn dog_suite_passes_against_conforming_api() {
    let server = MockServer::start().await;
    mount_dog(&server, json!({"bulldog": ["boston", "english"], "hound": []})).await;
    let dir = tempfile::tempdir().unwrap();

    let summary = run(SuiteKind::Dog, config_for(&server, dir.path())).await;

    assert_eq!(summary.suite, "dog");
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.failed(), 0, "{:?}", summary.cases);

    let html = dir.path().join("TestDogApi_report.html");
    assert_eq!(summary.report.as_deref(), Some(html.display().to_string().as_str()));
    let page = std::fs::read_to_string(&html).unwrap();
    assert!(page.contains("TestCase: retrieve_all_sub_breeds_and_their_images"));

    let doc = read_document(&dir.path().join("TestDogApi_report.json"));
    assert_eq!(doc.summary.total, 3);
    assert_eq!(doc.summary.failed, 0);
    let sub_breeds = &doc.entries[2];
    assert!(
        sub_breeds
            .lines
            .iter()
            .any(|l| l.message == "english bulldog: 3 images")
    );
    let image_lines: Vec<_> = sub_breeds
        .lines
        .iter()
        .filter(|l| l.outcome == Outcome::Info && l.message.starts_with("image src = "))
        .map(|l| l.message.as_str())
        .collect();
    assert_eq!(image_lines.len(), 6);
    assert_eq!(image_lines[0], "image src = a.jpg");
    assert!(page.contains("image src = c.jpg"));
}

#[tokio::test]
async fn missing_breed_fails_only_that_case() {
    let server = MockServer::start().await;
    mount_dog(&server, json!({"hound": ["afghan"]})).await;
    let dir = tempfile::tempdir().unwrap();

    let summary = run(SuiteKind::Dog, config_for(&server, dir.path())).await;

    let failed: Vec<_> = summary.failures().map(|c| c.name.as_str()).collect();
    assert_eq!(failed, ["bulldog_is_on_the_list_of_breeds"]);

    let doc = read_document(&dir.path().join("TestDogApi_report.json"));
    let base = server.uri();
    let lines = doc.entries[1]
        .lines
        .iter()
        .map(|l| format!("{}: {}", l.outcome, l.message.replace(&base, "{base}")))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(lines, @r#"
    info: GET {base}/api/breeds/list/all
    pass: status code is 200
    pass: status line is 'HTTP/1.1 200 OK'
    pass: content type is 'application/json'
    pass: body has key 'status'
    pass: body has key 'message'
    pass: 'status' is "success"
    fail: bulldog is not on the list of breeds
    "#);
}

#[tokio::test]
async fn dog_error_envelope_fails_validation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"status": "error", "message": "Breed not found", "code": 404})),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let summary = run(SuiteKind::Dog, config_for(&server, dir.path())).await;

    assert_eq!(summary.failed(), 3);
    assert_eq!(
        summary.cases[0].message.as_deref(),
        Some("expected status code 200, got 404")
    );
}

fn echo_with_id(id: i64) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    move |req: &Request| {
        let mut pet: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);
        pet["id"] = json!(id);
        ResponseTemplate::new(200).set_body_json(pet)
    }
}

async fn mount_listing(server: &MockServer, category_id: i64) {
    Mock::given(method("GET"))
        .and(path("/v2/pet/findByStatus"))
        .and(query_param("status", "available"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "rex", "photoUrls": [], "tags": []},
            {"id": 2, "name": "doggie", "category": {"id": category_id, "name": "dogs"}, "photoUrls": [], "tags": []},
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn petstore_created_pet_is_retrievable_by_id() {
    let server = MockServer::start().await;
    mount_listing(&server, 12).await;
    Mock::given(method("POST"))
        .and(path("/v2/pet"))
        .respond_with(echo_with_id(9001))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/pet/9001"))
        .respond_with(move |_: &Request| {
            ResponseTemplate::new(200).set_body_json(json!({"id": 9001, "name": "placeholder"}))
        })
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let summary = run(SuiteKind::Petstore, config_for(&server, dir.path())).await;

    let names: Vec<_> = summary.cases.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "retrieve_all_available_pets",
            "add_a_new_pet",
            "retrieve_the_created_pet"
        ]
    );
    assert!(summary.cases[0].passed, "{:?}", summary.cases[0]);
    assert!(summary.cases[1].passed, "{:?}", summary.cases[1]);

    // the GET mock does not echo the generated name
    let lookup = &summary.cases[2];
    assert!(!lookup.passed);
    assert!(lookup.message.as_deref().unwrap().starts_with("expected name \"restcheck-"));

    let doc = read_document(&dir.path().join("TestPetStoreSwaggerApi_report.json"));
    assert!(
        doc.entries[2]
            .lines
            .iter()
            .any(|l| l.message == "Pet 9001 retrieved")
    );
}

#[tokio::test]
async fn petstore_wrong_category_and_no_created_pet() {
    let server = MockServer::start().await;
    mount_listing(&server, 120).await;
    Mock::given(method("POST"))
        .and(path("/v2/pet"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"code": 500})))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let summary = run(SuiteKind::Petstore, config_for(&server, dir.path())).await;

    assert_eq!(summary.failed(), 3);
    assert_eq!(
        summary.cases[0].message.as_deref(),
        Some("Pet doggie with category id 12 was not found!")
    );
    assert_eq!(
        summary.cases[1].message.as_deref(),
        Some("expected status code 200, got 500")
    );
    assert_eq!(
        summary.cases[2].message.as_deref(),
        Some("Missing prerequisite: no pet was created by add_a_new_pet")
    );
}

#[tokio::test]
async fn report_is_written_even_when_service_is_down() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(&server, dir.path());
    // nothing listens on port 9 of localhost
    config.dog.base_url = "http://127.0.0.1:9/api".to_string();

    let summary = run(SuiteKind::Dog, config).await;

    assert_eq!(summary.failed(), 3);
    assert!(
        summary.cases[0]
            .message
            .as_deref()
            .unwrap()
            .starts_with("HTTP error: GET http://127.0.0.1:9/api/breed/hound/images/random")
    );
    assert!(dir.path().join("TestDogApi_report.html").exists());
}
