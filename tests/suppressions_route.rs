use std::sync::Arc;

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use rocket::serde::json::json;
use suppression_admin::routes::suppressions::RemoveResponse;
use suppression_admin::suppression::{MAX_PAGE_SIZE, SuppressionCache};
use suppression_admin::test_support::{StaticDirectory, TestRocketBuilder};

async fn client_with(directory: &StaticDirectory) -> Client {
    let cache = SuppressionCache::new(Arc::new(directory.clone()), MAX_PAGE_SIZE);
    cache.refresh().await.expect("refresh succeeds");
    TestRocketBuilder::new()
        .manage_cache(cache)
        .async_client()
        .await
}

async fn list(client: &Client) -> Vec<String> {
    let response = client.get("/list").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    response.into_json().await.expect("JSON array")
}

async fn remove(client: &Client, emails: &str) -> RemoveResponse {
    let response = client
        .post("/remove")
        .header(ContentType::JSON)
        .body(json!({ "emails": emails }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    response.into_json().await.expect("JSON response")
}

#[tokio::test]
async fn list_returns_sorted_snapshot() {
    let directory =
        StaticDirectory::with_pages(vec![vec!["b@x.com", "A@x.com"], vec!["c@x.com"], vec![]]);
    let client = client_with(&directory).await;

    assert_eq!(list(&client).await, vec!["A@x.com", "b@x.com", "c@x.com"]);
}

#[tokio::test]
async fn update_refetches_remote_list() {
    let directory = StaticDirectory::with_pages(vec![vec!["a@x.com"]]);
    let client = TestRocketBuilder::new()
        .with_directory(directory.clone())
        .async_client()
        .await;

    assert!(list(&client).await.is_empty());

    directory.set_pages(vec![vec!["z@x.com", "Y@x.com"], vec!["a@x.com"]]);
    let response = client.post("/update").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Vec<String> = response.into_json().await.expect("JSON array");
    assert_eq!(body, vec!["a@x.com", "Y@x.com", "z@x.com"]);
    assert_eq!(list(&client).await, body);
}

#[tokio::test]
async fn failed_update_returns_500_and_keeps_cache() {
    let directory = StaticDirectory::with_pages(vec![vec!["a@x.com"], vec!["b@x.com"]]);
    let client = client_with(&directory).await;

    directory.set_pages(vec![vec!["new@x.com"], vec!["other@x.com"]]);
    directory.fail_listing_at(1);

    let response = client.post("/update").dispatch().await;
    assert_eq!(response.status(), Status::InternalServerError);
    assert_eq!(response.content_type(), Some(ContentType::Plain));
    let body = response.into_string().await.expect("error body");
    assert!(body.contains("simulated outage"));

    assert_eq!(list(&client).await, vec!["a@x.com", "b@x.com"]);
}

#[tokio::test]
async fn remove_reports_each_address() {
    let directory = StaticDirectory::with_pages(vec![vec!["A@x.com", "keep@x.com"]]);
    let client = client_with(&directory).await;

    let body = remove(&client, "a@x.com\nnotthere@x.com\n").await;
    assert_eq!(
        body.results,
        vec!["removed: A@x.com", "not found: notthere@x.com"]
    );
    assert_eq!(directory.deleted(), vec!["A@x.com"]);
    assert_eq!(list(&client).await, vec!["keep@x.com"]);
}

#[tokio::test]
async fn remove_response_wire_shape() {
    let directory = StaticDirectory::with_pages(vec![vec!["A@x.com"]]);
    let client = client_with(&directory).await;

    let response = client
        .post("/remove")
        .header(ContentType::JSON)
        .body(r#"{"emails":"a@x.com\nnotthere@x.com\n"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::JSON));

    let raw = response.into_string().await.expect("response body");
    let body: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(
        body,
        serde_json::json!({"results": ["removed: A@x.com", "not found: notthere@x.com"]})
    );
}

#[tokio::test]
async fn remove_twice_is_not_found_the_second_time() {
    let directory = StaticDirectory::with_pages(vec![vec!["Foo@Bar.com"]]);
    let client = client_with(&directory).await;

    let first = remove(&client, "foo@bar.com").await;
    assert_eq!(first.results, vec!["removed: Foo@Bar.com"]);

    let second = remove(&client, "  foo@bar.com  ").await;
    assert_eq!(second.results, vec!["not found: foo@bar.com"]);
}

#[tokio::test]
async fn partial_failure_is_reported_per_address() {
    let directory = StaticDirectory::with_pages(vec![vec!["bad@x.com", "good@x.com"]]);
    directory.fail_delete_for("bad@x.com");
    let client = client_with(&directory).await;

    let body = remove(&client, "bad@x.com\ngood@x.com").await;
    assert_eq!(body.results.len(), 2);
    assert!(body.results[0].starts_with("error: bad@x.com ("));
    assert!(body.results[0].contains("simulated delete failure"));
    assert_eq!(body.results[1], "removed: good@x.com");

    assert_eq!(list(&client).await, vec!["bad@x.com"]);
}

#[tokio::test]
async fn blank_removal_body_yields_empty_results() {
    let directory = StaticDirectory::with_pages(vec![vec!["a@x.com"]]);
    let client = client_with(&directory).await;

    let body = remove(&client, "\n   \n").await;
    assert!(body.results.is_empty());
    assert!(directory.deleted().is_empty());
}

#[tokio::test]
async fn malformed_remove_body_is_rejected() {
    let directory = StaticDirectory::with_pages(vec![vec!["a@x.com"]]);
    let client = client_with(&directory).await;

    let response = client
        .post("/remove")
        .header(ContentType::JSON)
        .body("{not json")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(list(&client).await, vec!["a@x.com"]);
}

#[test]
fn non_post_methods_are_rejected() {
    let client = TestRocketBuilder::new().blocking_client();

    for path in ["/update", "/remove"] {
        let response = client.get(path).dispatch();
        assert_eq!(response.status(), Status::MethodNotAllowed);
        assert_eq!(response.into_string().as_deref(), Some("POST required"));

        assert_eq!(client.put(path).dispatch().status(), Status::MethodNotAllowed);
        assert_eq!(client.delete(path).dispatch().status(), Status::MethodNotAllowed);
        assert_eq!(client.patch(path).dispatch().status(), Status::MethodNotAllowed);
        assert_eq!(client.options(path).dispatch().status(), Status::MethodNotAllowed);
        assert_eq!(client.head(path).dispatch().status(), Status::MethodNotAllowed);
    }
}

#[test]
fn index_serves_html_page() {
    let client = TestRocketBuilder::new().blocking_client();

    let response = client.get("/").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::HTML));
    let body = response.into_string().expect("page body");
    assert!(body.contains("Suppression List"));
}
