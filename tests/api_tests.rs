//! API integration tests
//!
//! These run against a live server and document store.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8000/api/v1";

/// Unique suffix so repeated runs don't trip the uniqueness constraints
fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_author(client: &Client, name: &str) -> String {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send create author request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No author ID").to_string()
}

async fn create_category(client: &Client, name: &str) -> String {
    let response = client
        .post(format!("{}/categories", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send create category request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No category ID").to_string()
}

async fn delete_resource(client: &Client, resource: &str, id: &str) {
    let response = client
        .delete(format!("{}/{}/{}", BASE_URL, resource, id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);
}

async fn count_books(client: &Client, isbn: &str) -> usize {
    let response = client
        .get(format!("{}/books?isbn={}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send list request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    body.as_array().expect("Expected array body").len()
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_author_create_get_round_trip() {
    let client = Client::new();
    let name = format!("Round Trip Author {}", unique_suffix());

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({
            "name": name,
            "biography": "Wrote exactly one book",
            "birth_date": "1920-10-08",
            "nationality": "American"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_str().expect("No author ID");
    assert!(!id.is_empty());
    assert!(created["created_at"].is_string());

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["name"], name);
    assert_eq!(fetched["biography"], "Wrote exactly one book");
    assert_eq!(fetched["birth_date"], "1920-10-08");
    assert_eq!(fetched["nationality"], "American");

    delete_resource(&client, "authors", id).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_then_get_is_not_found() {
    let client = Client::new();
    let id = create_author(&client, &format!("Ephemeral Author {}", unique_suffix())).await;

    delete_resource(&client, "authors", &id).await;

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "not_found");

    // Repeated delete is a miss, not a silent success
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_book_with_dangling_author_is_rejected() {
    let client = Client::new();
    let suffix = unique_suffix();
    let category_id = create_category(&client, &format!("Dangling Cat {}", suffix)).await;
    let isbn = format!("dangling-{}", suffix);

    let before = count_books(&client, &isbn).await;

    // Well-formed but nonexistent author id
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Orphan",
            "isbn": isbn,
            "year": 2001,
            "author_id": "507f1f77bcf86cd799439011",
            "category_id": category_id,
            "stock": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "invalid_reference");

    // Nothing was persisted
    assert_eq!(count_books(&client, &isbn).await, before);

    delete_resource(&client, "categories", &category_id).await;
}

#[tokio::test]
#[ignore]
async fn test_validation_reports_every_failing_field() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "",
            "isbn": "",
            "year": 0,
            "author_id": "507f1f77bcf86cd799439011",
            "category_id": "507f1f77bcf86cd799439012",
            "stock": -1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "validation_error");

    let details = body["details"].as_array().expect("Expected field details");
    let fields: Vec<&str> = details
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"isbn"));
    assert!(fields.contains(&"year"));
    assert!(fields.contains(&"stock"));
}

#[tokio::test]
#[ignore]
async fn test_list_pagination_traverses_without_duplication() {
    let client = Client::new();
    let suffix = unique_suffix();
    let nationality = format!("Paginationland-{}", suffix);

    let mut created = Vec::new();
    for i in 0..5 {
        let response = client
            .post(format!("{}/authors", BASE_URL))
            .json(&json!({
                "name": format!("Pagination Author {} {}", i, suffix),
                "nationality": nationality
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.expect("Failed to parse response");
        created.push(body["id"].as_str().unwrap().to_string());
    }

    // limit=2 over 5 records: pages of 2, 2, 1
    let mut seen = Vec::new();
    for offset in [0, 2, 4] {
        let response = client
            .get(format!(
                "{}/authors?nationality={}&limit=2&offset={}",
                BASE_URL, nationality, offset
            ))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 200);
        let page: Value = response.json().await.expect("Failed to parse response");
        let page = page.as_array().expect("Expected array body");
        let expected_len = if offset == 4 { 1 } else { 2 };
        assert_eq!(page.len(), expected_len);
        for item in page {
            seen.push(item["id"].as_str().unwrap().to_string());
        }
    }

    let mut expected = created.clone();
    expected.sort();
    let mut traversed = seen.clone();
    traversed.sort();
    assert_eq!(traversed, expected);

    for id in &created {
        delete_resource(&client, "authors", id).await;
    }
}

#[tokio::test]
#[ignore]
async fn test_list_rejects_out_of_range_limit() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?limit=101", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
#[ignore]
async fn test_invalid_update_leaves_record_unchanged() {
    let client = Client::new();
    let suffix = unique_suffix();
    let author_id = create_author(&client, &format!("Stable Author {}", suffix)).await;
    let category_id = create_category(&client, &format!("Stable Cat {}", suffix)).await;
    let isbn = format!("stable-{}", suffix);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Stable",
            "isbn": isbn,
            "year": 1999,
            "author_id": author_id,
            "category_id": category_id,
            "stock": 7
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    let book_id = created["id"].as_str().unwrap().to_string();

    // Negative stock count must be rejected
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .json(&json!({
            "title": "Stable",
            "isbn": isbn,
            "year": 1999,
            "author_id": author_id,
            "category_id": category_id,
            "stock": -3
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "validation_error");

    // Stored record is untouched
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["stock"], 7);
    assert_eq!(fetched["title"], "Stable");

    delete_resource(&client, "books", &book_id).await;
    delete_resource(&client, "authors", &author_id).await;
    delete_resource(&client, "categories", &category_id).await;
}

#[tokio::test]
#[ignore]
async fn test_book_lifecycle_scenario() {
    let client = Client::new();
    let suffix = unique_suffix();
    let author_id = create_author(&client, &format!("Frank Herbert {}", suffix)).await;
    let category_id = create_category(&client, &format!("Science Fiction {}", suffix)).await;
    let isbn = format!("123-{}", suffix);

    // Create
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Dune",
            "isbn": isbn,
            "year": 1965,
            "author_id": author_id,
            "category_id": category_id,
            "stock": 3
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    let book_id = created["id"].as_str().expect("No book ID").to_string();
    assert!(!book_id.is_empty());

    // Read back the same fields
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["title"], "Dune");
    assert_eq!(fetched["year"], 1965);
    assert_eq!(fetched["author_id"], author_id.as_str());
    assert_eq!(fetched["category_id"], category_id.as_str());
    assert_eq!(fetched["stock"], 3);

    // Delete, then the identifier no longer resolves
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    delete_resource(&client, "authors", &author_id).await;
    delete_resource(&client, "categories", &category_id).await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_is_conflict() {
    let client = Client::new();
    let suffix = unique_suffix();
    let author_id = create_author(&client, &format!("Dup Author {}", suffix)).await;
    let category_id = create_category(&client, &format!("Dup Cat {}", suffix)).await;
    // Separators are stripped, so these two collide
    let isbn = format!("97801{}", suffix % 100_000_000);
    let spaced_isbn = format!("9-7801 {}", suffix % 100_000_000);

    let book = json!({
        "title": "First",
        "isbn": isbn,
        "year": 2000,
        "author_id": author_id,
        "category_id": category_id,
        "stock": 1
    });

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    let book_id = created["id"].as_str().unwrap().to_string();

    let mut duplicate = book.clone();
    duplicate["isbn"] = json!(spaced_isbn);
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&duplicate)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "duplicate");

    delete_resource(&client, "books", &book_id).await;
    delete_resource(&client, "authors", &author_id).await;
    delete_resource(&client, "categories", &category_id).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_referenced_author_is_conflict() {
    let client = Client::new();
    let suffix = unique_suffix();
    let author_id = create_author(&client, &format!("Referenced Author {}", suffix)).await;
    let category_id = create_category(&client, &format!("Referenced Cat {}", suffix)).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Holding a Reference",
            "isbn": format!("ref-{}", suffix),
            "year": 2010,
            "author_id": author_id,
            "category_id": category_id,
            "stock": 2
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    let book_id = created["id"].as_str().unwrap().to_string();

    // Both the author and the category are protected while the book exists
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "reference_conflict");

    let response = client
        .delete(format!("{}/categories/{}", BASE_URL, category_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    delete_resource(&client, "books", &book_id).await;
    delete_resource(&client, "authors", &author_id).await;
    delete_resource(&client, "categories", &category_id).await;
}

#[tokio::test]
#[ignore]
async fn test_title_filter_is_case_insensitive_substring() {
    let client = Client::new();
    let suffix = unique_suffix();
    let author_id = create_author(&client, &format!("Filter Author {}", suffix)).await;
    let category_id = create_category(&client, &format!("Filter Cat {}", suffix)).await;
    let marker = format!("Xyzzy{}", suffix);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": format!("The {} Chronicles", marker),
            "isbn": format!("filter-{}", suffix),
            "year": 2020,
            "author_id": author_id,
            "category_id": category_id,
            "stock": 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    let book_id = created["id"].as_str().unwrap().to_string();

    let response = client
        .get(format!(
            "{}/books?title={}",
            BASE_URL,
            marker.to_lowercase()
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    let items = body.as_array().expect("Expected array body");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], book_id.as_str());

    delete_resource(&client, "books", &book_id).await;
    delete_resource(&client, "authors", &author_id).await;
    delete_resource(&client, "categories", &category_id).await;
}
