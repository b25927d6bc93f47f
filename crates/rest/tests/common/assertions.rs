//! HTTP response assertions.
//!
//! Provides assertion utilities for testing HTTP responses.

use axum_test::TestResponse;
use regex::Regex;
use serde_json::Value;

/// Asserts that the response has the expected status code.
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status_code().as_u16();
    assert_eq!(
        actual, expected,
        "Expected status {}, got {}",
        expected, actual
    );
}

/// Returns a response header as a string, panicking if absent.
pub fn header(response: &TestResponse, name: &str) -> String {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("Expected {} header", name))
        .to_str()
        .expect("Header is not ASCII")
        .to_string()
}

/// Asserts that the response does not carry a header.
pub fn assert_no_header(response: &TestResponse, name: &str) {
    assert!(
        !response.headers().contains_key(name),
        "Unexpected {} header",
        name
    );
}

/// Asserts that the response body is empty.
pub fn assert_empty_body(response: &TestResponse) {
    assert!(
        response.as_bytes().is_empty(),
        "Expected empty body, got {:?}",
        response.text()
    );
}

/// Asserts that `Last-Modified` is an ISO-8601 UTC timestamp with milliseconds.
pub fn assert_iso_timestamp(response: &TestResponse) {
    let pattern = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").unwrap();
    let value = header(response, "last-modified");
    assert!(
        pattern.is_match(&value),
        "Last-Modified {} is not an ISO-8601 millisecond timestamp",
        value
    );
}

/// Asserts that the response body is a FHIR resource of the expected type.
pub fn assert_resource_type(body: &Value, expected: &str) {
    let actual = body
        .get("resourceType")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    assert_eq!(
        actual, expected,
        "Expected resourceType {}, got {}",
        expected, actual
    );
}

/// Asserts that the body is an OperationOutcome with one issue of `code`.
pub fn assert_issue_code(body: &Value, expected: &str) {
    assert_resource_type(body, "OperationOutcome");
    let issues = body
        .get("issue")
        .and_then(|v| v.as_array())
        .expect("Expected issues array in OperationOutcome");

    let has_code = issues
        .iter()
        .any(|issue| issue.get("code").and_then(|v| v.as_str()) == Some(expected));

    assert!(has_code, "Expected issue with code {}", expected);
}

/// Returns the text of the first OperationOutcome issue.
pub fn issue_text(body: &Value) -> &str {
    body["issue"][0]["details"]["text"].as_str().unwrap_or("")
}

/// Asserts that the body is a searchset Bundle whose total matches its entries.
pub fn assert_searchset(body: &Value, expected_total: usize) {
    assert_resource_type(body, "Bundle");
    assert_eq!(body["type"], "searchset");

    let entries = body["entry"].as_array().expect("Expected entry array");
    assert_eq!(body["total"], expected_total);
    assert_eq!(entries.len(), expected_total);
}

/// Returns the ids of the resources in a Bundle, in entry order.
pub fn entry_ids(body: &Value) -> Vec<String> {
    body["entry"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e["resource"]["id"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
