//! Resource URL composition.
//!
//! All URLs handed to clients (`fullUrl`, `Location`, `Content-Location`) are
//! built here by plain string composition, so identical inputs always yield
//! identical URLs.

/// Returns `{base_url}/{version}/{resource_type}/{id}`.
///
/// A trailing `/` on `base_url` is dropped so the result never contains an
/// empty path segment.
///
/// ```rust
/// use patient_rest::responses::resource_url;
///
/// assert_eq!(
///     resource_url("https://fhir.example.com", "dstu2", "Patient", "1"),
///     "https://fhir.example.com/dstu2/Patient/1"
/// );
/// ```
pub fn resource_url(base_url: &str, version: &str, resource_type: &str, id: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        version,
        resource_type,
        id
    )
}

/// Returns `{base_url}/{version}/{resource_type}/{id}/_history/{version_id}`.
pub fn history_url(
    base_url: &str,
    version: &str,
    resource_type: &str,
    id: &str,
    version_id: &str,
) -> String {
    format!(
        "{}/_history/{}",
        resource_url(base_url, version, resource_type, id),
        version_id
    )
}
