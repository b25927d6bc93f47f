//! Search bundle assembly.
//!
//! [`SearchBundler`] turns the records returned by a search into a FHIR
//! `searchset` Bundle. Patient-scoped callers only see their own records;
//! unscoped callers see everything the service returned.

use serde::Serialize;
use serde_json::Value;

use super::urls::resource_url;
use crate::presenter::Presenter;
use crate::service::RawRecord;

/// Search mode for bundle entries.
///
/// Only [`SearchMode::Match`] is produced by [`SearchBundler`]; the other
/// modes exist for callers composing their own entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Primary search result.
    Match,
    /// Included because another result refers to it.
    Include,
    /// Information about the search itself.
    Outcome,
}

impl SearchMode {
    /// Returns the FHIR code string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Match => "match",
            SearchMode::Include => "include",
            SearchMode::Outcome => "outcome",
        }
    }
}

/// The `search` element of a bundle entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntrySearch {
    /// Why the entry is in the bundle.
    pub mode: SearchMode,
}

/// An entry in a search bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleEntry {
    /// Search information.
    pub search: EntrySearch,
    /// The presented resource.
    pub resource: Value,
    /// Absolute URL of the resource.
    #[serde(rename = "fullUrl")]
    pub full_url: String,
}

impl BundleEntry {
    /// Creates a search result entry.
    pub fn search_result(resource: Value, full_url: impl Into<String>) -> Self {
        Self {
            search: EntrySearch {
                mode: SearchMode::Match,
            },
            resource,
            full_url: full_url.into(),
        }
    }

    /// Returns the entry's search mode.
    pub fn mode(&self) -> SearchMode {
        self.search.mode
    }
}

/// A FHIR Bundle of type `searchset`.
///
/// `total` is always the number of entries: it is computed once from the
/// finished entry list and the entries cannot be modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBundle {
    total: usize,
    #[serde(rename = "resourceType")]
    resource_type: &'static str,
    #[serde(rename = "type")]
    bundle_type: &'static str,
    #[serde(rename = "entry")]
    entries: Vec<BundleEntry>,
}

impl SearchBundle {
    /// Creates a bundle holding exactly `entries`.
    pub fn from_entries(entries: Vec<BundleEntry>) -> Self {
        Self {
            total: entries.len(),
            resource_type: "Bundle",
            bundle_type: "searchset",
            entries,
        }
    }

    /// Creates a bundle with no entries.
    pub fn empty() -> Self {
        Self::from_entries(Vec::new())
    }

    /// Returns the number of entries.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the entries in result order.
    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Builds search bundles from raw service records.
pub struct SearchBundler<'a> {
    presenter: &'a dyn Presenter,
}

impl<'a> SearchBundler<'a> {
    /// Creates a bundler using `presenter` for entry resources.
    pub fn new(presenter: &'a dyn Presenter) -> Self {
        Self { presenter }
    }

    /// Builds a search bundle.
    ///
    /// A record is included iff `scope` is `None` or the record's owner equals
    /// `scope`. Included records keep the service's order. Each becomes a
    /// `match` entry whose `fullUrl` is
    /// `{base_url}/{version}/{resource_type}/{record id}`.
    ///
    /// Absent and empty `records` both produce an empty bundle.
    pub fn bundle(
        &self,
        records: Option<&[RawRecord]>,
        scope: Option<&str>,
        base_url: &str,
        resource_type: &str,
        version: &str,
    ) -> SearchBundle {
        let entries = records
            .unwrap_or_default()
            .iter()
            .filter(|record| record.visible_to(scope))
            .map(|record| {
                BundleEntry::search_result(
                    self.presenter.to_public_resource(record),
                    resource_url(base_url, version, resource_type, record.id()),
                )
            })
            .collect();

        SearchBundle::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::PatientPresenter;
    use serde_json::json;

    const BASE: &str = "http://localhost:8080";

    fn records() -> Vec<RawRecord> {
        vec![
            RawRecord::new("1").with_patient("a"),
            RawRecord::new("2").with_patient("b"),
        ]
    }

    fn bundle(records: Option<&[RawRecord]>, scope: Option<&str>) -> SearchBundle {
        SearchBundler::new(&PatientPresenter).bundle(records, scope, BASE, "Patient", "dstu2")
    }

    #[test]
    fn test_unscoped_caller_sees_all_records() {
        let records = records();
        let bundle = bundle(Some(&records), None);

        assert_eq!(bundle.total(), 2);
        assert_eq!(bundle.entries().len(), 2);
        assert!(bundle.entries().iter().all(|e| e.mode() == SearchMode::Match));
        assert_eq!(bundle.entries()[0].resource["id"], "1");
        assert_eq!(bundle.entries()[1].resource["id"], "2");
    }

    #[test]
    fn test_scoped_caller_sees_own_records() {
        let records = records();
        let bundle = bundle(Some(&records), Some("a"));

        assert_eq!(bundle.total(), 1);
        assert_eq!(bundle.entries()[0].resource["id"], "1");
        assert_eq!(
            bundle.entries()[0].full_url,
            "http://localhost:8080/dstu2/Patient/1"
        );
    }

    #[test]
    fn test_absent_and_empty_records() {
        assert_eq!(bundle(None, None).total(), 0);
        assert_eq!(bundle(Some(&[]), Some("a")).total(), 0);
        assert!(bundle(None, None).entries().is_empty());
    }

    #[test]
    fn test_filtering_preserves_order() {
        let records = vec![
            RawRecord::new("3").with_patient("a"),
            RawRecord::new("1").with_patient("b"),
            RawRecord::new("2").with_patient("a"),
        ];
        let bundle = bundle(Some(&records), Some("a"));
        let ids: Vec<_> = bundle
            .entries()
            .iter()
            .map(|e| e.resource["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["3", "2"]);
    }

    #[test]
    fn test_total_matches_entries_for_every_scope() {
        let records: Vec<_> = (0..20)
            .map(|i| RawRecord::new(i.to_string()).with_patient(format!("p{}", i % 3)))
            .collect();
        for scope in [None, Some("p0"), Some("p1"), Some("p2"), Some("nobody")] {
            let bundle = bundle(Some(&records), scope);
            assert_eq!(bundle.total(), bundle.entries().len());
            let expected = records.iter().filter(|r| r.visible_to(scope)).count();
            assert_eq!(bundle.total(), expected);
        }
    }

    #[test]
    fn test_json_shape() {
        let records = records();
        let json = bundle(Some(&records), Some("b")).to_json();

        assert_eq!(json["resourceType"], "Bundle");
        assert_eq!(json["type"], "searchset");
        assert_eq!(json["total"], 1);
        assert_eq!(json["entry"][0]["search"]["mode"], "match");
        assert_eq!(json["entry"][0]["fullUrl"], "http://localhost:8080/dstu2/Patient/2");
        assert_eq!(
            json["entry"][0]["resource"],
            json!({"resourceType": "Patient", "id": "2"})
        );
    }

    #[test]
    fn test_empty_bundle_serializes_empty_entry_list() {
        let json = SearchBundle::empty().to_json();
        assert_eq!(json["total"], 0);
        assert_eq!(json["entry"], json!([]));
    }

    #[test]
    fn test_search_mode_as_str() {
        assert_eq!(SearchMode::Match.as_str(), "match");
        assert_eq!(SearchMode::Include.as_str(), "include");
        assert_eq!(SearchMode::Outcome.as_str(), "outcome");
    }
}
