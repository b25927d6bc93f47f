//! Per-request context.
//!
//! A [`RequestContext`] is built once for every inbound request from the
//! deployment's API version tag and the caller's patient scope. It is never
//! mutated afterwards and is handed to the service alongside the request.

/// Immutable context for a single request.
///
/// # Example
///
/// ```rust
/// use patient_rest::RequestContext;
///
/// let ctx = RequestContext::new("dstu2", Some("a".to_string()));
/// assert_eq!(ctx.version(), "dstu2");
/// assert_eq!(ctx.patient(), Some("a"));
/// assert!(ctx.is_scoped());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// The API version tag, e.g. `dstu2`.
    version: String,
    /// The authenticated patient identity, absent for unscoped callers.
    patient: Option<String>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(version: impl Into<String>, patient: Option<String>) -> Self {
        Self {
            version: version.into(),
            patient,
        }
    }

    /// Creates a context for an unscoped (administrative or practitioner) caller.
    pub fn unscoped(version: impl Into<String>) -> Self {
        Self::new(version, None)
    }

    /// Returns the API version tag.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the caller's patient scope.
    pub fn patient(&self) -> Option<&str> {
        self.patient.as_deref()
    }

    /// Returns true if the caller is restricted to a single patient.
    pub fn is_scoped(&self) -> bool {
        self.patient.is_some()
    }
}
