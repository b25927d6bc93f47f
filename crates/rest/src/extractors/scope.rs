//! Patient scope extractor.
//!
//! Determines which patient, if any, the caller is restricted to.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
};

use crate::service::ResourceService;
use crate::state::AppState;

/// Axum extractor for the caller's patient scope.
///
/// Authentication middleware placed in front of the router records the
/// authenticated patient by inserting a `PatientScope` into the request
/// extensions. Without one, the scope is read from the configured scope
/// header (`X-Patient-ID` by default). A request with neither is unscoped.
///
/// # Example
///
/// ```rust,ignore
/// use patient_rest::extractors::PatientScope;
///
/// async fn handler(scope: PatientScope) {
///     println!("Patient scope: {:?}", scope.patient_id());
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientScope {
    patient: Option<String>,
}

impl PatientScope {
    /// Creates a scope restricted to one patient.
    pub fn patient(patient_id: impl Into<String>) -> Self {
        Self {
            patient: Some(patient_id.into()),
        }
    }

    /// Creates an unscoped caller.
    pub fn unscoped() -> Self {
        Self::default()
    }

    /// Returns the patient identity, if scoped.
    pub fn patient_id(&self) -> Option<&str> {
        self.patient.as_deref()
    }

    /// Consumes the extractor and returns the patient identity.
    pub fn into_patient_id(self) -> Option<String> {
        self.patient
    }
}

impl std::fmt::Display for PatientScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.patient {
            Some(patient) => write!(f, "{}", patient),
            None => write!(f, "unscoped"),
        }
    }
}

/// Extracts the patient scope from headers.
fn extract_scope_from_headers(
    headers: &HeaderMap,
    header_name: &str,
) -> Result<PatientScope, (StatusCode, &'static str)> {
    match headers.get(header_name) {
        None => Ok(PatientScope::unscoped()),
        Some(value) => {
            let patient = value
                .to_str()
                .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid patient scope"))?
                .trim();
            if patient.is_empty() {
                return Err((StatusCode::BAD_REQUEST, "Invalid patient scope"));
            }
            Ok(PatientScope::patient(patient))
        }
    }
}

impl<S> FromRequestParts<AppState<S>> for PatientScope
where
    S: ResourceService + 'static,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(scope) = parts.extensions.get::<PatientScope>() {
            return Ok(scope.clone());
        }

        extract_scope_from_headers(&parts.headers, &state.config().scope_header)
    }
}
