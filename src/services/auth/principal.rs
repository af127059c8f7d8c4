//! Authenticated identity and the per-request context that carries it.
use serde::Serialize;

/// Public view of a user. Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Result of request authentication, created fresh for every inbound request.
///
/// Anonymous is not an error. Handlers that need a principal ask for one and
/// turn its absence into a 401 themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    principal: Option<Principal>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}
