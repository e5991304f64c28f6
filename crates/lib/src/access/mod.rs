//! Request-time access gate for the store API.
//!
//! The gate answers one question per request: may this requester perform this kind of
//! operation? Read-type (safe) operations are always allowed. Everything else requires
//! an authenticated requester.
//!
//! A denial carries an explicit [`Denial`] kind instead of a bare `false`, so the HTTP
//! layer can answer `401 Unauthorized` ("you are not authenticated") rather than
//! `403 Forbidden` ("you lack rights on this resource"). The gate never consults the
//! resource being accessed; the object-level check applies the same policy as the
//! collection-level one.

mod http;

pub use http::WWW_AUTHENTICATE_CHALLENGE;

use axum::http::Method;

use crate::account::AccountId;

/// Read/write classification of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Read-only request (GET, HEAD, OPTIONS)
    Safe,
    /// Request that may mutate state (POST, PUT, PATCH, DELETE, ...)
    Unsafe,
}

impl OperationKind {
    /// Classify an HTTP method.
    ///
    /// GET, HEAD and OPTIONS are safe; every other method, including extension
    /// methods, is unsafe.
    pub fn from_method(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS {
            OperationKind::Safe
        } else {
            OperationKind::Unsafe
        }
    }

    pub fn is_safe(self) -> bool {
        self == OperationKind::Safe
    }
}

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    /// A requester whose session resolved to an account
    Authenticated(AccountId),
    /// No credentials, or credentials that did not resolve to an account
    Anonymous,
}

impl Requester {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Requester::Authenticated(_))
    }

    pub fn account_id(&self) -> Option<&AccountId> {
        match self {
            Requester::Authenticated(id) => Some(id),
            Requester::Anonymous => None,
        }
    }
}

impl From<Option<AccountId>> for Requester {
    fn from(id: Option<AccountId>) -> Self {
        id.map_or(Requester::Anonymous, Requester::Authenticated)
    }
}

/// Ephemeral per-request input to the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub operation: OperationKind,
    pub requester: Requester,
}

impl RequestContext {
    pub fn new(operation: OperationKind, requester: Requester) -> Self {
        Self {
            operation,
            requester,
        }
    }

    /// Build a context from an HTTP method and the resolved requester.
    pub fn from_method(method: &Method, requester: Requester) -> Self {
        Self::new(OperationKind::from_method(method), requester)
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denial {
    /// The requester is not authenticated (401)
    Unauthorized,
    /// The requester is authenticated but lacks rights (403)
    Forbidden,
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }

    /// The denial kind, if the request was denied.
    pub fn denial(self) -> Option<Denial> {
        match self {
            Decision::Allow => None,
            Decision::Deny(denial) => Some(denial),
        }
    }

    /// Convert into a `Result` for use with `?` in request handlers.
    pub fn into_result(self) -> std::result::Result<(), Denial> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(denial),
        }
    }
}

/// Collection-level check: safe operations always pass, unsafe operations need an
/// authenticated requester.
pub fn has_permission(ctx: &RequestContext) -> Decision {
    if ctx.operation.is_safe() || ctx.requester.is_authenticated() {
        Decision::Allow
    } else {
        Decision::Deny(Denial::Unauthorized)
    }
}

/// Object-level check. Same policy as [`has_permission`]; the object is not inspected.
pub fn has_object_permission<T: ?Sized>(ctx: &RequestContext, _object: &T) -> Decision {
    has_permission(ctx)
}
