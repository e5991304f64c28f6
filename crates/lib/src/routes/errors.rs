//! Error types for the route table.

use thiserror::Error;

/// Errors from building a route table or reversing a route.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RouteError {
    /// A pattern string could not be parsed.
    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Two routes in one table share a name.
    #[error("Duplicate route name: {name}")]
    DuplicateName { name: String },

    /// No route has this name.
    #[error("Unknown route: {name}")]
    UnknownRoute { name: String },

    /// A parameter the pattern captures was not supplied.
    #[error("Route '{route}' requires parameter '{param}'")]
    MissingParameter { route: String, param: String },

    /// A supplied parameter is not captured by the pattern.
    #[error("Route '{route}' has no parameter '{param}'")]
    UnexpectedParameter { route: String, param: String },

    /// A supplied value does not satisfy the parameter's converter.
    #[error("Value '{value}' for parameter '{param}' of route '{route}' is not a valid {converter}")]
    InvalidParameter {
        route: String,
        param: String,
        value: String,
        converter: &'static str,
    },
}

impl RouteError {
    /// Check if this error indicates a route was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteError::UnknownRoute { .. })
    }

    /// Check if this error was caused by bad reverse-lookup arguments.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            RouteError::MissingParameter { .. }
                | RouteError::UnexpectedParameter { .. }
                | RouteError::InvalidParameter { .. }
        )
    }
}

impl From<RouteError> for crate::Error {
    fn from(err: RouteError) -> Self {
        crate::Error::Route(err)
    }
}
