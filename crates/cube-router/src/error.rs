//! Errors raised while building a route table
//!
//! All of them are startup-time failures: a router that returned one of these
//! must not be used to serve requests. A path that matches no route is not an
//! error; `Router::match_route` returns `None` for it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The path template could not be compiled into a matcher
    #[error("invalid route pattern `{template}`: {reason}")]
    InvalidPattern { template: String, reason: String },

    /// Two routes were registered under the same name
    #[error("route name `{0}` is already registered")]
    DuplicateRouteName(String),

    /// A route was added after the router started dispatching
    #[error("cannot register `{0}`: router is already dispatching")]
    RegistryFrozen(String),
}

impl RouteError {
    pub(crate) fn invalid(template: &str, reason: impl Into<String>) -> Self {
        RouteError::InvalidPattern {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}
