//! What a route points at once it matches

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Inline handler: receives the bound attributes and renders a response body
pub type ClosureHandler = Arc<dyn Fn(&HashMap<String, String>) -> anyhow::Result<String> + Send + Sync>;

/// Target of a route
///
/// The router never invokes anything itself; the surrounding application decides
/// how to run an action, call a closure or render a view.
#[derive(Clone)]
pub enum ControllerRef {
    /// A controller type and one of its actions, e.g. `UserController@show`
    Action { controller: String, action: String },
    /// An inline handler
    Closure(ClosureHandler),
    /// A template rendered without a controller
    View(String),
}

impl ControllerRef {
    /// Builds an action reference
    pub fn action(controller: impl Into<String>, action: impl Into<String>) -> Self {
        ControllerRef::Action {
            controller: controller.into(),
            action: action.into(),
        }
    }

    pub fn view(name: impl Into<String>) -> Self {
        ControllerRef::View(name.into())
    }

    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&HashMap<String, String>) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        ControllerRef::Closure(Arc::new(f))
    }

    /// Parses the `Controller@action` shorthand
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::ControllerRef;
    ///
    /// let target = ControllerRef::parse_action("UserController@show").unwrap();
    /// assert_eq!(target.to_string(), "UserController@show");
    ///
    /// assert!(ControllerRef::parse_action("UserController").is_none());
    /// assert!(ControllerRef::parse_action("@show").is_none());
    /// ```
    pub fn parse_action(spec: &str) -> Option<Self> {
        let (controller, action) = spec.split_once('@')?;
        if controller.is_empty() || action.is_empty() || action.contains('@') {
            return None;
        }
        Some(Self::action(controller, action))
    }
}

impl fmt::Display for ControllerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerRef::Action { controller, action } => write!(f, "{}@{}", controller, action),
            ControllerRef::Closure(_) => f.write_str("<closure>"),
            ControllerRef::View(name) => write!(f, "view:{}", name),
        }
    }
}

impl fmt::Debug for ControllerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerRef::Action { controller, action } => f
                .debug_struct("Action")
                .field("controller", controller)
                .field("action", action)
                .finish(),
            ControllerRef::Closure(_) => f.write_str("Closure(..)"),
            ControllerRef::View(name) => f.debug_tuple("View").field(name).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_receives_params() {
        let target = ControllerRef::closure(|params| {
            Ok(format!("user {}", params.get("id").map(String::as_str).unwrap_or("?")))
        });

        let mut params = HashMap::new();
        params.insert("id".to_string(), "7".to_string());

        match target {
            ControllerRef::Closure(handler) => assert_eq!(handler(&params).unwrap(), "user 7"),
            other => panic!("expected closure, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ControllerRef::view("home").to_string(), "view:home");
        assert_eq!(ControllerRef::closure(|_| Ok(String::new())).to_string(), "<closure>");
    }
}
