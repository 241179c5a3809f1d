//! # Cube Router
//!
//! Regex-compiled route templates with first-match-wins dispatch:
//! - Literal routes (`/about`)
//! - Typed placeholders (`/users/{id:int}`, `/flags/{on:bool}`)
//! - Untyped placeholders (`/posts/{slug}`)
//! - Optional placeholders (`/posts/{slug?}`, `/archive/{year:int?}`)
//! - Raw regex placeholders (`/codes/{code:[A-Z]+}`)
//! - Named routes with reverse URL generation
//! - Route groups sharing a prefix and middleware
//!
//! ## Matching
//!
//! Routes are scanned in registration order and the first route whose method and
//! regex match wins. There is no specificity ranking: register `/users/new`
//! before `/users/{id}` if both should be reachable.
//!
//! Request paths are normalized first (repeated slashes collapsed, exactly one
//! trailing `/`), mirroring the trailing slash every compiled regex expects.
//!
//! ## Example
//!
//! ```
//! use cube_router::{ControllerRef, Route, Router};
//!
//! let mut router = Router::new();
//! router
//!     .add_route(Route::get("/users/{id:int}", ControllerRef::action("UserController", "show")).unwrap())
//!     .unwrap();
//!
//! let route_match = router.match_route("/users/123", "GET").unwrap();
//! assert_eq!(route_match.param("id"), Some("123"));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

// ============================================================================
// Module Declarations
// ============================================================================

mod error;
mod group;
mod handler;
mod method;
mod middleware;
pub mod path;
pub mod route;

pub use error::RouteError;
pub use group::RouteGroup;
pub use handler::{ClosureHandler, ControllerRef};
pub use method::Method;
pub use middleware::Middleware;
pub use path::{is_canonical_path, normalize_path};
pub use route::compiler::{compile, RoutePattern};
pub use route::pattern::{ParamType, TemplateSegment};

// ============================================================================
// Core Types
// ============================================================================

/// A registered route: method, compiled path, target and metadata
#[derive(Debug, Clone)]
pub struct Route {
    /// `None` matches every method
    pub method: Option<Method>,
    /// Compiled path template
    pub path: RoutePattern,
    /// What the application should run on a match
    pub controller: ControllerRef,
    /// Optional name for reverse lookup
    pub name: Option<String>,
    /// Middleware keys in execution order
    pub middleware: Vec<String>,
}

/// Result of matching a route against a request
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    /// The matched route
    pub route: &'r Route,
    /// Captured attributes by name
    pub params: HashMap<String, String>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// What the router needs from an incoming request
pub trait Request {
    fn path(&self) -> &str;
    fn method(&self) -> &str;
}

// ============================================================================
// Route Implementation
// ============================================================================

impl Route {
    /// Creates a route, compiling its template immediately
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::{ControllerRef, Method, Route};
    ///
    /// let route = Route::new(Some(Method::Get), "/users/{id:int}", ControllerRef::view("user")).unwrap();
    /// assert_eq!(route.path.attributes(), ["id"]);
    ///
    /// assert!(Route::new(None, "/users/{id:int:x}", ControllerRef::view("user")).is_err());
    /// ```
    pub fn new(
        method: Option<Method>,
        template: &str,
        controller: ControllerRef,
    ) -> Result<Self, RouteError> {
        Ok(Route {
            method,
            path: RoutePattern::compile(template)?,
            controller,
            name: None,
            middleware: Vec::new(),
        })
    }

    pub fn get(template: &str, controller: ControllerRef) -> Result<Self, RouteError> {
        Self::new(Some(Method::Get), template, controller)
    }

    pub fn post(template: &str, controller: ControllerRef) -> Result<Self, RouteError> {
        Self::new(Some(Method::Post), template, controller)
    }

    pub fn put(template: &str, controller: ControllerRef) -> Result<Self, RouteError> {
        Self::new(Some(Method::Put), template, controller)
    }

    pub fn patch(template: &str, controller: ControllerRef) -> Result<Self, RouteError> {
        Self::new(Some(Method::Patch), template, controller)
    }

    pub fn delete(template: &str, controller: ControllerRef) -> Result<Self, RouteError> {
        Self::new(Some(Method::Delete), template, controller)
    }

    /// Route that answers every method
    pub fn any(template: &str, controller: ControllerRef) -> Result<Self, RouteError> {
        Self::new(None, template, controller)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Sets the name used by `Router::url_for`
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::{ControllerRef, Route};
    ///
    /// let route = Route::get("/users/{id:int}", ControllerRef::view("user"))
    ///     .unwrap()
    ///     .with_name("users.show");
    ///
    /// assert_eq!(route.name.as_deref(), Some("users.show"));
    /// ```
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a middleware key
    pub fn with_middleware(mut self, key: impl Into<String>) -> Self {
        self.middleware.push(key.into());
        self
    }

    /// Appends several middleware keys, keeping their order
    pub fn with_middlewares<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Parsed middleware keys
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::{ControllerRef, Route};
    ///
    /// let route = Route::get("/admin", ControllerRef::view("admin"))
    ///     .unwrap()
    ///     .with_middleware("auth")
    ///     .with_middleware("role:admin:editor");
    ///
    /// let names: Vec<&str> = route.middleware().map(|m| m.name).collect();
    /// assert_eq!(names, vec!["auth", "role"]);
    /// ```
    pub fn middleware(&self) -> impl Iterator<Item = Middleware<'_>> {
        self.middleware.iter().map(|key| Middleware::parse(key))
    }

    /// Whether this route answers `method` (`None` for methods outside `Method`)
    pub fn accepts(&self, method: Option<Method>) -> bool {
        match self.method {
            None => true,
            Some(own) => method == Some(own),
        }
    }

    /// Matches this route's path against a raw request path
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        self.path.captures(&normalize_path(path))
    }

    /// Generates a URL for this route by substituting parameters
    pub fn generate_url(&self, params: &HashMap<String, String>) -> Option<String> {
        self.path.render(params)
    }

    /// Re-roots the route under `prefix` and puts `middleware` ahead of its own keys
    pub(crate) fn scoped(mut self, prefix: &str, middleware: &[String]) -> Result<Self, RouteError> {
        self.path = self.path.prefixed(prefix)?;
        if !middleware.is_empty() {
            let own = std::mem::take(&mut self.middleware);
            self.middleware = middleware.iter().cloned().chain(own).collect();
        }
        Ok(self)
    }
}

// ============================================================================
// Router
// ============================================================================

/// Ordered route registry
///
/// Routes are registered while the application boots. The first call to
/// `match_route` switches the router to dispatching; any later registration
/// fails with `RouteError::RegistryFrozen`.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
    named_routes: HashMap<String, usize>,
    case_insensitive: bool,
    dispatching: AtomicBool,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router whose literal segments match case-insensitively
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::{ControllerRef, Route, Router};
    ///
    /// let mut router = Router::with_case_insensitive(true);
    /// router.add_route(Route::get("/About", ControllerRef::view("about")).unwrap()).unwrap();
    ///
    /// assert!(router.match_route("/about", "GET").is_some());
    /// ```
    pub fn with_case_insensitive(case_insensitive: bool) -> Self {
        Self {
            case_insensitive,
            ..Self::default()
        }
    }

    /// Registers a route at the end of the scan order
    pub fn add_route(&mut self, route: Route) -> Result<(), RouteError> {
        if self.is_dispatching() {
            return Err(RouteError::RegistryFrozen(route.path.raw().to_string()));
        }

        let mut route = route;
        route.path = route.path.with_case_insensitive(self.case_insensitive)?;

        if let Some(name) = &route.name {
            if self.named_routes.contains_key(name) {
                return Err(RouteError::DuplicateRouteName(name.clone()));
            }
            self.named_routes.insert(name.clone(), self.routes.len());
        }

        debug!(
            method = route.method.map_or("ANY", |m| m.as_str()),
            template = route.path.raw(),
            regex = route.path.regex_source(),
            "route registered"
        );

        self.routes.push(route);
        Ok(())
    }

    /// Functional variant of `add_route`
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::{ControllerRef, Route, Router};
    ///
    /// let router = Router::new()
    ///     .with_route(Route::get("/", ControllerRef::view("home")).unwrap())
    ///     .and_then(|r| r.with_route(Route::get("/about", ControllerRef::view("about")).unwrap()))
    ///     .unwrap();
    ///
    /// assert_eq!(router.len(), 2);
    /// ```
    pub fn with_route(mut self, route: Route) -> Result<Self, RouteError> {
        self.add_route(route)?;
        Ok(self)
    }

    /// Registers every route added inside `f` under a shared prefix and middleware
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::{ControllerRef, Route, Router};
    ///
    /// let mut router = Router::new();
    /// router
    ///     .group("/admin", &["auth"], |admin| {
    ///         admin.add_route(Route::get("/users", ControllerRef::action("AdminController", "users"))?)?;
    ///         Ok(())
    ///     })
    ///     .unwrap();
    ///
    /// let route_match = router.match_route("/admin/users", "GET").unwrap();
    /// assert_eq!(route_match.route.middleware, vec!["auth"]);
    /// ```
    pub fn group<F>(&mut self, prefix: &str, middleware: &[&str], f: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut RouteGroup<'_>) -> Result<(), RouteError>,
    {
        let mut group = RouteGroup::new(self, prefix, middleware);
        f(&mut group)
    }

    /// Matches a path against all routes and returns the first match
    ///
    /// Routes are checked in registration order; only routes bound to `method`
    /// or to every method take part. `None` means no route matched.
    pub fn match_route(&self, path: &str, method: &str) -> Option<RouteMatch<'_>> {
        if !self.dispatching.swap(true, Ordering::AcqRel) {
            debug!(routes = self.routes.len(), "router sealed, dispatching");
        }

        let method = method.parse::<Method>().ok();
        let normalized = normalize_path(path);

        let found = self
            .routes
            .iter()
            .filter(|route| route.accepts(method))
            .find_map(|route| {
                trace!(template = route.path.raw(), path = %normalized, "trying route");
                route
                    .path
                    .captures(&normalized)
                    .map(|params| RouteMatch { route, params })
            });

        match &found {
            Some(m) => debug!(path = %normalized, template = m.route.path.raw(), "route matched"),
            None => debug!(path = %normalized, "no route matched"),
        }

        found
    }

    /// Matches a request through the `Request` collaborator interface
    pub fn dispatch<R: Request + ?Sized>(&self, request: &R) -> Option<RouteMatch<'_>> {
        self.match_route(request.path(), request.method())
    }

    pub fn is_dispatching(&self) -> bool {
        self.dispatching.load(Ordering::Acquire)
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Routes in scan order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    // ========================================================================
    // Named Routes
    // ========================================================================

    /// Generates a URL for a named route
    ///
    /// `None` if the name is unknown, a required parameter is missing, or a
    /// value does not fit its placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::{ControllerRef, Route, Router};
    /// use std::collections::HashMap;
    ///
    /// let mut router = Router::new();
    /// router
    ///     .add_route(
    ///         Route::get("/users/{id:int}", ControllerRef::action("UserController", "show"))
    ///             .unwrap()
    ///             .with_name("users.show"),
    ///     )
    ///     .unwrap();
    ///
    /// let mut params = HashMap::new();
    /// params.insert("id".to_string(), "123".to_string());
    ///
    /// assert_eq!(router.url_for("users.show", &params).unwrap(), "/users/123");
    /// ```
    pub fn url_for(&self, name: &str, params: &HashMap<String, String>) -> Option<String> {
        self.get_route_by_name(name)
            .and_then(|route| route.generate_url(params))
    }

    /// `url_for` with parameters given as tuples
    pub fn url_for_params(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let param_map: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        self.url_for(name, &param_map)
    }

    pub fn get_route_by_name(&self, name: &str) -> Option<&Route> {
        self.named_routes.get(name).map(|&idx| &self.routes[idx])
    }
}
