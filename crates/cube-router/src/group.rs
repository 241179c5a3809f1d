//! Route groups: a shared path prefix and middleware stack

use crate::{Route, RouteError, Router};

/// Scoped registration handle handed out by `Router::group`
///
/// Every route added through the group is re-rooted under the group's prefix,
/// and the group's middleware keys run before the route's own.
pub struct RouteGroup<'r> {
    router: &'r mut Router,
    prefix: String,
    middleware: Vec<String>,
}

impl<'r> RouteGroup<'r> {
    pub(crate) fn new(router: &'r mut Router, prefix: &str, middleware: &[&str]) -> Self {
        Self {
            router,
            prefix: prefix.trim_end_matches('/').to_string(),
            middleware: middleware.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn add_route(&mut self, route: Route) -> Result<(), RouteError> {
        let route = route.scoped(&self.prefix, &self.middleware)?;
        self.router.add_route(route)
    }

    /// Nested group; prefixes and middleware accumulate
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::{ControllerRef, Route, Router};
    ///
    /// let mut router = Router::new();
    /// router
    ///     .group("/api", &["json"], |api| {
    ///         api.group("/v1", &["throttle:60"], |v1| {
    ///             v1.add_route(Route::get("/status", ControllerRef::view("status"))?)
    ///         })
    ///     })
    ///     .unwrap();
    ///
    /// let route = &router.routes()[0];
    /// assert_eq!(route.path.raw(), "/api/v1/status");
    /// assert_eq!(route.middleware, vec!["json", "throttle:60"]);
    /// ```
    pub fn group<F>(&mut self, prefix: &str, middleware: &[&str], f: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut RouteGroup<'_>) -> Result<(), RouteError>,
    {
        let prefix = format!("{}/{}", self.prefix, prefix.trim_matches('/'));
        let middleware: Vec<String> = self
            .middleware
            .iter()
            .cloned()
            .chain(middleware.iter().map(|m| m.to_string()))
            .collect();

        let mut nested = RouteGroup {
            router: &mut *self.router,
            prefix: prefix.trim_end_matches('/').to_string(),
            middleware,
        };
        f(&mut nested)
    }
}
