//! Route tables declared in `routes.toml`
//!
//! ```toml
//! [[route]]
//! method = "GET"
//! path = "/users/{id:int}"
//! controller = "UserController@show"
//! name = "users.show"
//!
//! [[group]]
//! prefix = "/admin"
//! middleware = ["auth", "role:admin"]
//!
//! [[group.route]]
//! path = "/dashboard"
//! view = "admin.dashboard"
//! ```
//!
//! Top-level routes register first, then each group in file order.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use cube_router::{ControllerRef, Method, Route, Router};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RoutesFile {
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteEntry>,

    #[serde(default, rename = "group")]
    pub groups: Vec<GroupEntry>,
}

/// One `[[route]]` table
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RouteEntry {
    /// HTTP method, or `ANY`/absent for every method
    #[serde(default)]
    pub method: Option<String>,
    pub path: String,
    /// `Controller@action`
    #[serde(default)]
    pub controller: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub middleware: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GroupEntry {
    pub prefix: String,
    #[serde(default)]
    pub middleware: Vec<String>,
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteEntry>,
}

impl RouteEntry {
    fn method(&self) -> Result<Option<Method>> {
        match self.method.as_deref().map(str::trim) {
            None => Ok(None),
            Some(m) if m.eq_ignore_ascii_case("any") => Ok(None),
            Some(m) => m
                .parse::<Method>()
                .map(Some)
                .map_err(|_| anyhow!("unknown method `{}` for route {}", m, self.path)),
        }
    }

    fn target(&self) -> Result<ControllerRef> {
        match (&self.controller, &self.view) {
            (Some(_), Some(_)) => bail!("route {} has both a controller and a view", self.path),
            (Some(action), None) => ControllerRef::parse_action(action).ok_or_else(|| {
                anyhow!("controller `{}` for route {} is not `Class@method`", action, self.path)
            }),
            (None, Some(view)) => Ok(ControllerRef::view(view.clone())),
            (None, None) => bail!("route {} needs a controller or a view", self.path),
        }
    }

    pub fn to_route(&self) -> Result<Route> {
        let route = Route::new(self.method()?, &self.path, self.target()?)
            .with_context(|| format!("Invalid route template {}", self.path))?
            .with_middlewares(self.middleware.iter().cloned());

        Ok(match &self.name {
            Some(name) => route.with_name(name.clone()),
            None => route,
        })
    }
}

impl RoutesFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse route table")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("In route table {:?}", path))
    }

    /// Build a router holding every route in the table
    pub fn into_router(self, case_insensitive: bool) -> Result<Router> {
        let mut router = Router::with_case_insensitive(case_insensitive);

        for entry in &self.routes {
            router.add_route(entry.to_route()?)?;
        }

        for group in &self.groups {
            let routes = group
                .routes
                .iter()
                .map(RouteEntry::to_route)
                .collect::<Result<Vec<_>>>()?;
            let middleware = group.middleware.iter().map(String::as_str).collect::<Vec<_>>();

            router
                .group(&group.prefix, &middleware, |scope| {
                    routes.into_iter().try_for_each(|route| scope.add_route(route))
                })
                .with_context(|| format!("In route group {}", group.prefix))?;
        }

        debug!("Loaded {} routes", router.len());
        Ok(router)
    }
}
