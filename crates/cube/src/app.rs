//! Application bootstrap and request resolution

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cube_db::Database;
use cube_router::{ControllerRef, Request, RouteMatch, Router};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::routes::RoutesFile;

/// A request line: method plus path (query string allowed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub path: String,
}

impl RequestLine {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

impl Request for RequestLine {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &str {
        &self.method
    }
}

/// Outcome of resolving a request against the route table
#[derive(Debug)]
pub enum Dispatch<'r> {
    Matched(RouteMatch<'r>),
    NotFound,
}

impl<'r> Dispatch<'r> {
    pub fn is_found(&self) -> bool {
        matches!(self, Dispatch::Matched(_))
    }

    pub fn route_match(&self) -> Option<&RouteMatch<'r>> {
        match self {
            Dispatch::Matched(m) => Some(m),
            Dispatch::NotFound => None,
        }
    }

    /// Runs an inline closure target with the bound attributes
    ///
    /// `None` for misses and for action or view targets, which the host
    /// application runs itself.
    pub fn invoke(&self) -> Option<Result<String>> {
        let m = self.route_match()?;
        match &m.route.controller {
            ControllerRef::Closure(handler) => Some(handler(&m.params)),
            _ => None,
        }
    }
}

/// Loaded configuration plus the frozen-on-first-use route table
#[derive(Debug)]
pub struct Application {
    config: Config,
    router: Router,
    base_dir: PathBuf,
}

impl Application {
    pub fn new(config: Config, router: Router) -> Self {
        Self {
            config,
            router,
            base_dir: PathBuf::from("."),
        }
    }

    /// Load `cube.toml` at `config_path` and the route table it points to
    ///
    /// A missing route table gives an empty router so routes can still be
    /// registered programmatically through [`Application::router_mut`].
    pub fn boot(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let config = Config::load(config_path)?.with_env();
        let routes_path = config.routes_path(&base_dir);

        let router = if routes_path.exists() {
            RoutesFile::load(&routes_path)?.into_router(config.routing.case_insensitive)?
        } else {
            warn!("Route table {:?} not found, starting with no routes", routes_path);
            Router::with_case_insensitive(config.routing.case_insensitive)
        };

        info!("Booted {} with {} routes", config.app.name, router.len());

        Ok(Self {
            config,
            router,
            base_dir,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Registration access; `add_route` fails with `RegistryFrozen` once dispatch began
    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    pub fn resolve(&self, method: &str, path: &str) -> Dispatch<'_> {
        self.handle(&RequestLine::new(method, path))
    }

    pub fn handle<R: Request + ?Sized>(&self, request: &R) -> Dispatch<'_> {
        match self.router.dispatch(request) {
            Some(m) => Dispatch::Matched(m),
            None => {
                debug!("No route for {} {}", request.method(), request.path());
                Dispatch::NotFound
            }
        }
    }

    /// Open the configured database
    pub async fn connect_database(&self) -> Result<Database> {
        Database::connect_with(&self.config.database)
            .await
            .context("Failed to connect to database")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_router::Route;

    fn app() -> Application {
        let mut router = Router::new();
        router
            .add_route(
                Route::get(
                    "/hello/{name}",
                    ControllerRef::closure(|params| Ok(format!("hello {}", params["name"]))),
                )
                .unwrap(),
            )
            .unwrap();
        router
            .add_route(Route::get("/about", ControllerRef::view("about")).unwrap())
            .unwrap();
        Application::new(Config::default(), router)
    }

    #[test]
    fn test_invoke_closure() {
        let app = app();
        let dispatch = app.resolve("GET", "/hello/ada?x=1");
        assert!(dispatch.is_found());
        assert_eq!(dispatch.invoke().unwrap().unwrap(), "hello ada");
    }

    #[test]
    fn test_view_is_not_invoked() {
        let app = app();
        let dispatch = app.resolve("GET", "/about");
        assert!(dispatch.is_found());
        assert!(dispatch.invoke().is_none());
    }

    #[test]
    fn test_not_found() {
        let app = app();
        assert!(matches!(app.resolve("POST", "/about"), Dispatch::NotFound));
        assert!(app.resolve("GET", "/nowhere").invoke().is_none());
    }
}
