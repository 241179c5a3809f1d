//! # Cube
//!
//! Application core tying the router and the query layer together:
//! - `cube.toml` configuration ([`config`])
//! - Route tables from `routes.toml` ([`routes`])
//! - Request resolution and closure dispatch ([`app`])
//! - Tracing setup ([`telemetry`])
//!
//! ```no_run
//! use cube::app::Application;
//!
//! # fn main() -> anyhow::Result<()> {
//! let app = Application::boot("cube.toml")?;
//! cube::telemetry::init(&app.config().logging)?;
//!
//! if let Some(m) = app.resolve("GET", "/users/5").route_match() {
//!     println!("{} -> {}", m.route.path.raw(), m.route.controller);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod routes;
pub mod telemetry;

pub use app::{Application, Dispatch, RequestLine};
pub use config::Config;

pub use cube_db as db;
pub use cube_router as router;
