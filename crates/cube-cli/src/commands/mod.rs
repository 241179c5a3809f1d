pub mod resolve;
pub mod routes;
pub mod schema;

use std::path::Path;

use anyhow::Result;
use cube::Application;
use tracing::debug;

/// Boot the project and install logging from its config
pub(crate) fn boot(config: &Path) -> Result<Application> {
    let app = Application::boot(config)?;
    if let Err(e) = cube::telemetry::init(&app.config().logging) {
        debug!("Keeping existing logging setup: {:#}", e);
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_twice_keeps_first_subscriber() {
        let missing = Path::new("no-such-project/cube.toml");
        let first = boot(missing).unwrap();
        let second = boot(missing).unwrap();
        assert!(first.router().routes().is_empty());
        assert!(second.router().routes().is_empty());
    }
}
