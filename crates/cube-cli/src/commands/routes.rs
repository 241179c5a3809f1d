use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use cube_router::Route;

pub fn execute(config: &Path) -> Result<()> {
    let app = super::boot(config)?;
    let routes = app.router().routes();

    if routes.is_empty() {
        println!("{}", "No routes registered".yellow());
        return Ok(());
    }

    println!("{}", format!("{} routes", routes.len()).green().bold());
    println!();

    for route in routes {
        println!("{}", describe(route));
    }

    Ok(())
}

/// One table row: method, template, target, then name and middleware if any
pub(crate) fn describe(route: &Route) -> String {
    let method = route.method.map_or("ANY", |m| m.as_str());
    let mut line = format!(
        "{:<7} {:<32} {}",
        method.cyan(),
        route.path.raw(),
        route.controller
    );

    if let Some(name) = &route.name {
        line.push_str(&format!("  {}", format!("[{}]", name).dimmed()));
    }
    if !route.middleware.is_empty() {
        line.push_str(&format!("  {}", route.middleware.join(", ").magenta()));
    }
    line
}
