use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use cube::Dispatch;

pub fn execute(config: &Path, method: &str, path: &str) -> Result<()> {
    let app = super::boot(config)?;

    match app.resolve(method, path) {
        Dispatch::Matched(m) => {
            println!("{} {}", "✓".green().bold(), super::routes::describe(m.route));

            let mut params = m.params.iter().collect::<Vec<_>>();
            params.sort();
            for (name, value) in params {
                println!("    {} = {}", name.cyan(), value);
            }
        }
        Dispatch::NotFound => {
            println!("{} no route for {} {}", "✗".red().bold(), method.to_uppercase(), path);
        }
    }

    Ok(())
}
