use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use cube_db::schema::Blueprint;
use cube_db::{ColumnType, DatabaseType, Value};
use serde::Deserialize;
use tracing::info;

use crate::Dialect;

/// Schema file: a list of `[[table]]` entries
#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default, rename = "table")]
    tables: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    name: String,
    #[serde(default)]
    timestamps: bool,
    #[serde(default, rename = "column")]
    columns: Vec<ColumnEntry>,
}

#[derive(Debug, Deserialize)]
struct ColumnEntry {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    nullable: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    default: Option<toml::Value>,
}

impl From<Dialect> for DatabaseType {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Sqlite => DatabaseType::SQLite,
            Dialect::Postgres => DatabaseType::PostgreSQL,
            Dialect::Mysql => DatabaseType::MySQL,
        }
    }
}

pub async fn execute(config: &Path, file: &Path, dialect: Dialect, apply: bool) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read schema file: {:?}", file))?;
    let blueprints = parse_schema(&content)
        .with_context(|| format!("Failed to parse schema file: {:?}", file))?;

    if !apply {
        let db_type = DatabaseType::from(dialect);
        for blueprint in &blueprints {
            println!("{};", blueprint.to_create_sql(db_type));
        }
        return Ok(());
    }

    let app = super::boot(config)?;
    let db = app.connect_database().await?;
    info!(
        "Applying {} tables with the {:?} dialect of the configured database",
        blueprints.len(),
        db.database_type()
    );

    for blueprint in &blueprints {
        db.create_table(blueprint)
            .await
            .with_context(|| format!("Failed to create table {}", blueprint.table()))?;
        println!("{} {}", "✓ created".green(), blueprint.table());
    }

    db.close().await;
    Ok(())
}

fn parse_schema(content: &str) -> Result<Vec<Blueprint>> {
    let file: SchemaFile = toml::from_str(content)?;
    file.tables.iter().map(to_blueprint).collect()
}

fn to_blueprint(table: &TableEntry) -> Result<Blueprint> {
    let mut blueprint = Blueprint::new(&table.name);

    for column in &table.columns {
        let ty: ColumnType = column
            .ty
            .parse()
            .with_context(|| format!("In column {}.{}", table.name, column.name))?;
        let def = blueprint.column(&column.name, ty);

        if column.nullable {
            def.nullable();
        }
        if column.unique {
            def.unique();
        }
        if let Some(default) = &column.default {
            def.default(default_value(default)?);
        }
    }

    if table.timestamps {
        blueprint.timestamps();
    }
    Ok(blueprint)
}

fn default_value(value: &toml::Value) -> Result<Value> {
    Ok(match value {
        toml::Value::String(s) => Value::from(s.as_str()),
        toml::Value::Integer(i) => Value::Int(*i),
        toml::Value::Float(f) => Value::Float(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        other => anyhow::bail!("unsupported default value {}", other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"
        [[table]]
        name = "users"
        timestamps = true

        [[table.column]]
        name = "id"
        type = "increments"

        [[table.column]]
        name = "email"
        type = "string(190)"
        unique = true

        [[table.column]]
        name = "active"
        type = "boolean"
        default = true
    "#;

    #[test]
    fn test_parse_schema_postgres() {
        let blueprints = parse_schema(SCHEMA).unwrap();
        assert_eq!(blueprints.len(), 1);
        assert_eq!(
            blueprints[0].to_create_sql(DatabaseType::PostgreSQL),
            "CREATE TABLE IF NOT EXISTS users (id SERIAL PRIMARY KEY, \
             email VARCHAR(190) NOT NULL UNIQUE, active BOOLEAN NOT NULL DEFAULT TRUE, \
             created_at VARCHAR(19) DEFAULT (to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS')), \
             updated_at VARCHAR(19))"
        );
    }

    #[test]
    fn test_unknown_column_type() {
        let err = parse_schema("[[table]]\nname = \"t\"\n[[table.column]]\nname = \"a\"\ntype = \"money\"")
            .unwrap_err();
        assert!(format!("{:#}", err).contains("money"));
    }

    #[test]
    fn test_array_default_is_rejected() {
        let schema = "[[table]]\nname = \"t\"\n[[table.column]]\nname = \"a\"\ntype = \"text\"\ndefault = [1]";
        assert!(parse_schema(schema).is_err());
    }
}
