//! Table blueprints rendered to dialect-specific DDL

use std::str::FromStr;

use crate::database::DatabaseType;
use crate::error::QueryError;
use crate::value::Value;

/// Portable column types
///
/// Timestamps, dates and JSON are stored as text on every backend, in the
/// `YYYY-MM-DD HH:MM:SS` form statements bind, because the `Any` driver
/// cannot carry native date/time or JSON values. SQLite has no boolean
/// storage class, so booleans land on `INTEGER` there.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    /// Auto-incrementing integer primary key
    Increments,
    Integer,
    BigInteger,
    Boolean,
    Float,
    Double,
    /// `VARCHAR(n)`
    String(u32),
    Text,
    Timestamp,
    Date,
    Json,
    Binary,
}

impl ColumnType {
    pub fn sql(&self, db_type: DatabaseType) -> String {
        use DatabaseType::*;

        match (self, db_type) {
            (ColumnType::Increments, PostgreSQL) => "SERIAL PRIMARY KEY".to_string(),
            (ColumnType::Increments, SQLite) => "INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            (ColumnType::Increments, MySQL) => "INT AUTO_INCREMENT PRIMARY KEY".to_string(),
            (ColumnType::Integer, _) => "INTEGER".to_string(),
            (ColumnType::BigInteger, _) => "BIGINT".to_string(),
            (ColumnType::Boolean, SQLite) => "INTEGER".to_string(),
            (ColumnType::Boolean, _) => "BOOLEAN".to_string(),
            (ColumnType::Float, _) => "REAL".to_string(),
            (ColumnType::Double, PostgreSQL) => "DOUBLE PRECISION".to_string(),
            (ColumnType::Double, _) => "DOUBLE".to_string(),
            (ColumnType::String(len), _) => format!("VARCHAR({})", len),
            (ColumnType::Text, _) => "TEXT".to_string(),
            (ColumnType::Timestamp | ColumnType::Date | ColumnType::Json, SQLite) => {
                "TEXT".to_string()
            }
            (ColumnType::Timestamp, _) => "VARCHAR(19)".to_string(),
            (ColumnType::Date, _) => "VARCHAR(10)".to_string(),
            (ColumnType::Json, _) => "TEXT".to_string(),
            (ColumnType::Binary, PostgreSQL) => "BYTEA".to_string(),
            (ColumnType::Binary, _) => "BLOB".to_string(),
        }
    }
}

/// Parses type names as written in schema files
///
/// # Examples
///
/// ```
/// use cube_db::ColumnType;
///
/// assert_eq!("string(64)".parse::<ColumnType>().unwrap(), ColumnType::String(64));
/// assert_eq!("string".parse::<ColumnType>().unwrap(), ColumnType::String(255));
/// assert_eq!("BIGINT".parse::<ColumnType>().unwrap(), ColumnType::BigInteger);
/// assert!("money".parse::<ColumnType>().is_err());
/// ```
impl FromStr for ColumnType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();

        if let Some(len) = lower
            .strip_prefix("string(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return len
                .trim()
                .parse()
                .map(ColumnType::String)
                .map_err(|_| QueryError::invalid(format!("bad string length in `{}`", s)));
        }

        match lower.as_str() {
            "increments" => Ok(ColumnType::Increments),
            "integer" | "int" => Ok(ColumnType::Integer),
            "biginteger" | "bigint" => Ok(ColumnType::BigInteger),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "float" => Ok(ColumnType::Float),
            "double" => Ok(ColumnType::Double),
            "string" => Ok(ColumnType::String(255)),
            "text" => Ok(ColumnType::Text),
            "timestamp" => Ok(ColumnType::Timestamp),
            "date" => Ok(ColumnType::Date),
            "json" => Ok(ColumnType::Json),
            "binary" => Ok(ColumnType::Binary),
            _ => Err(QueryError::invalid(format!("unknown column type `{}`", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    Value(Value),
    CurrentTimestamp,
}

/// One column of a blueprint, tuned through chained `&mut` setters
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    pub default: Option<ColumnDefault>,
}

impl ColumnDef {
    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    pub fn default(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default = Some(ColumnDefault::Value(value.into()));
        self
    }

    pub fn default_current_timestamp(&mut self) -> &mut Self {
        self.default = Some(ColumnDefault::CurrentTimestamp);
        self
    }

    fn sql(&self, db_type: DatabaseType) -> String {
        let mut sql = format!("{} {}", self.name, self.ty.sql(db_type));

        if self.ty != ColumnType::Increments && !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        match &self.default {
            Some(ColumnDefault::CurrentTimestamp) => {
                sql.push_str(" DEFAULT ");
                sql.push_str(current_timestamp(db_type));
            }
            Some(ColumnDefault::Value(value)) => {
                sql.push_str(" DEFAULT ");
                sql.push_str(&literal(value));
            }
            None => {}
        }
        sql
    }
}

/// Default expression yielding the current UTC time as `YYYY-MM-DD HH:MM:SS` text
fn current_timestamp(db_type: DatabaseType) -> &'static str {
    match db_type {
        DatabaseType::SQLite => "CURRENT_TIMESTAMP",
        DatabaseType::PostgreSQL => {
            "(to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS'))"
        }
        DatabaseType::MySQL => "(DATE_FORMAT(UTC_TIMESTAMP(), '%Y-%m-%d %H:%i:%s'))",
    }
}

/// SQL literal for a DDL default
fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Timestamp(ts) => format!("'{}'", ts.format(crate::value::TIMESTAMP_FORMAT)),
    }
}

/// Columns of a table to be created
///
/// # Examples
///
/// ```
/// use cube_db::database::DatabaseType;
/// use cube_db::schema::Blueprint;
///
/// let users = Blueprint::create("users", |t| {
///     t.increments("id");
///     t.string("email", 255).unique();
///     t.text("bio").nullable();
/// });
///
/// assert_eq!(
///     users.to_create_sql(DatabaseType::SQLite),
///     "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY AUTOINCREMENT, \
///      email VARCHAR(255) NOT NULL UNIQUE, bio TEXT)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    table: String,
    columns: Vec<ColumnDef>,
}

impl Blueprint {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    pub fn create(table: impl Into<String>, define: impl FnOnce(&mut Blueprint)) -> Self {
        let mut blueprint = Self::new(table);
        define(&mut blueprint);
        blueprint
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&mut self, name: &str, ty: ColumnType) -> &mut ColumnDef {
        self.columns.push(ColumnDef {
            name: name.to_string(),
            ty,
            nullable: false,
            unique: false,
            default: None,
        });
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }

    pub fn increments(&mut self, name: &str) -> &mut ColumnDef {
        self.column(name, ColumnType::Increments)
    }

    pub fn integer(&mut self, name: &str) -> &mut ColumnDef {
        self.column(name, ColumnType::Integer)
    }

    pub fn big_integer(&mut self, name: &str) -> &mut ColumnDef {
        self.column(name, ColumnType::BigInteger)
    }

    pub fn boolean(&mut self, name: &str) -> &mut ColumnDef {
        self.column(name, ColumnType::Boolean)
    }

    pub fn double(&mut self, name: &str) -> &mut ColumnDef {
        self.column(name, ColumnType::Double)
    }

    pub fn string(&mut self, name: &str, len: u32) -> &mut ColumnDef {
        self.column(name, ColumnType::String(len))
    }

    pub fn text(&mut self, name: &str) -> &mut ColumnDef {
        self.column(name, ColumnType::Text)
    }

    pub fn timestamp(&mut self, name: &str) -> &mut ColumnDef {
        self.column(name, ColumnType::Timestamp)
    }

    pub fn json(&mut self, name: &str) -> &mut ColumnDef {
        self.column(name, ColumnType::Json)
    }

    /// Nullable `created_at` (defaulting to now) and `updated_at`
    pub fn timestamps(&mut self) {
        self.timestamp("created_at").nullable().default_current_timestamp();
        self.timestamp("updated_at").nullable();
    }

    pub fn to_create_sql(&self, db_type: DatabaseType) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| c.sql(db_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({})", self.table, columns)
    }

    pub fn drop_sql(table: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", table)
    }
}
