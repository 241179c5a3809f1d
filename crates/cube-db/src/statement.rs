//! Rendered statements and the small enums used to build them

use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;
use crate::value::Value;

/// SQL text with `?` placeholders plus the values bound to them, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Number of `?` placeholders outside quoted literals
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut quote: Option<char> = None;
        for c in self.sql.chars() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if c == '\'' || c == '"' => quote = Some(c),
                None if c == '?' => count += 1,
                None => {}
            }
        }
        count
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// Comparison operators accepted by `where_op` and friends
///
/// # Examples
///
/// ```
/// use cube_db::Cmp;
///
/// assert_eq!("<>".parse::<Cmp>().unwrap(), Cmp::Ne);
/// assert_eq!("like".parse::<Cmp>().unwrap(), Cmp::Like);
/// assert!("~".parse::<Cmp>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
}

impl Cmp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cmp::Eq => "=",
            Cmp::Ne => "<>",
            Cmp::Lt => "<",
            Cmp::Le => "<=",
            Cmp::Gt => ">",
            Cmp::Ge => ">=",
            Cmp::Like => "LIKE",
            Cmp::NotLike => "NOT LIKE",
        }
    }
}

impl FromStr for Cmp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "=" | "==" => Ok(Cmp::Eq),
            "<>" | "!=" => Ok(Cmp::Ne),
            "<" => Ok(Cmp::Lt),
            "<=" => Ok(Cmp::Le),
            ">" => Ok(Cmp::Gt),
            ">=" => Ok(Cmp::Ge),
            "LIKE" => Ok(Cmp::Like),
            "NOT LIKE" => Ok(Cmp::NotLike),
            other => Err(QueryError::invalid(format!("unknown operator `{}`", other))),
        }
    }
}

impl fmt::Display for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for `order_by`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(QueryError::invalid(format!("unknown sort direction `{}`", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_count_skips_quoted() {
        let stmt = Statement::new("SELECT * FROM t WHERE a = ? AND b = '?' AND c = ?", vec![]);
        assert_eq!(stmt.placeholder_count(), 2);
    }

    #[test]
    fn test_cmp_aliases() {
        assert_eq!("!=".parse::<Cmp>().unwrap(), Cmp::Ne);
        assert_eq!("not like".parse::<Cmp>().unwrap(), Cmp::NotLike);
        assert_eq!(" >= ".parse::<Cmp>().unwrap(), Cmp::Ge);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("DESC".parse::<Direction>().unwrap(), Direction::Desc);
        assert!("down".parse::<Direction>().is_err());
    }
}
