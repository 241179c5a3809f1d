//! Middleware keys attached to routes
//!
//! Keys are stored verbatim on the route (`auth`, `role:admin`, `throttle:60:1`);
//! the first colon-delimited part names the middleware and the rest are its arguments.

/// A parsed middleware key
///
/// # Examples
///
/// ```
/// use cube_router::Middleware;
///
/// let mw = Middleware::parse("throttle:60:1");
/// assert_eq!(mw.name, "throttle");
/// assert_eq!(mw.args, vec!["60", "1"]);
///
/// let mw = Middleware::parse("auth");
/// assert!(mw.args.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Middleware<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

impl<'a> Middleware<'a> {
    pub fn parse(key: &'a str) -> Self {
        let mut parts = key.split(':');
        let name = parts.next().unwrap_or_default();
        Self {
            name,
            args: parts.filter(|arg| !arg.is_empty()).collect(),
        }
    }
}
