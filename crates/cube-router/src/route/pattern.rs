//! Token parsing for route templates
//!
//! Splits a template like `/users/{id:int}/posts/{slug?}` into literal text and
//! typed placeholders. Everything here is pure: same template in, same segments out.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::RouteError;

/// Non-greedy scan for `{...}` placeholders
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(.*?)\}").expect("token regex is valid"));

/// Placeholder type and the regex fragment it stands for
///
/// # Examples
///
/// ```
/// use cube_router::route::pattern::ParamType;
///
/// assert_eq!(ParamType::from_name("int"), ParamType::Int);
/// assert_eq!(ParamType::Int.fragment(), "[0-9]+");
///
/// // Unknown names are kept verbatim as a regex fragment
/// assert_eq!(ParamType::from_name("[a-z]{2}").fragment(), "[a-z]{2}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// `[0-9]+`
    Int,
    /// `[\w]+`
    String,
    /// `true|false`
    Bool,
    /// `[^/]+`, also used for untyped placeholders
    Any,
    /// `.*?`, may span several path segments
    All,
    /// Anything else, inserted as an unvalidated regex fragment
    Raw(String),
}

impl ParamType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "int" => ParamType::Int,
            "string" => ParamType::String,
            "bool" => ParamType::Bool,
            "any" => ParamType::Any,
            "all" => ParamType::All,
            other => ParamType::Raw(other.to_string()),
        }
    }

    pub fn fragment(&self) -> &str {
        match self {
            ParamType::Int => "[0-9]+",
            ParamType::String => r"[\w]+",
            ParamType::Bool => "true|false",
            ParamType::Any => "[^/]+",
            ParamType::All => ".*?",
            ParamType::Raw(fragment) => fragment,
        }
    }
}

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    /// Text matched verbatim
    Literal(String),
    /// A named capture
    Param {
        name: String,
        ty: ParamType,
        optional: bool,
    },
}

/// Parses the inside of a `{...}` token into `(name, type, optional)`
///
/// Accepted forms: `name`, `name?`, `name:type`, `name:type?`.
/// Returns the reason on failure so the caller can attach the template.
///
/// # Examples
///
/// ```
/// use cube_router::route::pattern::{parse_token, ParamType};
///
/// assert_eq!(parse_token("id"), Ok(("id".to_string(), ParamType::Any, false)));
/// assert_eq!(parse_token("id:int?"), Ok(("id".to_string(), ParamType::Int, true)));
/// assert!(parse_token("id:int:extra").is_err());
/// ```
pub fn parse_token(inner: &str) -> Result<(String, ParamType, bool), String> {
    let (name, ty, optional) = match inner.split_once(':') {
        // Colons are allowed only as part of a non-capturing `(?:` group
        Some((_, rest)) if rest.replace("(?:", "").contains(':') => {
            return Err(format!("placeholder `{{{}}}` has more than one `:`", inner));
        }
        Some((name, type_name)) => {
            let (type_name, optional) = match type_name.strip_suffix('?') {
                Some(stripped) => (stripped, true),
                None => (type_name, false),
            };
            if type_name.is_empty() {
                return Err(format!("placeholder `{{{}}}` has an empty type", inner));
            }
            (name, ParamType::from_name(type_name), optional)
        }
        None => match inner.strip_suffix('?') {
            Some(name) => (name, ParamType::Any, true),
            None => (inner, ParamType::Any, false),
        },
    };

    if !is_valid_name(name) {
        return Err(format!("`{}` is not a valid placeholder name", name));
    }

    Ok((name.to_string(), ty, optional))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Splits a template into literal and placeholder segments
///
/// Literal text may not contain a stray `{` or `}`; placeholder names must be
/// unique within the template.
pub fn parse_template(template: &str) -> Result<Vec<TemplateSegment>, RouteError> {
    let mut segments = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    let mut cursor = 0;

    for caps in TOKEN.captures_iter(template) {
        let whole = caps.get(0).expect("group 0 always participates");
        let inner = caps.get(1).map_or("", |m| m.as_str());

        push_literal(template, &mut segments, &template[cursor..whole.start()])?;
        cursor = whole.end();

        let (name, ty, optional) =
            parse_token(inner).map_err(|reason| RouteError::invalid(template, reason))?;

        if names.contains(&inner_name(inner)) {
            return Err(RouteError::invalid(
                template,
                format!("placeholder `{}` appears more than once", name),
            ));
        }
        names.push(inner_name(inner));

        segments.push(TemplateSegment::Param { name, ty, optional });
    }

    push_literal(template, &mut segments, &template[cursor..])?;
    Ok(segments)
}

fn push_literal(
    template: &str,
    segments: &mut Vec<TemplateSegment>,
    text: &str,
) -> Result<(), RouteError> {
    if text.contains('{') || text.contains('}') {
        return Err(RouteError::invalid(template, format!("unbalanced brace in `{}`", text)));
    }
    if !text.is_empty() {
        segments.push(TemplateSegment::Literal(text.to_string()));
    }
    Ok(())
}

/// Name part of a raw token, borrowed from the template
fn inner_name(inner: &str) -> &str {
    let name = inner.split(':').next().unwrap_or(inner);
    name.strip_suffix('?').unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_untyped() {
        assert_eq!(parse_token("slug"), Ok(("slug".to_string(), ParamType::Any, false)));
    }

    #[test]
    fn test_parse_token_untyped_optional() {
        assert_eq!(parse_token("slug?"), Ok(("slug".to_string(), ParamType::Any, true)));
    }

    #[test]
    fn test_parse_token_typed() {
        assert_eq!(parse_token("id:int"), Ok(("id".to_string(), ParamType::Int, false)));
        assert_eq!(parse_token("on:bool"), Ok(("on".to_string(), ParamType::Bool, false)));
        assert_eq!(parse_token("rest:all"), Ok(("rest".to_string(), ParamType::All, false)));
    }

    #[test]
    fn test_parse_token_raw_type() {
        assert_eq!(
            parse_token("code:[A-Z]+"),
            Ok(("code".to_string(), ParamType::Raw("[A-Z]+".to_string()), false))
        );
    }

    #[test]
    fn test_parse_token_rejects_two_colons() {
        assert!(parse_token("id:int:extra").is_err());
        assert!(parse_token("v:(?:a|b):c").is_err());
    }

    #[test]
    fn test_parse_token_accepts_non_capturing_group() {
        assert_eq!(
            parse_token("v:(?:a|b)"),
            Ok(("v".to_string(), ParamType::Raw("(?:a|b)".to_string()), false))
        );
    }

    #[test]
    fn test_parse_token_rejects_empty_parts() {
        assert!(parse_token("").is_err());
        assert!(parse_token("?").is_err());
        assert!(parse_token(":int").is_err());
        assert!(parse_token("id:").is_err());
        assert!(parse_token("id:?").is_err());
    }

    #[test]
    fn test_parse_template_segments() {
        let segments = parse_template("/users/{id:int}/posts/{slug?}").unwrap();
        assert_eq!(
            segments,
            vec![
                TemplateSegment::Literal("/users/".to_string()),
                TemplateSegment::Param {
                    name: "id".to_string(),
                    ty: ParamType::Int,
                    optional: false,
                },
                TemplateSegment::Literal("/posts/".to_string()),
                TemplateSegment::Param {
                    name: "slug".to_string(),
                    ty: ParamType::Any,
                    optional: true,
                },
            ]
        );
    }

    #[test]
    fn test_parse_template_literal_only() {
        let segments = parse_template("/about").unwrap();
        assert_eq!(segments, vec![TemplateSegment::Literal("/about".to_string())]);
    }

    #[test]
    fn test_parse_template_stray_brace() {
        assert!(matches!(
            parse_template("/users/{id"),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(matches!(
            parse_template("/users/id}"),
            Err(RouteError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_parse_template_duplicate_name() {
        assert!(matches!(
            parse_template("/{id}/{id:int}"),
            Err(RouteError::InvalidPattern { .. })
        ));
    }
}
