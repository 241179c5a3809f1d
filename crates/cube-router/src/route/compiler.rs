//! Compiles parsed templates into anchored matchers
//!
//! The fold-style accumulator mirrors the template left to right, so the order
//! of `attributes` is always the order of capture groups in the regex.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use super::pattern::{parse_template, TemplateSegment};
use crate::path::normalize_path;
use crate::RouteError;

/// Upper bound for the compiled program of a single route
const MAX_REGEX_SIZE: usize = 1 << 20;

/// A compiled route template
///
/// # Examples
///
/// ```
/// use cube_router::compile;
///
/// let pattern = compile("/users/{id:int}").unwrap();
/// assert_eq!(pattern.regex_source(), "^/users/([0-9]+)/$");
/// assert_eq!(pattern.attributes(), ["id"]);
/// assert!(!pattern.has_optional_trailing_param());
/// ```
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<TemplateSegment>,
    regex: Regex,
    attributes: Vec<String>,
    optional_trailing: bool,
    case_insensitive: bool,
}

#[derive(Default)]
struct CompileState {
    source: String,
    attributes: Vec<String>,
    /// Set after an optional group that already consumed the following `/`
    skip_slash: bool,
}

impl CompileState {
    fn with_literal(mut self, text: &str) -> Self {
        let text = if self.skip_slash {
            text.strip_prefix('/').unwrap_or(text)
        } else {
            text
        };
        self.skip_slash = false;
        self.source.push_str(&regex::escape(text));
        self
    }

    fn with_required(mut self, name: &str, fragment: &str) -> Self {
        self.skip_slash = false;
        self.source.push('(');
        self.source.push_str(fragment);
        self.source.push(')');
        self.attributes.push(name.to_string());
        self
    }

    /// Optional capture; swallows the next `/` when the placeholder fills a whole segment
    fn with_optional(mut self, name: &str, fragment: &str, owns_slash: bool) -> Self {
        if owns_slash {
            self.source.push_str("(?:(");
            self.source.push_str(fragment);
            self.source.push_str(")/)?");
        } else {
            self.source.push('(');
            self.source.push_str(fragment);
            self.source.push_str(")?");
        }
        self.skip_slash = owns_slash;
        self.attributes.push(name.to_string());
        self
    }
}

/// Compiles a template with case-sensitive literals
pub fn compile(template: &str) -> Result<RoutePattern, RouteError> {
    RoutePattern::compile_with(template, false)
}

impl RoutePattern {
    pub fn compile(template: &str) -> Result<Self, RouteError> {
        Self::compile_with(template, false)
    }

    /// Compiles a template, optionally matching literals case-insensitively
    ///
    /// Fails with `RouteError::InvalidPattern` for malformed placeholders, stray
    /// braces, duplicate names, raw fragments that do not compile, and raw
    /// fragments that add capture groups of their own.
    pub fn compile_with(template: &str, case_insensitive: bool) -> Result<Self, RouteError> {
        let raw = if template.starts_with('/') {
            template.to_string()
        } else {
            format!("/{}", template)
        };

        let segments = parse_template(&raw)?;
        let optional_trailing = ends_with_optional_param(&segments);

        let state = segments.iter().enumerate().fold(
            CompileState {
                source: String::from("^"),
                ..Default::default()
            },
            |state, (idx, segment)| match segment {
                TemplateSegment::Literal(text) => state.with_literal(text),
                TemplateSegment::Param { name, ty, optional: false } => {
                    state.with_required(name, ty.fragment())
                }
                TemplateSegment::Param { name, ty, optional: true } => {
                    state.with_optional(name, ty.fragment(), fills_segment(&segments, idx))
                }
            },
        );

        let mut source = state.source;
        if !optional_trailing && !raw.ends_with('/') {
            source.push('/');
        }
        source.push('$');

        let regex = RegexBuilder::new(&source)
            .case_insensitive(case_insensitive)
            .size_limit(MAX_REGEX_SIZE)
            .build()
            .map_err(|e| RouteError::invalid(&raw, format!("compiled regex is invalid: {}", e)))?;

        // Raw fragments may smuggle in extra groups, which would shift every binding
        if regex.captures_len() - 1 != state.attributes.len() {
            return Err(RouteError::invalid(
                &raw,
                "raw type fragments must not contain capture groups; use (?:...)",
            ));
        }

        Ok(Self {
            raw,
            segments,
            regex,
            attributes: state.attributes,
            optional_trailing,
            case_insensitive,
        })
    }

    /// Template as authored (with a leading `/` added when missing)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn regex_source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    pub fn has_optional_trailing_param(&self) -> bool {
        self.optional_trailing
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Same template compiled with a different case sensitivity
    pub fn with_case_insensitive(&self, case_insensitive: bool) -> Result<Self, RouteError> {
        if self.case_insensitive == case_insensitive {
            return Ok(self.clone());
        }
        Self::compile_with(&self.raw, case_insensitive)
    }

    /// Same template with `prefix` prepended
    pub fn prefixed(&self, prefix: &str) -> Result<Self, RouteError> {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return Ok(self.clone());
        }
        Self::compile_with(&format!("{}{}", prefix, self.raw), self.case_insensitive)
    }

    /// Matches an already-normalized path and binds captures by position
    ///
    /// Optional placeholders that did not participate are left out of the map.
    pub fn captures(&self, normalized_path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(normalized_path)?;

        Some(
            self.attributes
                .iter()
                .zip(caps.iter().skip(1))
                .filter_map(|(name, m)| m.map(|m| (name.clone(), m.as_str().to_string())))
                .collect(),
        )
    }

    pub fn is_match(&self, normalized_path: &str) -> bool {
        self.regex.is_match(normalized_path)
    }

    /// Renders the template back into a path
    ///
    /// Returns `None` when a required placeholder is missing or when a value
    /// does not satisfy its placeholder's type.
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_router::compile;
    /// use std::collections::HashMap;
    ///
    /// let pattern = compile("/posts/{year:int}/{slug?}").unwrap();
    ///
    /// let mut params = HashMap::new();
    /// params.insert("year".to_string(), "2024".to_string());
    /// assert_eq!(pattern.render(&params), Some("/posts/2024/".to_string()));
    ///
    /// params.insert("slug".to_string(), "hello".to_string());
    /// assert_eq!(pattern.render(&params), Some("/posts/2024/hello".to_string()));
    ///
    /// params.insert("year".to_string(), "soon".to_string());
    /// assert_eq!(pattern.render(&params), None);
    /// ```
    pub fn render(&self, params: &HashMap<String, String>) -> Option<String> {
        let mut url = String::new();
        let mut skip_slash = false;

        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => {
                    let text = if skip_slash {
                        text.strip_prefix('/').unwrap_or(text)
                    } else {
                        text
                    };
                    url.push_str(text);
                    skip_slash = false;
                }
                TemplateSegment::Param { name, optional, .. } => match params.get(name) {
                    Some(value) => {
                        url.push_str(value);
                        skip_slash = false;
                    }
                    None if *optional => skip_slash = url.ends_with('/'),
                    None => return None,
                },
            }
        }

        if self.is_match(&normalize_path(&url)) {
            Some(url)
        } else {
            None
        }
    }
}

/// True when the placeholder at `idx` spans a whole `/`-delimited segment
fn fills_segment(segments: &[TemplateSegment], idx: usize) -> bool {
    let starts_segment = match idx.checked_sub(1).map(|prev| &segments[prev]) {
        None => true,
        Some(TemplateSegment::Literal(prev)) => prev.ends_with('/'),
        Some(TemplateSegment::Param { .. }) => false,
    };
    let ends_segment = match segments.get(idx + 1) {
        None => true,
        Some(TemplateSegment::Literal(next)) => next.starts_with('/'),
        Some(TemplateSegment::Param { .. }) => false,
    };
    starts_segment && ends_segment
}

/// True when the last segment of the path is an optional placeholder
fn ends_with_optional_param(segments: &[TemplateSegment]) -> bool {
    let last_param = match segments.iter().rposition(|s| matches!(s, TemplateSegment::Param { .. })) {
        Some(idx) => idx,
        None => return false,
    };
    let tail_is_slash = segments[last_param + 1..]
        .iter()
        .all(|s| matches!(s, TemplateSegment::Literal(text) if text == "/"));

    matches!(segments[last_param], TemplateSegment::Param { optional: true, .. })
        && tail_is_slash
        && fills_segment(segments, last_param)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_route_enforces_trailing_slash() {
        let pattern = compile("/about").unwrap();
        assert_eq!(pattern.regex_source(), "^/about/$");
        assert!(pattern.attributes().is_empty());
    }

    #[test]
    fn test_literal_route_already_slashed() {
        let pattern = compile("/about/").unwrap();
        assert_eq!(pattern.regex_source(), "^/about/$");
    }

    #[test]
    fn test_root() {
        assert_eq!(compile("/").unwrap().regex_source(), "^/$");
        assert_eq!(compile("").unwrap().regex_source(), "^/$");
    }

    #[test]
    fn test_missing_leading_slash_is_added() {
        let pattern = compile("users/{id}").unwrap();
        assert_eq!(pattern.raw(), "/users/{id}");
        assert_eq!(pattern.regex_source(), "^/users/([^/]+)/$");
    }

    #[test]
    fn test_literals_are_escaped() {
        let pattern = compile("/feed.xml").unwrap();
        assert_eq!(pattern.regex_source(), r"^/feed\.xml/$");
        assert!(!pattern.is_match("/feedXxml/"));
    }

    #[test]
    fn test_optional_trailing_absorbs_slash() {
        let pattern = compile("/posts/{slug?}").unwrap();
        assert!(pattern.has_optional_trailing_param());
        assert_eq!(pattern.regex_source(), "^/posts/(?:([^/]+)/)?$");
    }

    #[test]
    fn test_optional_trailing_with_authored_slash() {
        let pattern = compile("/posts/{slug?}/").unwrap();
        assert!(pattern.has_optional_trailing_param());
        assert_eq!(pattern.regex_source(), "^/posts/(?:([^/]+)/)?$");
    }

    #[test]
    fn test_optional_in_the_middle() {
        let pattern = compile("/a/{x:int?}/b").unwrap();
        assert!(!pattern.has_optional_trailing_param());
        assert_eq!(pattern.regex_source(), "^/a/(?:([0-9]+)/)?b/$");
        assert!(pattern.is_match("/a/b/"));
        assert!(pattern.is_match("/a/7/b/"));
    }

    #[test]
    fn test_optional_inside_segment() {
        let pattern = compile("/files/{name}.{ext?}").unwrap();
        assert_eq!(pattern.regex_source(), r"^/files/([^/]+)\.([^/]+)?/$");
    }

    #[test]
    fn test_raw_fragment_with_capture_group_rejected() {
        let err = compile("/x/{v:(a|b)}").unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { .. }));
    }

    #[test]
    fn test_raw_fragment_non_capturing_allowed() {
        let pattern = compile("/x/{v:(?:a|b)}").unwrap();
        assert_eq!(pattern.regex_source(), "^/x/((?:a|b))/$");
        assert!(pattern.is_match("/x/a/"));
        assert!(!pattern.is_match("/x/c/"));
    }

    #[test]
    fn test_raw_fragment_that_does_not_compile() {
        assert!(matches!(
            compile("/x/{v:*int}"),
            Err(RouteError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_case_insensitive_literals() {
        let pattern = RoutePattern::compile_with("/About", true).unwrap();
        assert!(pattern.is_match("/about/"));
        assert!(!compile("/About").unwrap().is_match("/about/"));
    }

    #[test]
    fn test_prefixed() {
        let pattern = compile("/users/{id:int}").unwrap().prefixed("/admin/").unwrap();
        assert_eq!(pattern.raw(), "/admin/users/{id:int}");
        assert!(pattern.is_match("/admin/users/3/"));
    }

    #[test]
    fn test_captures_skip_absent_optional() {
        let pattern = compile("/posts/{slug?}").unwrap();
        assert!(pattern.captures("/posts/").unwrap().is_empty());
        assert_eq!(
            pattern.captures("/posts/hello/").unwrap().get("slug"),
            Some(&"hello".to_string())
        );
    }

    #[test]
    fn test_render_missing_required() {
        let pattern = compile("/users/{id:int}").unwrap();
        assert_eq!(pattern.render(&HashMap::new()), None);
    }

    #[test]
    fn test_render_optional_middle_omitted() {
        let pattern = compile("/a/{x:int?}/b").unwrap();
        assert_eq!(pattern.render(&HashMap::new()), Some("/a/b".to_string()));
    }
}
