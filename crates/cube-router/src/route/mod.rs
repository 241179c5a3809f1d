//! Route template parsing and compilation
//!
//! - `pattern`: splits a template into literal text and typed placeholders
//! - `compiler`: turns those segments into an anchored regex plus attribute list

pub mod compiler;
pub mod pattern;

pub use compiler::{compile, RoutePattern};
pub use pattern::{parse_template, parse_token, ParamType, TemplateSegment};
