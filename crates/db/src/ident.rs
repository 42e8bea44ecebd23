// crates/db/src/ident.rs
//! Allow-list guard for identifiers spliced into generated SQL.
//!
//! Schema and view names cannot be bound as query parameters, and instance
//! names originate from directory names on disk. Anything interpolated into
//! an identifier position must first pass through [`Ident::parse`] —
//! rejection skips the statement, it is never "sanitized" into shape.

use std::fmt;
use thiserror::Error;

/// A validated SQL identifier fragment: non-empty, `[A-Za-z0-9_]` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid identifier {0:?}: only alphanumerics and underscore are allowed")]
pub struct InvalidIdent(pub String);

impl Ident {
    pub fn parse(raw: &str) -> Result<Self, InvalidIdent> {
        if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Ok(Ident(raw.to_string()))
        } else {
            Err(InvalidIdent(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_alphanumerics_and_underscore() {
        for name in ["default", "work", "home_lab", "Node2", "_x", "42"] {
            assert!(Ident::parse(name).is_ok(), "name: {name}");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for name in [
            "",
            "bad-name",
            "a.b",
            "semi;colon",
            "quo'te",
            "white space",
            "v_x; DROP TABLE messages--",
            "ünïcode",
        ] {
            assert_eq!(
                Ident::parse(name),
                Err(InvalidIdent(name.to_string())),
                "name: {name}"
            );
        }
    }

    #[test]
    fn preserves_the_input_verbatim() {
        assert_eq!(Ident::parse("home_lab").unwrap().as_str(), "home_lab");
    }
}
