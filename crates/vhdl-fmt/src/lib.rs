//! Layout core of the VHDL formatter.
//!
//! A front end turns a parsed design unit into a [`Doc`], a tree of layout
//! intent. This crate owns everything after that point:
//!
//! 1. [`printer::print`] chooses between the flat and broken alternative at
//!    every `Union` and renders the text,
//! 2. [`align::resolve`] pads aligned columns when the printer enters an
//!    `Align` scope,
//! 3. [`verify::ensure_safety`] re-tokenizes both texts and checks that the
//!    output still denotes the same program.
//!
//! Only verified output is ever written back; see [`write_verified`].
//!
//! # Example
//!
//! ```
//! use vhdl_fmt::doc::*;
//! use vhdl_fmt::{format_verified, FormatConfig};
//!
//! let doc = concat_all([
//!     keyword("ENTITY"),
//!     text(" counter "),
//!     keyword("IS"),
//!     hardline(),
//!     keyword("END"),
//!     text(";"),
//! ]);
//! let out = format_verified("entity counter is end;", &doc, &FormatConfig::default()).unwrap();
//! assert_eq!(out, "entity counter is\nend;");
//! ```

pub mod align;
pub mod config;
pub mod doc;
pub mod printer;
pub mod verify;
pub mod walker;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

pub use config::{Casing, ConfigError, EndOfLine, FormatConfig, IndentStyle};
pub use doc::{Doc, DocNode};
pub use verify::{TokenStream, VerifyError};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What [`write_verified`] did with the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The formatted text equals the original; nothing was written.
    Unchanged,
    Written,
}

/// Render `doc` without verification.
pub fn format_document(doc: &Doc, config: &FormatConfig) -> String {
    printer::print(doc, config)
}

/// Render `doc` and check the result against `original`.
///
/// Returns the formatted text only if it is equivalent to `original`.
pub fn format_verified(
    original: &str,
    doc: &Doc,
    config: &FormatConfig,
) -> Result<String, FormatError> {
    let formatted = printer::print(doc, config);
    verify::ensure_safety(&TokenStream::lex(original), &TokenStream::lex(&formatted))?;
    debug!(bytes = formatted.len(), "verified formatted output");
    Ok(formatted)
}

/// Render, verify and write `path`.
///
/// Nothing is written when verification fails or when the formatted text is
/// identical to `original`.
pub fn write_verified(
    path: &Path,
    original: &str,
    doc: &Doc,
    config: &FormatConfig,
) -> Result<WriteOutcome, FormatError> {
    let formatted = format_verified(original, doc, config)?;
    if formatted == original {
        debug!(path = %path.display(), "already formatted");
        return Ok(WriteOutcome::Unchanged);
    }
    std::fs::write(path, &formatted).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "formatted");
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::*;

    fn entity_doc(name: &str) -> Doc {
        concat_all([
            keyword("entity"),
            text(format!(" {name} ")),
            keyword("is"),
            hardline(),
            keyword("end"),
            text(" "),
            keyword("entity"),
            text(format!(" {name};")),
        ])
    }

    #[test]
    fn format_document_renders() {
        assert_eq!(
            format_document(&entity_doc("e"), &FormatConfig::default()),
            "entity e is\nend entity e;"
        );
    }

    #[test]
    fn format_verified_accepts_end_label() {
        let out = format_verified("ENTITY e IS END;", &entity_doc("e"), &FormatConfig::default());
        assert_eq!(out.unwrap(), "entity e is\nend entity e;");
    }

    #[test]
    fn format_verified_rejects_renamed_unit() {
        let err = format_verified("entity e is end;", &entity_doc("f"), &FormatConfig::default())
            .unwrap_err();
        assert!(matches!(err, FormatError::Verify(VerifyError::Mismatch { .. })));
        assert!(err.to_string().starts_with("semantic mismatch"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = entity_doc("counter");
        let config = FormatConfig::default();
        assert_eq!(format_document(&doc, &config), format_document(&doc, &config));
    }
}
