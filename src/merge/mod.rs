//! The token reconstruction and substitution engine.
//!
//! Template markers (`{{ field }}`) are written by a human, but the editor
//! stores paragraph text as formatting runs split at arbitrary character
//! boundaries — a marker frequently arrives fragmented across several runs,
//! where no single run holds valid template syntax. This module restores
//! the logical text stream and substitutes row values:
//!
//! 1. [`merge_paragraph_tokens`] scans each paragraph's runs once,
//!    reassembling split markers into the first run of the marker (the
//!    anchor) and emptying the runs that were consumed. Formatting of
//!    surviving runs is untouched; inside a reconstructed marker, the
//!    anchor's formatting wins.
//! 2. [`substitute_document`] then renders every run's text against the
//!    row context, uniformly, across body paragraphs and table cells.
//!
//! Syntax rules live in exactly one place: [`TemplateRenderer`], which the
//! merger also uses as its probe for "does this marker close within this
//! run".

mod context;
mod runmerge;
mod substitute;
mod template;

pub use context::RowContext;
pub use runmerge::merge_paragraph_tokens;
pub use substitute::{substitute_document, substitute_paragraph};
pub use template::TemplateRenderer;
