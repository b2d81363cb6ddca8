//! Common types shared across the library.

mod error;

pub use error::{Error, Result};

/// Resolve a single XML general entity reference (e.g. `amp`, `#x41`) to its
/// textual value.
///
/// quick-xml emits entity references inside text as distinct
/// [`Event::GeneralRef`](quick_xml::events::Event::GeneralRef) events rather
/// than unescaping them inline, so callers collecting character data must
/// resolve them explicitly.
pub(crate) fn resolve_entity_ref(r: &quick_xml::events::BytesRef) -> Result<String> {
    let name = r.decode().map_err(|e| Error::Xml(e.to_string()))?;
    let resolved = quick_xml::escape::unescape(&format!("&{name};"))
        .map_err(|e| Error::Xml(e.to_string()))?;
    Ok(resolved.into_owned())
}
