/// Paragraph and Run structures for Word documents.
use smallvec::SmallVec;

/// A paragraph in a Word document.
///
/// Represents a `<w:p>` element. Paragraphs contain runs which in turn
/// contain the actual text; paragraph properties (`<w:pPr>`) and any
/// non-run children (hyperlinks, bookmarks, proofing marks) are kept as raw
/// XML and re-emitted verbatim on save.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Raw attribute text of the `<w:p>` start tag (e.g. revision ids)
    pub(crate) attrs_xml: String,
    /// Raw `<w:pPr>` element, empty if the paragraph has none
    pub(crate) props_xml: String,
    /// Children in document order
    pub(crate) children: Vec<ParaChild>,
}

/// A child of a paragraph: either a run the engine operates on, or an
/// opaque XML fragment carried through untouched.
#[derive(Debug, Clone)]
pub(crate) enum ParaChild {
    Run(Run),
    Raw(String),
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run to the paragraph.
    pub fn push_run(&mut self, run: Run) {
        self.children.push(ParaChild::Run(run));
    }

    /// Get the text content of this paragraph.
    ///
    /// Concatenates the text of all runs in the paragraph.
    pub fn text(&self) -> String {
        let mut result = String::new();
        for child in &self.children {
            if let ParaChild::Run(run) = child {
                result.push_str(&run.text);
            }
        }
        result
    }

    /// Get the runs in this paragraph, in document order.
    pub fn runs(&self) -> SmallVec<[&Run; 8]> {
        self.children
            .iter()
            .filter_map(|child| match child {
                ParaChild::Run(run) => Some(run),
                ParaChild::Raw(_) => None,
            })
            .collect()
    }

    /// Get mutable references to the runs in this paragraph.
    pub fn runs_mut(&mut self) -> SmallVec<[&mut Run; 8]> {
        self.children
            .iter_mut()
            .filter_map(|child| match child {
                ParaChild::Run(run) => Some(run),
                ParaChild::Raw(_) => None,
            })
            .collect()
    }

    /// Number of runs in this paragraph.
    pub fn run_count(&self) -> usize {
        self.children
            .iter()
            .filter(|child| matches!(child, ParaChild::Run(_)))
            .count()
    }
}

/// A text run in a paragraph.
///
/// Represents a `<w:r>` element: a minimal span of text sharing one set of
/// character formatting. The formatting (`<w:rPr>`) and any non-text run
/// content (drawings, field characters) are opaque payload preserved across
/// text mutation. Tabs and line breaks round-trip through the text as
/// `'\t'` and `'\n'`.
#[derive(Debug, Clone, Default)]
pub struct Run {
    /// Raw attribute text of the `<w:r>` start tag
    pub(crate) attrs_xml: String,
    /// Raw `<w:rPr>` element, empty if the run has none
    pub(crate) props_xml: String,
    /// The run's text content
    pub(crate) text: String,
    /// Raw non-text children (`<w:drawing>`, `<w:fldChar>`, ...) re-emitted
    /// after the text on save
    pub(crate) extras_xml: String,
}

impl Run {
    /// Create a new run with the given text and no formatting.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Get the text content of the run.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set the text content, leaving formatting untouched.
    #[inline]
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }

    /// Check if the run carries formatting properties.
    #[inline]
    pub fn has_properties(&self) -> bool {
        !self.props_xml.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_text_concatenates_runs() {
        let mut para = Paragraph::new();
        para.push_run(Run::new("Hello, "));
        para.push_run(Run::new("world"));
        para.children.push(ParaChild::Raw("<w:proofErr/>".to_string()));
        para.push_run(Run::new("!"));

        assert_eq!(para.text(), "Hello, world!");
        assert_eq!(para.run_count(), 3);
    }

    #[test]
    fn test_runs_skip_raw_children() {
        let mut para = Paragraph::new();
        para.children.push(ParaChild::Raw("<w:bookmarkStart/>".to_string()));
        para.push_run(Run::new("a"));

        let runs = para.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text(), "a");
    }

    #[test]
    fn test_run_set_text_keeps_properties() {
        let mut run = Run::new("old");
        run.props_xml = "<w:rPr><w:b/></w:rPr>".to_string();
        run.set_text("new");

        assert_eq!(run.text(), "new");
        assert!(run.has_properties());
    }
}
