//! Document-wide substitution.
//!
//! Two passes over the whole document. Pass 1 only resolves *where*
//! delimiters are, merging markers split across run boundaries; pass 2
//! renders every run's text uniformly, including runs that never needed
//! merging. A syntax error in pass 2 means the template is malformed even
//! after merging — it propagates and aborts the batch rather than silently
//! producing a partially substituted document.

use crate::common::Result;
use crate::docx::{Document, Paragraph};
use crate::merge::context::RowContext;
use crate::merge::runmerge::merge_paragraph_tokens;
use crate::merge::template::TemplateRenderer;

/// Merge and substitute every paragraph of a document in place: body
/// paragraphs and the paragraphs of every table cell.
pub fn substitute_document(
    document: &mut Document,
    renderer: &TemplateRenderer,
    ctx: &RowContext,
) -> Result<()> {
    // Pass 1: reassemble split markers.
    document.for_each_paragraph_mut(&mut |para| merge_paragraph_tokens(para, renderer, ctx));

    // Pass 2: render every run.
    document.try_for_each_run_mut(&mut |run| {
        let rendered = renderer.render(run.text(), ctx.value())?;
        run.set_text(rendered);
        Ok(())
    })
}

/// Merge and substitute a single paragraph in place.
///
/// The same two phases as [`substitute_document`], scoped to one
/// paragraph.
pub fn substitute_paragraph(
    paragraph: &mut Paragraph,
    renderer: &TemplateRenderer,
    ctx: &RowContext,
) -> Result<()> {
    merge_paragraph_tokens(paragraph, renderer, ctx);

    for run in paragraph.runs_mut() {
        let rendered = renderer.render(run.text(), ctx.value())?;
        run.set_text(rendered);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::docx::{Block, Cell, Run, Table, TableRow};
    use crate::xlsx::CellValue;

    fn context(name: &str, value: &str) -> RowContext {
        RowContext::from_row(
            &[name.to_string()],
            &[CellValue::Text(value.to_string())],
            0,
        )
        .unwrap()
    }

    fn paragraph_of(texts: &[&str]) -> Paragraph {
        let mut para = Paragraph::new();
        for text in texts {
            para.push_run(Run::new(*text));
        }
        para
    }

    #[test]
    fn test_substitute_paragraph_split_open_delimiter() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        let mut para = paragraph_of(&["Dear ", "{", "{ name }}", "!"]);

        substitute_paragraph(&mut para, &renderer, &ctx).unwrap();

        assert_eq!(para.text(), "Dear Alice!");
        // Consumed runs survive as empty placeholders.
        assert_eq!(para.run_count(), 4);
    }

    #[test]
    fn test_substitute_document_covers_table_cells() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");

        let mut doc = Document::default();
        doc.blocks
            .push(Block::Paragraph(paragraph_of(&["Hello {{ name }}"])));
        doc.blocks.push(Block::Table(Table {
            rows: vec![TableRow {
                cells: vec![Cell {
                    blocks: vec![Block::Paragraph(paragraph_of(&["{{ na", "me }}"]))],
                    ..Cell::default()
                }],
                ..TableRow::default()
            }],
            ..Table::default()
        }));

        substitute_document(&mut doc, &renderer, &ctx).unwrap();

        assert_eq!(doc.text(), "Hello Alice\nAlice");
    }

    #[test]
    fn test_unterminated_marker_aborts_pass_two() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");

        let mut doc = Document::default();
        doc.blocks
            .push(Block::Paragraph(paragraph_of(&["{{ na", "me"])));

        let result = substitute_document(&mut doc, &renderer, &ctx);
        assert!(matches!(result, Err(Error::TemplateSyntax(_))));
    }

    #[test]
    fn test_undefined_variable_aborts_pass_two() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");

        let mut doc = Document::default();
        doc.blocks
            .push(Block::Paragraph(paragraph_of(&["{{ nickname }}"])));

        let result = substitute_document(&mut doc, &renderer, &ctx);
        assert!(matches!(result, Err(Error::UndefinedVariable(_))));
    }
}
