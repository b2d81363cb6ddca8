//! Reconstruction of template markers split across run boundaries.
//!
//! Runs are a formatting artifact of the editing tool, not of the template
//! author's intent: `{{ name }}` may arrive as `["{", "{ name }}"]` or
//! `["{{ na", "me }}"]` depending on how the editor fragmented the
//! paragraph. A single forward scan reassembles each split marker into its
//! first run (the anchor) and empties the runs that were consumed, leaving
//! the paragraph ready for a uniform substitution pass.
//!
//! All syntax judgment is delegated to [`TemplateRenderer`]: a run that
//! contains an opening delimiter but fails to render on its own is a marker
//! that does not close within that run.

use crate::common::Error;
use crate::docx::{ParaChild, Paragraph};
use crate::merge::context::RowContext;
use crate::merge::template::TemplateRenderer;
use memchr::memmem;

const OPEN_DELIM: &[u8] = b"{{";
const CLOSE_DELIM: &[u8] = b"}}";

/// Accumulator for a marker under reconstruction. Lives only for the
/// duration of one paragraph scan.
struct Token {
    /// Index of the anchor run in the paragraph's child list
    anchor: usize,
    /// Text accumulated so far, mirrored into the anchor run
    text: String,
}

/// Reassemble split markers in a paragraph, in place.
///
/// Runs containing no markers, or markers self-contained in one run, are
/// left for the later substitution pass (self-contained markers render
/// immediately). A marker split over N runs ends up in the first of them;
/// the other N-1 runs are reduced to empty text but stay in the sequence,
/// formatting intact.
///
/// A marker still open when the paragraph ends stays as raw accumulated
/// text in its anchor; the substitution pass rejects it as malformed.
pub fn merge_paragraph_tokens(
    paragraph: &mut Paragraph,
    renderer: &TemplateRenderer,
    ctx: &RowContext,
) {
    let run_positions: Vec<usize> = paragraph
        .children
        .iter()
        .enumerate()
        .filter_map(|(i, child)| matches!(child, ParaChild::Run(_)).then_some(i))
        .collect();

    let mut token: Option<Token> = None;

    for (k, &pos) in run_positions.iter().enumerate() {
        let text = run_text_at(paragraph, pos).to_string();

        if let Some(mut current) = token.take() {
            // Accumulating: fold this run into the anchor.
            current.text.push_str(&text);
            set_run_text_at(paragraph, current.anchor, current.text.clone());
            set_run_text_at(paragraph, pos, String::new());

            token = if closes_token(&text, &current.text) {
                None
            } else {
                Some(current)
            };
            continue;
        }

        // Scanning for the start of a marker.
        if contains_delim(&text, OPEN_DELIM) {
            match renderer.render(&text, ctx.value()) {
                Ok(rendered) => set_run_text_at(paragraph, pos, rendered),
                Err(Error::TemplateSyntax(_)) => {
                    // The marker does not close within this run.
                    log::debug!("marker split across runs, anchoring at run {k}");
                    token = Some(Token { anchor: pos, text });
                },
                // Well-formed but unresolvable here (e.g. unknown
                // variable); the substitution pass reports it.
                Err(_) => {},
            }
        } else if text.ends_with('{')
            && let Some(&next) = run_positions.get(k + 1)
            && run_text_at(paragraph, next).starts_with('{')
        {
            // The two-character opening delimiter itself is split across
            // this run and the next.
            log::debug!("opening delimiter split across runs, anchoring at run {k}");
            token = Some(Token { anchor: pos, text });
        }
    }
}

/// Closing condition, checked against the just-appended run's own text.
///
/// A genuine close is a `}}` not accompanied by the start of a fresh
/// marker in the same run; the other case is the two-character closing
/// delimiter split across two runs.
fn closes_token(run_text: &str, accumulated: &str) -> bool {
    (contains_delim(run_text, CLOSE_DELIM) && !contains_delim(run_text, OPEN_DELIM))
        || (run_text.starts_with('}') && accumulated.ends_with('}'))
}

#[inline]
fn contains_delim(text: &str, delim: &[u8]) -> bool {
    memmem::find(text.as_bytes(), delim).is_some()
}

fn run_text_at(paragraph: &Paragraph, pos: usize) -> &str {
    match &paragraph.children[pos] {
        ParaChild::Run(run) => run.text(),
        ParaChild::Raw(_) => "",
    }
}

fn set_run_text_at(paragraph: &mut Paragraph, pos: usize, text: String) {
    if let ParaChild::Run(run) = &mut paragraph.children[pos] {
        run.set_text(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::Run;
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

    fn run_texts(para: &Paragraph) -> Vec<String> {
        para.runs().iter().map(|r| r.text().to_string()).collect()
    }

    #[test]
    fn test_self_contained_marker_renders_in_place() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        let mut para = paragraph_of(&["Dear {{ name }}!"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        assert_eq!(run_texts(&para), vec!["Dear Alice!"]);
    }

    #[test]
    fn test_marker_free_runs_untouched() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        let mut para = paragraph_of(&["no markers", "here { at all }"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        assert_eq!(run_texts(&para), vec!["no markers", "here { at all }"]);
    }

    #[test]
    fn test_split_marker_merges_into_anchor() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        let mut para = paragraph_of(&["Dear ", "{{ na", "me }}", "!"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        // The anchor holds the reassembled raw marker; rendering is the
        // substitution pass's job.
        assert_eq!(run_texts(&para), vec!["Dear ", "{{ name }}", "", "!"]);
    }

    #[test]
    fn test_split_opening_delimiter() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        let mut para = paragraph_of(&["Dear ", "{", "{ name }}", "!"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        assert_eq!(run_texts(&para), vec!["Dear ", "{{ name }}", "", "!"]);
    }

    #[test]
    fn test_split_closing_delimiter() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        let mut para = paragraph_of(&["{{ name }", "}", " tail"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        assert_eq!(run_texts(&para), vec!["{{ name }}", "", " tail"]);
    }

    #[test]
    fn test_marker_split_across_many_runs() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        let mut para = paragraph_of(&["{", "{ na", "me", " }", "}", "end"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        assert_eq!(run_texts(&para), vec!["{{ name }}", "", "", "", "", "end"]);
    }

    #[test]
    fn test_close_followed_by_fresh_marker_keeps_accumulating() {
        let renderer = TemplateRenderer::new();
        let ctx = RowContext::from_row(
            &["a".to_string(), "b".to_string()],
            &[
                CellValue::Text("1".to_string()),
                CellValue::Text("2".to_string()),
            ],
            0,
        )
        .unwrap();
        // The second run contains a close immediately followed by a fresh
        // open: not a genuine close, so both markers end up in the anchor.
        let mut para = paragraph_of(&["{{ a ", "}} and {{", " b }}"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        assert_eq!(run_texts(&para), vec!["{{ a }} and {{ b }}", "", ""]);
    }

    #[test]
    fn test_unterminated_marker_left_raw() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        let mut para = paragraph_of(&["{{ na", "me"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        // Still accumulating at paragraph end: the anchor holds the raw
        // unterminated text for the substitution pass to reject.
        assert_eq!(run_texts(&para), vec!["{{ name", ""]);
    }

    #[test]
    fn test_unknown_variable_left_for_substitution_pass() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        let mut para = paragraph_of(&["{{ nickname }}"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        // Well-formed, so no accumulation; the text stays raw and pass 2
        // surfaces the undefined variable.
        assert_eq!(run_texts(&para), vec!["{{ nickname }}"]);
    }

    #[test]
    fn test_trailing_open_brace_without_continuation() {
        let renderer = TemplateRenderer::new();
        let ctx = context("name", "Alice");
        // Last run ends with '{' but there is no next run: no accumulation.
        let mut para = paragraph_of(&["tail {"]);

        merge_paragraph_tokens(&mut para, &renderer, &ctx);

        assert_eq!(run_texts(&para), vec!["tail {"]);
    }
}
