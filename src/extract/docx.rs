//! DOCX paragraph extraction
//!
//! A .docx file is a ZIP archive of XML parts. docx-rs parses it into
//! Document → Paragraph → Run → Text; we walk the body paragraphs in order
//! and join them with newlines. Empty paragraphs become empty lines.

use crate::error::{ExtractError, Result};
use docx_rs::{
    read_docx, DocumentChild, InsertChild, MoveToChild, Paragraph, ParagraphChild, Run, RunChild,
};
use tracing::debug;

/// Extract the text of every body paragraph, one per line.
pub fn extract_docx(bytes: &[u8]) -> Result<String> {
    let docx = read_docx(bytes)
        .map_err(|e| ExtractError::Parse(format!("failed to parse DOCX: {:?}", e)))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    debug!("DOCX has {} paragraphs", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

/// Runs within a paragraph are parts of the same line, so they are
/// concatenated with no separator. Hyperlinks and tracked insertions or
/// moves are visible text; tracked deletions are not.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&para.children, &mut text);
    text
}

fn push_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, text),
            ParagraphChild::Hyperlink(link) => push_children(&link.children, text),
            ParagraphChild::Insert(insert) => {
                for ic in &insert.children {
                    if let InsertChild::Run(run) = ic {
                        push_run(run, text);
                    }
                }
            }
            ParagraphChild::MoveTo(moved) => {
                for mc in &moved.children {
                    if let MoveToChild::Run(run) = mc {
                        push_run(run, text);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run(run: &Run, text: &mut String) {
    for rc in &run.children {
        match rc {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}
