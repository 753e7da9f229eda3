//! Extraction of depth-tagged comment records from a Hacker News item page.
//!
//! Every missing or malformed element degrades to a default (depth `0`, no
//! author, empty text); a broken row never aborts the whole sequence.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info};

use crate::thread::{reconstruct, CommentNode, CommentRecord, ReconstructPolicy};

const ROW_SELECTOR: &str = "tr.athing.comtr";
const INDENT_SELECTOR: &str = "td.ind";
const BODY_SELECTOR: &str = "td.default";
const HEAD_SELECTOR: &str = ".comhead";
const AUTHOR_SELECTOR: &str = ".hnuser";
const TEXT_SELECTOR: &str = ".commtext";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("invalid thread selector {selector}: {message}")]
    Selector { selector: String, message: String },
}

struct ThreadSelectors {
    row: Selector,
    indent: Selector,
    body: Selector,
    head: Selector,
    author: Selector,
    text: Selector,
}

impl ThreadSelectors {
    fn new() -> Result<Self, IngestError> {
        Ok(Self {
            row: selector(ROW_SELECTOR)?,
            indent: selector(INDENT_SELECTOR)?,
            body: selector(BODY_SELECTOR)?,
            head: selector(HEAD_SELECTOR)?,
            author: selector(AUTHOR_SELECTOR)?,
            text: selector(TEXT_SELECTOR)?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, IngestError> {
    Selector::parse(css).map_err(|e| IngestError::Selector {
        selector: css.to_string(),
        message: format!("{e:?}"),
    })
}

/// Extract every comment row of `html` in document order.
pub fn extract_records(html: &str) -> Result<Vec<CommentRecord>, IngestError> {
    let selectors = ThreadSelectors::new()?;
    let document = Html::parse_document(html);

    let records: Vec<CommentRecord> = document
        .select(&selectors.row)
        .map(|row| extract_row(&selectors, row))
        .collect();

    info!(rows = records.len(), "Extracted comment rows from thread page");
    Ok(records)
}

/// Extract the rows of `html` and rebuild the reply tree under `policy`.
pub fn parse_thread(
    html: &str,
    policy: &ReconstructPolicy,
) -> Result<Vec<CommentNode>, IngestError> {
    let records = extract_records(html)?;
    Ok(reconstruct(records, policy))
}

fn extract_row(selectors: &ThreadSelectors, row: ElementRef<'_>) -> CommentRecord {
    let depth = row
        .select(&selectors.indent)
        .next()
        .and_then(|cell| cell.value().attr("indent"))
        .and_then(|raw| match raw.trim().parse::<u32>() {
            Ok(depth) => Some(depth),
            Err(e) => {
                debug!(indent = raw, error = %e, "Unreadable indent, treating row as top level");
                None
            }
        })
        .unwrap_or(0);

    let body = row.select(&selectors.body).next();

    let author = body
        .and_then(|body| body.select(&selectors.head).next())
        .and_then(|head| head.select(&selectors.author).next())
        .map(|el| el.text().map(str::trim).collect::<String>());

    let text = body
        .and_then(|body| body.select(&selectors.text).next())
        .map(|el| {
            el.text()
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    CommentRecord {
        depth,
        author,
        text,
    }
}
