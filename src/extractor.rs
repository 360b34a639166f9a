//! Locate metadata records in a document and pull out author surnames and the
//! work's title.
//!
//! A record is any element whose tag ends in `journal_article`,
//! `content_item` or `book`. Surnames accumulate across every record in
//! document order; the first non-empty title wins for the whole document.

use crate::error::{Error, Result};
use crate::loader::Element;
use crate::normalizer::{normalize_surname, normalize_title};
use log::debug;

const BOOK: &str = "book";
const RECORD_MARKERS: [&str; 3] = ["content_item", "journal_article", BOOK];
const SURNAME: &str = "surname";
const TITLE: &str = "title";
const SERIES_METADATA: &str = "series_metadata";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub surnames: Vec<String>,
    pub title: String,
    pub is_book: bool,
    pub records: usize,
}

pub fn extract(root: &Element) -> Result<ExtractionResult> {
    let mut result = ExtractionResult::default();
    let mut ancestors = Vec::new();
    locate_records(root, &mut ancestors, &mut result)?;

    debug!(
        "Extracted {} surnames from {} records (book: {})",
        result.surnames.len(),
        result.records,
        result.is_book
    );
    Ok(result)
}

fn is_record(element: &Element) -> bool {
    RECORD_MARKERS
        .iter()
        .any(|marker| element.tag_ends_with(marker))
}

/// Pre-order walk over the whole document, handing every record to
/// [`extract_fields`]. `ancestors` holds the path from the root down to the
/// parent of `element`.
fn locate_records<'a>(
    element: &'a Element,
    ancestors: &mut Vec<&'a Element>,
    result: &mut ExtractionResult,
) -> Result<()> {
    if element.tag_ends_with(BOOK) {
        result.is_book = true;
    }

    if is_record(element) {
        debug!("Found record <{}>", element.tag());
        result.records += 1;
        extract_fields(element, ancestors, result)?;
    }

    ancestors.push(element);
    for child in element.children() {
        locate_records(child, ancestors, result)?;
    }
    ancestors.pop();

    Ok(())
}

/// Walks one record's subtree (the record itself included).
fn extract_fields<'a>(
    element: &'a Element,
    ancestors: &mut Vec<&'a Element>,
    result: &mut ExtractionResult,
) -> Result<()> {
    if element.tag_ends_with(SURNAME) {
        let raw = element.text().ok_or_else(|| Error::MissingField {
            tag: element.tag().to_string(),
        })?;
        let surname = normalize_surname(raw);
        debug!("Surname {:?} -> {:?}", raw, surname);
        result.surnames.push(surname);
    }

    if result.title.is_empty() && element.tag_ends_with(TITLE) {
        if in_series_metadata(ancestors) {
            debug!("Skipping series title <{}>", element.tag());
        } else {
            result.title = normalize_title(&element.full_text());
            if !result.title.is_empty() {
                debug!("Title: {:?}", result.title);
            }
        }
    }

    ancestors.push(element);
    for child in element.children() {
        extract_fields(child, ancestors, result)?;
    }
    ancestors.pop();

    Ok(())
}

/// Book series titles sit at `series_metadata/titles/title`. The local name
/// must match exactly: `book_series_metadata/titles/title` is the volume title.
fn in_series_metadata(ancestors: &[&Element]) -> bool {
    ancestors
        .len()
        .checked_sub(2)
        .and_then(|i| ancestors.get(i))
        .is_some_and(|grandparent| grandparent.local_name() == SERIES_METADATA)
}
