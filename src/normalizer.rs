use crate::extractor::ExtractionResult;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static DASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("dash run pattern is valid"));

const AUTHOR_SEPARATOR: &str = "_";
const TITLE_SEPARATOR: &str = "__";
const BOOK_SUFFIX: &str = "_BOOK";
const EXTENSION: &str = ".pdf";

/// "van der berg" -> "VanDerBerg"
pub fn normalize_surname(raw: &str) -> String {
    title_case(raw.trim()).replace(' ', "")
}

pub fn normalize_title(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    DASH_RUN.replace_all(&collapsed, "-").into_owned()
}

/// Uppercase every cased character that follows an uncased one and lowercase
/// the rest, so word starts after spaces, hyphens and apostrophes are
/// capitalised.
fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut previous_cased = false;

    for c in s.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased && !previous_cased {
            result.extend(c.to_uppercase());
        } else if cased {
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
        previous_cased = cased;
    }

    result
}

pub fn generate_filename(extraction: &ExtractionResult) -> String {
    let mut result = extraction.surnames.join(AUTHOR_SEPARATOR);
    result.push_str(TITLE_SEPARATOR);
    result.push_str(&extraction.title);

    if extraction.is_book {
        result.push_str(BOOK_SUFFIX);
    }

    result.push_str(EXTENSION);

    let filename = sanitize(&result);
    debug!("Assembled: {} -> {}", result, filename);
    filename
}

fn sanitize(s: &str) -> String {
    s.replace('/', "_").replace(' ', "_")
}
