//! Metadata document loading.
//!
//! Parses a DOI metadata record into an owned [`Element`] tree. Tags are kept
//! in Clark notation (`{namespace-uri}local`) so that callers can match on the
//! local part by suffix regardless of how the document spells its prefixes.

use crate::error::{Error, Result};
use log::debug;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::fs;
use std::io::Read;
use std::path::Path;

/// One node of a metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    /// Character data before the first child.
    text: String,
    /// Character data between this element's end tag and the next sibling.
    tail: String,
    children: Vec<Element>,
}

impl Element {
    fn new(tag: String) -> Self {
        Element {
            tag,
            text: String::new(),
            tail: String::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Leading text, trimmed. `None` when the element has no text of its own.
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        if text.is_empty() { None } else { Some(text) }
    }

    /// All character data of the element and its descendants in document order.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }

    /// Tag without its `{namespace}` part.
    pub fn local_name(&self) -> &str {
        match self.tag.rfind('}') {
            Some(end) => &self.tag[end + 1..],
            None => &self.tag,
        }
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn tag_ends_with(&self, marker: &str) -> bool {
        self.tag.ends_with(marker)
    }
}

/// Read and parse the metadata document at `path`.
pub fn load_path(path: &Path) -> Result<Element> {
    debug!("Reading metadata document {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_document(&content)
}

/// Read a metadata document to the end of `reader` and parse it.
pub fn load_reader<R: Read>(mut reader: R) -> Result<Element> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|source| Error::Read {
            path: "<stdin>".to_string(),
            source,
        })?;
    parse_document(&content)
}

pub fn parse_document(content: &str) -> Result<Element> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = NsReader::from_str(content);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(e)) => {
                let tag = qualified_name(ns, e.local_name().as_ref())?;
                if open.is_empty() && root.is_some() {
                    return Err(Error::Malformed(format!(
                        "second root element <{}>",
                        tag
                    )));
                }
                open.push(Element::new(tag));
            }
            (ns, Event::Empty(e)) => {
                let tag = qualified_name(ns, e.local_name().as_ref())?;
                close(Element::new(tag), &mut open, &mut root)?;
            }
            (_, Event::End(_)) => {
                let element = open
                    .pop()
                    .ok_or_else(|| Error::Malformed("unexpected end tag".to_string()))?;
                close(element, &mut open, &mut root)?;
            }
            (_, Event::Text(e)) => {
                let text = e.unescape()?;
                push_text(&mut open, &text);
            }
            (_, Event::CData(e)) => {
                let bytes = e.into_inner();
                push_text(&mut open, &String::from_utf8_lossy(&bytes));
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(Error::Malformed(format!(
            "unclosed element <{}>",
            unclosed.tag
        )));
    }

    root.ok_or_else(|| Error::Malformed("no root element".to_string()))
}

fn qualified_name(ns: ResolveResult, local: &[u8]) -> Result<String> {
    let local = String::from_utf8_lossy(local);
    match ns {
        ResolveResult::Bound(namespace) => Ok(format!(
            "{{{}}}{}",
            String::from_utf8_lossy(namespace.as_ref()),
            local
        )),
        ResolveResult::Unbound => Ok(local.into_owned()),
        ResolveResult::Unknown(prefix) => Err(Error::Malformed(format!(
            "undeclared namespace prefix '{}' on <{}>",
            String::from_utf8_lossy(&prefix),
            local
        ))),
    }
}

/// Attach a finished element to its parent, or make it the document root.
fn close(element: Element, open: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(Error::Malformed(format!(
                "second root element <{}>",
                element.tag
            )));
        }
    }
    Ok(())
}

fn push_text(open: &mut [Element], text: &str) {
    // Character data outside the root element is whitespace in well-formed input
    let Some(current) = open.last_mut() else {
        return;
    };
    match current.children.last_mut() {
        Some(previous) => previous.tail.push_str(text),
        None => current.text.push_str(text),
    }
}
