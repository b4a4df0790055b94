use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, warn};

pub const TEI_NAMESPACE: &[u8] = b"http://www.tei-c.org/ns/1.0";

// Give up after this many back-to-back parse errors.
const MAX_CONSECUTIVE_ERRORS: usize = 32;

#[derive(Debug, PartialEq, Clone, Copy)]
enum Frame {
    Body,
    // `head_open` stays true until the first child node, so only the text
    // that directly precedes any child is collected.
    Paragraph { slot: usize, head_open: bool },
    Other,
}

/// `(prefix, uri)` pairs from `xmlns` / `xmlns:p` attributes; the default
/// namespace has an empty prefix.
type Bindings = Vec<(Vec<u8>, Vec<u8>)>;

#[derive(Debug)]
struct OpenElement {
    name: Vec<u8>,
    frame: Frame,
    bindings: Bindings,
}

fn reader_at(markup: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(markup);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    reader
}

/// Extracts the direct text of every TEI `<p>` inside a TEI `<body>`, in document
/// order, joined with newlines.
///
/// Parsing runs in recovery mode: mismatched or unmatched end tags are tolerated,
/// and after an unparsable fragment reading resumes one character past where it
/// started. Namespace scopes live on the element stack, so they survive a resume.
/// Paragraphs with no direct text contribute nothing. The result is not normalized.
pub fn extract_prose_text(markup: &str) -> String {
    let mut offset = 0usize;
    let mut reader = reader_at(markup);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut consecutive_errors = 0usize;

    loop {
        let position = reader.buffer_position();
        let mut failed = false;
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                close_paragraph_head(&mut stack);
                let bindings = declared_bindings(&e);
                let in_tei = resolves_to_tei(&e, &bindings, &stack);
                let local = e.local_name();
                let frame = if in_tei && local.as_ref() == b"body" {
                    Frame::Body
                } else if in_tei && local.as_ref() == b"p" && inside_body(&stack) {
                    paragraphs.push(String::new());
                    Frame::Paragraph {
                        slot: paragraphs.len() - 1,
                        head_open: true,
                    }
                } else {
                    Frame::Other
                };
                stack.push(OpenElement {
                    name: e.name().as_ref().to_vec(),
                    frame,
                    bindings,
                });
            }
            Ok(Event::Empty(_)) | Ok(Event::Comment(_)) | Ok(Event::PI(_)) => {
                close_paragraph_head(&mut stack);
            }
            Ok(Event::Text(e)) => {
                if let Some(slot) = open_paragraph_head(&stack) {
                    match e.unescape() {
                        Ok(text) => paragraphs[slot].push_str(&text),
                        Err(err) => {
                            warn!(error = %err, "keeping paragraph text with unresolved entities");
                            paragraphs[slot].push_str(&String::from_utf8_lossy(&e));
                        }
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(slot) = open_paragraph_head(&stack) {
                    paragraphs[slot].push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                match stack.iter().rposition(|open| open.name == name.as_ref()) {
                    Some(idx) => stack.truncate(idx),
                    None => debug!(
                        tag = %String::from_utf8_lossy(name.as_ref()),
                        "ignoring unmatched end tag"
                    ),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, position = offset.saturating_add(as_index(position)), "skipping malformed markup");
                failed = true;
            }
        }

        if failed {
            consecutive_errors += 1;
            // A broken node is not paragraph text.
            close_paragraph_head(&mut stack);
            let resume = next_boundary(markup, offset.saturating_add(as_index(position)));
            if resume >= markup.len() || consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                warn!(position = resume, "abandoning markup extraction; keeping paragraphs salvaged so far");
                break;
            }
            offset = resume;
            reader = reader_at(&markup[offset..]);
        } else {
            consecutive_errors = 0;
        }
    }

    let collected: Vec<String> = paragraphs
        .into_iter()
        .filter(|text| !text.trim().is_empty())
        .collect();
    debug!(paragraphs = collected.len(), "extracted prose paragraphs");
    collected.join("\n")
}

fn as_index<P: TryInto<usize>>(position: P) -> usize {
    position.try_into().unwrap_or(usize::MAX)
}

/// First char boundary strictly after `at`, clamped to the end of `markup`.
fn next_boundary(markup: &str, at: usize) -> usize {
    let mut next = at.saturating_add(1);
    while next < markup.len() && !markup.is_char_boundary(next) {
        next += 1;
    }
    next.min(markup.len())
}

fn declared_bindings(e: &BytesStart<'_>) -> Bindings {
    e.attributes()
        .with_checks(false)
        .flatten()
        .filter_map(|attr| {
            let key = attr.key.as_ref();
            let prefix = if key == b"xmlns" {
                Vec::new()
            } else {
                key.strip_prefix(b"xmlns:".as_slice())?.to_vec()
            };
            Some((prefix, attr.value.into_owned()))
        })
        .collect()
}

/// Resolves the element's prefix against its own declarations, then the
/// enclosing scopes from the innermost outwards.
fn resolves_to_tei(e: &BytesStart<'_>, own: &Bindings, stack: &[OpenElement]) -> bool {
    let qname = e.name();
    let prefix: &[u8] = match qname.prefix() {
        Some(prefix) => prefix.into_inner(),
        None => b"",
    };
    own.iter()
        .chain(stack.iter().rev().flat_map(|open| open.bindings.iter()))
        .find(|(bound, _)| bound.as_slice() == prefix)
        .is_some_and(|(_, uri)| uri.as_slice() == TEI_NAMESPACE)
}

fn inside_body(stack: &[OpenElement]) -> bool {
    stack.iter().any(|open| open.frame == Frame::Body)
}

fn open_paragraph_head(stack: &[OpenElement]) -> Option<usize> {
    match stack.last() {
        Some(OpenElement {
            frame: Frame::Paragraph {
                slot,
                head_open: true,
            },
            ..
        }) => Some(*slot),
        _ => None,
    }
}

fn close_paragraph_head(stack: &mut [OpenElement]) {
    if let Some(OpenElement {
        frame: Frame::Paragraph { head_open, .. },
        ..
    }) = stack.last_mut()
    {
        *head_open = false;
    }
}
