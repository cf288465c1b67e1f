// Timeline parsing and formatting: XML body in, oldest-first text out.

use crate::error::{Error, Result};
use roxmltree::{Document, Node};
use textwrap::{Options, WordSeparator, WordSplitter};

/// Column the status text is wrapped at.
pub const COLUMN_WIDTH: usize = 72;

const AUTH_FAILURE: &str = "Could not authenticate you.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub screen_name: String,
    pub created_at: String,
    pub text: String,
}

/// Parse a friends timeline document into entries, in document order
/// (newest first, as the service sends them).
///
/// Expected shape:
/// <statuses>
///   <status>
///     <created_at>...</created_at>
///     <text>...</text>
///     <user><screen_name>...</screen_name></user>
///   </status>
/// </statuses>
///
/// An `<error>` payload (the service answers `<hash><error>..</error></hash>`)
/// is turned into `AuthenticationFailed` or `Api`.
pub fn parse_timeline(xml: &str) -> Result<Vec<TimelineEntry>> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    if let Some(err) = payload_error(root) {
        return Err(err);
    }
    if !root.has_tag_name("statuses") {
        return Err(Error::UnexpectedRoot(root.tag_name().name().to_string()));
    }

    root.children()
        .filter(|n| n.has_tag_name("status"))
        .map(|status| -> Result<TimelineEntry> {
            let user = child(status, "user").ok_or(Error::MissingField("user"))?;
            Ok(TimelineEntry {
                screen_name: field(user, "screen_name")?,
                created_at: field(status, "created_at")?,
                text: field(status, "text")?,
            })
        })
        .collect()
}

/// The error described by an `<error>` payload, if `body` is one. Bodies
/// that are not XML at all give `None`.
pub fn error_payload(body: &str) -> Option<Error> {
    let doc = Document::parse(body).ok()?;
    payload_error(doc.root_element())
}

fn payload_error(root: Node<'_, '_>) -> Option<Error> {
    let error = child(root, "error")?;
    let message = error.text().unwrap_or("").trim().to_string();
    Some(if message == AUTH_FAILURE {
        Error::AuthenticationFailed(message)
    } else {
        Error::Api(message)
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

// Element text with HTML entities decoded. An empty element gives "".
fn field(node: Node<'_, '_>, name: &'static str) -> Result<String> {
    let el = child(node, name).ok_or(Error::MissingField(name))?;
    Ok(decode_entities(el.text().unwrap_or("")))
}

/// Resolve HTML entities (`&amp;`, `&lt;`, `&#39;`, ...). Text without
/// entities comes back unchanged.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Wrap `text` into lines of at most `width` display columns (wide
/// characters take two), breaking at spaces
/// and splitting words that do not fit on a line of their own. Each line,
/// including the last, ends with a newline.
pub fn reflow(text: &str, width: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let options = Options::new(width)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation)
        .break_words(true);

    let mut out = String::with_capacity(text.len() + 8);
    for line in textwrap::wrap(text, options) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Render entries oldest first, one "name, timestamp:" header per entry
/// followed by the wrapped text and a blank line.
pub fn format_timeline(entries: &[TimelineEntry]) -> String {
    let mut out = String::new();
    for entry in entries.iter().rev() {
        out.push_str(&format!(
            "{}, {}:\n{}\n",
            entry.screen_name,
            entry.created_at,
            reflow(&entry.text, COLUMN_WIDTH)
        ));
    }
    out
}
