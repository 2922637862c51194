//! Link detection in free text (skill descriptions, bios, experiences)

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"https?://\S+|www\.\S+").expect("URL pattern is valid");
}

/// A run of plain text or a detected link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { text: String, href: String },
}

/// Split text into plain runs and links, in order.
///
/// Bare `www.` links get an `https://` href; the visible text is kept as written.
pub fn linkify(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for found in URL_PATTERN.find_iter(text) {
        if found.start() > last {
            segments.push(Segment::Text(text[last..found.start()].to_string()));
        }

        let url = found.as_str();
        let href = if url.starts_with("www.") {
            format!("https://{}", url)
        } else {
            url.to_string()
        };
        segments.push(Segment::Link {
            text: url.to_string(),
            href,
        });
        last = found.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }

    segments
}
