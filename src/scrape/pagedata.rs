//! Single-pass scanner for the `pagedata` blob.
//!
//! The scanner is a byte-level automaton over start tags and their
//! attributes, in declaration order. A tag carrying `id="pagedata"` puts
//! the scanner into a candidate state; the next `data-blob` attribute of
//! that tag is entity-unescaped and decoded as JSON, and scanning stops at
//! the first match. Comments and `<script>`/`<style>` raw text are skipped
//! so markup inside them cannot produce false matches.

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::Result;

/// Decoded page-data payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub digital_items: Vec<DigitalItem>,
}

/// One downloadable item on the page.
#[derive(Debug, Clone, Deserialize)]
pub struct DigitalItem {
    pub title: String,

    /// Download links keyed by format name.
    #[serde(default)]
    pub downloads: HashMap<String, DownloadLink>,
}

/// A per-format download link.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadLink {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    TagOpen,
    MarkupDecl,
    MarkupDeclDash,
    Comment,
    CommentDash,
    CommentDashDash,
    Bogus,
    TagName,
    BeforeAttrName,
    AttrName,
    AfterAttrName,
    BeforeAttrValue,
    AttrValueDouble,
    AttrValueSingle,
    AttrValueUnquoted,
    RawText,
    RawTextLt,
    RawTextEndName,
    Matched,
}

/// Incremental page-data scanner; feed it body chunks as they arrive.
pub struct PageDataScanner {
    state: State,
    tag_name: String,
    candidate: bool,
    attr_name: String,
    attr_value: Vec<u8>,
    raw_end: String,
    end_name: String,
}

impl Default for PageDataScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDataScanner {
    pub fn new() -> Self {
        Self {
            state: State::Text,
            tag_name: String::new(),
            candidate: false,
            attr_name: String::new(),
            attr_value: Vec::new(),
            raw_end: String::new(),
            end_name: String::new(),
        }
    }

    /// Feed the next chunk of the document.
    ///
    /// Returns `Ok(Some(..))` as soon as the blob is found and decoded;
    /// the rest of the stream can then be dropped. `Ok(None)` means no
    /// match yet. A matched but malformed payload is a JSON error.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<PageData>> {
        if self.state == State::Matched {
            return Ok(None);
        }
        for &b in chunk {
            if let Some(page) = self.step(b)? {
                self.state = State::Matched;
                return Ok(Some(page));
            }
        }
        Ok(None)
    }

    fn step(&mut self, b: u8) -> Result<Option<PageData>> {
        match self.state {
            State::Text => {
                if b == b'<' {
                    self.state = State::TagOpen;
                }
            }
            State::TagOpen => match b {
                b'!' => self.state = State::MarkupDecl,
                b'/' | b'?' => self.state = State::Bogus,
                b if b.is_ascii_alphabetic() => {
                    self.tag_name.clear();
                    self.tag_name.push(b.to_ascii_lowercase() as char);
                    self.candidate = false;
                    self.state = State::TagName;
                }
                b'<' => {}
                _ => self.state = State::Text,
            },
            State::MarkupDecl => match b {
                b'-' => self.state = State::MarkupDeclDash,
                b'>' => self.state = State::Text,
                _ => self.state = State::Bogus,
            },
            State::MarkupDeclDash => match b {
                b'-' => self.state = State::Comment,
                b'>' => self.state = State::Text,
                _ => self.state = State::Bogus,
            },
            State::Comment => {
                if b == b'-' {
                    self.state = State::CommentDash;
                }
            }
            State::CommentDash => {
                self.state = if b == b'-' {
                    State::CommentDashDash
                } else {
                    State::Comment
                };
            }
            State::CommentDashDash => match b {
                b'>' => self.state = State::Text,
                b'-' => {}
                _ => self.state = State::Comment,
            },
            State::Bogus => {
                if b == b'>' {
                    self.state = State::Text;
                }
            }
            State::TagName => match b {
                b if b.is_ascii_whitespace() => self.state = State::BeforeAttrName,
                b'/' => self.state = State::BeforeAttrName,
                b'>' => self.finish_tag_open(),
                _ => self.tag_name.push(b.to_ascii_lowercase() as char),
            },
            State::BeforeAttrName => match b {
                b if b.is_ascii_whitespace() => {}
                b'/' => {}
                b'>' => self.finish_tag_open(),
                _ => {
                    self.attr_name.clear();
                    self.attr_value.clear();
                    self.attr_name.push(b.to_ascii_lowercase() as char);
                    self.state = State::AttrName;
                }
            },
            State::AttrName => match b {
                b'=' => self.state = State::BeforeAttrValue,
                b if b.is_ascii_whitespace() => self.state = State::AfterAttrName,
                b'>' => {
                    let page = self.finish_attr()?;
                    self.finish_tag_open();
                    return Ok(page);
                }
                b'/' => {
                    let page = self.finish_attr()?;
                    self.state = State::BeforeAttrName;
                    return Ok(page);
                }
                _ => self.attr_name.push(b.to_ascii_lowercase() as char),
            },
            State::AfterAttrName => match b {
                b if b.is_ascii_whitespace() => {}
                b'=' => self.state = State::BeforeAttrValue,
                b'>' => {
                    let page = self.finish_attr()?;
                    self.finish_tag_open();
                    return Ok(page);
                }
                b'/' => {
                    let page = self.finish_attr()?;
                    self.state = State::BeforeAttrName;
                    return Ok(page);
                }
                _ => {
                    // Previous attribute had no value; this byte starts a new one.
                    let page = self.finish_attr()?;
                    self.attr_name.push(b.to_ascii_lowercase() as char);
                    self.state = State::AttrName;
                    return Ok(page);
                }
            },
            State::BeforeAttrValue => match b {
                b if b.is_ascii_whitespace() => {}
                b'"' => self.state = State::AttrValueDouble,
                b'\'' => self.state = State::AttrValueSingle,
                b'>' => {
                    let page = self.finish_attr()?;
                    self.finish_tag_open();
                    return Ok(page);
                }
                _ => {
                    self.attr_value.push(b);
                    self.state = State::AttrValueUnquoted;
                }
            },
            State::AttrValueDouble => {
                if b == b'"' {
                    let page = self.finish_attr()?;
                    self.state = State::BeforeAttrName;
                    return Ok(page);
                }
                self.attr_value.push(b);
            }
            State::AttrValueSingle => {
                if b == b'\'' {
                    let page = self.finish_attr()?;
                    self.state = State::BeforeAttrName;
                    return Ok(page);
                }
                self.attr_value.push(b);
            }
            State::AttrValueUnquoted => match b {
                b if b.is_ascii_whitespace() => {
                    let page = self.finish_attr()?;
                    self.state = State::BeforeAttrName;
                    return Ok(page);
                }
                b'>' => {
                    let page = self.finish_attr()?;
                    self.finish_tag_open();
                    return Ok(page);
                }
                _ => self.attr_value.push(b),
            },
            State::RawText => {
                if b == b'<' {
                    self.state = State::RawTextLt;
                }
            }
            State::RawTextLt => match b {
                b'/' => {
                    self.end_name.clear();
                    self.state = State::RawTextEndName;
                }
                b'<' => {}
                _ => self.state = State::RawText,
            },
            State::RawTextEndName => {
                if b.is_ascii_alphabetic() && self.end_name.len() < 8 {
                    self.end_name.push(b.to_ascii_lowercase() as char);
                } else if self.end_name == self.raw_end {
                    self.state = if b == b'>' { State::Text } else { State::Bogus };
                } else {
                    self.state = if b == b'<' { State::RawTextLt } else { State::RawText };
                }
            }
            State::Matched => {}
        }
        Ok(None)
    }

    /// Close out the current start tag.
    fn finish_tag_open(&mut self) {
        if self.tag_name == "script" || self.tag_name == "style" {
            self.raw_end = self.tag_name.clone();
            self.state = State::RawText;
        } else {
            self.state = State::Text;
        }
        self.candidate = false;
    }

    /// Complete the current attribute, in declaration order.
    fn finish_attr(&mut self) -> Result<Option<PageData>> {
        let name = std::mem::take(&mut self.attr_name);
        let value = std::mem::take(&mut self.attr_value);

        if name == "id" && value == b"pagedata" {
            self.candidate = true;
        } else if self.candidate && name == "data-blob" {
            let json = unescape_entities(&String::from_utf8_lossy(&value));
            let page: PageData = serde_json::from_str(&json)?;
            return Ok(Some(page));
        }

        Ok(None)
    }
}

/// Scan a complete document held in memory.
///
/// Returns `Ok(None)` when no pagedata element is present; the caller
/// decides how to report the absence.
pub fn extract_page_data(html: &str) -> Result<Option<PageData>> {
    let mut scanner = PageDataScanner::new();
    scanner.feed(html.as_bytes())
}

/// Decode the handful of entities that appear in attribute values.
fn unescape_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let semi = tail.find(';').filter(|&i| i <= 12);
        let Some(semi) = semi else {
            out.push('&');
            rest = &tail[1..];
            continue;
        };

        let entity = &tail[1..semi];
        let decoded = match entity {
            "quot" => Some('"'),
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix('#')
                .and_then(|num| {
                    if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        num.parse::<u32>().ok()
                    }
                })
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
