//! Streaming element scanner.
//!
//! Wraps quick-xml's pull reader and turns its events into element
//! open/close events annotated with positional paths and source lines. It is
//! the single place where paths are assigned: the position index and the
//! comparison tree are both built from it, so an element found by comparison
//! always resolves to the lines it was read from.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::lines::LineIndex;
use crate::error::{ParseError, ParseErrorKind};
use crate::index::LineRange;
use crate::path::{local_name, PositionalPath, SiblingOrdinals};

/// A start tag (or self-closing tag) with its assigned path.
#[derive(Debug)]
pub(crate) struct OpenTag {
    pub qname: String,
    /// Raw attributes in source order, `xmlns` declarations included.
    pub attributes: Vec<(String, String)>,
    pub path: PositionalPath,
    pub start_line: usize,
}

/// An element whose end tag has been read.
#[derive(Debug)]
pub(crate) struct ClosedElement {
    pub path: PositionalPath,
    pub range: LineRange,
}

#[derive(Debug)]
pub(crate) enum ScanEvent {
    Open(OpenTag),
    Close(ClosedElement),
    /// Unescaped character data inside the document element.
    Text(String),
    Comment(String),
}

struct OpenFrame {
    qname: String,
    path: PositionalPath,
    start_line: usize,
}

pub(crate) struct Scanner<'a> {
    reader: Reader<&'a [u8]>,
    lines: LineIndex,
    open: Vec<OpenFrame>,
    ordinals: SiblingOrdinals,
    /// Close event owed for a self-closing tag.
    pending: Option<ClosedElement>,
    seen_root: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        // Whitespace must reach us as separate events so that the reader
        // position before a start tag is exactly its '<'.
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        reader.config_mut().check_end_names = true;

        Scanner {
            reader,
            lines: LineIndex::new(xml),
            open: Vec::new(),
            ordinals: SiblingOrdinals::new(),
            pending: None,
            seen_root: false,
        }
    }

    /// Returns the next event, `None` at the end of a well-formed document.
    pub fn next_event(&mut self) -> Result<Option<ScanEvent>, ParseError> {
        if let Some(closed) = self.pending.take() {
            return Ok(Some(ScanEvent::Close(closed)));
        }

        loop {
            let offset = self.position();
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let at = self.reader.error_position() as usize;
                    return Err(self.error_at(at, ParseErrorKind::Syntax(err.to_string())));
                }
            };

            match event {
                Event::Start(e) => {
                    let tag = self.open_tag(&e, offset)?;
                    return Ok(Some(ScanEvent::Open(tag)));
                }
                Event::Empty(e) => {
                    let tag = self.open_tag(&e, offset)?;
                    self.pending = Some(self.close_tag(offset)?);
                    return Ok(Some(ScanEvent::Open(tag)));
                }
                Event::End(_) => {
                    // The reader now sits just past the closing '>'.
                    let end = self.position().saturating_sub(1);
                    return self.close_tag(end).map(|c| Some(ScanEvent::Close(c)));
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| {
                            self.error_at(offset, ParseErrorKind::Encoding(err.to_string()))
                        })?
                        .into_owned();
                    if let Some(event) = self.character_data(text, offset)? {
                        return Ok(Some(event));
                    }
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    if let Some(event) = self.character_data(text, offset)? {
                        return Ok(Some(event));
                    }
                }
                Event::Comment(e) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    return Ok(Some(ScanEvent::Comment(text)));
                }
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => return self.finish(offset),
            }
        }
    }

    fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    fn open_tag(&mut self, e: &BytesStart<'_>, offset: usize) -> Result<OpenTag, ParseError> {
        if self.open.is_empty() {
            if self.seen_root {
                return Err(self.error_at(offset, ParseErrorKind::MultipleRoots));
            }
            self.seen_root = true;
        }

        let qname = self.decode(e.name().as_ref(), offset)?;
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr
                .map_err(|err| self.error_at(offset, ParseErrorKind::Encoding(err.to_string())))?;
            let key = self.decode(attr.key.as_ref(), offset)?;
            let value = attr
                .unescape_value()
                .map_err(|err| self.error_at(offset, ParseErrorKind::Encoding(err.to_string())))?
                .into_owned();
            attributes.push((key, value));
        }

        let parent = self
            .open
            .last()
            .map_or_else(PositionalPath::document, |frame| frame.path.clone());
        let ordinal = self.ordinals.enter(local_name(&qname));
        let path = parent.child(&qname, ordinal);
        let start_line = self.lines.line(offset);

        self.open.push(OpenFrame {
            qname: qname.clone(),
            path: path.clone(),
            start_line,
        });

        Ok(OpenTag {
            qname,
            attributes,
            path,
            start_line,
        })
    }

    fn close_tag(&mut self, end_offset: usize) -> Result<ClosedElement, ParseError> {
        let frame = self.open.pop().ok_or_else(|| {
            self.error_at(
                end_offset,
                ParseErrorKind::Syntax("end tag without a matching start tag".to_string()),
            )
        })?;
        self.ordinals.leave();

        let end_line = self.lines.line(end_offset).max(frame.start_line);
        Ok(ClosedElement {
            path: frame.path,
            range: LineRange::new(frame.start_line, end_line),
        })
    }

    fn character_data(
        &self,
        text: String,
        offset: usize,
    ) -> Result<Option<ScanEvent>, ParseError> {
        if !self.open.is_empty() {
            return Ok(Some(ScanEvent::Text(text)));
        }
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Err(self.error_at(offset, ParseErrorKind::TextOutsideRoot))
        }
    }

    fn finish(&self, offset: usize) -> Result<Option<ScanEvent>, ParseError> {
        if let Some(frame) = self.open.last() {
            return Err(self.error_at(
                offset,
                ParseErrorKind::UnclosedElement(frame.qname.clone()),
            ));
        }
        if !self.seen_root {
            return Err(self.error_at(offset, ParseErrorKind::EmptyDocument));
        }
        Ok(None)
    }

    fn decode(&self, bytes: &[u8], offset: usize) -> Result<String, ParseError> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|err| self.error_at(offset, ParseErrorKind::Encoding(err.to_string())))
    }

    fn error_at(&self, offset: usize, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.lines.location(offset))
    }
}
