//! Pull Reader
//!
//! `MarkupReader` walks a character stream one node at a time. Each call to
//! [`MarkupReader::advance`] classifies the upcoming content from a two
//! character window, dispatches to the matching scanner, and loops while the
//! content is text-like so that text, CDATA and entity runs coalesce into a
//! single Text node and comments, processing instructions and DOCTYPE
//! declarations disappear.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{trace, warn};

use super::config::ReaderConfig;
use super::marker::{ElementStack, Marker};
use super::node::{Node, NodeKind, ScanKind};
use crate::core::entities::{decode_numeric, is_valid_xml_char, EntityTable};
use crate::core::lookahead::Lookahead;
use crate::core::text_buffer::TextBuffer;
use crate::error::{Error, Position, Result};

const UNEXPECTED_EOF: &str = "Unexpected EOF";

/// Longest text rendering included in error messages
const DESCRIPTION_LIMIT: usize = 40;

/// Streaming pull reader over a markup document
pub struct MarkupReader<R: Read> {
    input: Lookahead<R>,
    config: ReaderConfig,
    entities: EntityTable,
    buffer: TextBuffer,
    attributes: HashMap<String, String>,
    stack: ElementStack,
    kind: NodeKind,
    name: Option<String>,
    is_whitespace: bool,
    is_empty_element: bool,
    started: bool,
    failed: bool,
}

impl<R: Read> MarkupReader<R> {
    /// Create a reader with default configuration
    pub fn new(source: R) -> Result<Self> {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Create a reader with explicit configuration
    pub fn with_config(source: R, config: ReaderConfig) -> Result<Self> {
        let input = Lookahead::new(source, config.encoding, config.block_size)?;
        Ok(MarkupReader {
            input,
            config,
            entities: EntityTable::new(),
            buffer: TextBuffer::with_capacity(128),
            attributes: HashMap::new(),
            stack: ElementStack::default(),
            kind: NodeKind::StartDocument,
            name: None,
            is_whitespace: false,
            is_empty_element: false,
            started: false,
            failed: false,
        })
    }

    /// Define a character entity mapping for `&name;` references
    pub fn define_entity(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entities.define(name, value);
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Encoding the input is being decoded with
    pub fn encoding(&self) -> &'static encoding_rs::Encoding {
        self.input.encoding()
    }

    /// Give back the underlying source
    pub fn into_inner(self) -> R {
        self.input.into_inner()
    }

    // ========================================================================
    // Current node
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Tag name of the current start or end tag, empty otherwise
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Content of the current text node, empty otherwise
    #[inline]
    pub fn text(&self) -> &str {
        if self.kind == NodeKind::Text {
            self.buffer.as_str()
        } else {
            ""
        }
    }

    /// Whether the current node is text with no character above a space
    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.is_whitespace
    }

    /// Whether the current start tag was self-closed (`<name/>`)
    #[inline]
    pub fn is_empty_element(&self) -> bool {
        self.is_empty_element
    }

    /// Number of currently open elements
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Borrowed view of the current node
    pub fn node(&self) -> Node<'_> {
        let is_tag = matches!(self.kind, NodeKind::StartTag | NodeKind::EndTag);
        Node {
            kind: self.kind,
            name: if is_tag { self.name.as_deref() } else { None },
            text: (self.kind == NodeKind::Text).then(|| self.buffer.as_str()),
            is_whitespace: self.is_whitespace,
            attributes: &self.attributes,
            is_empty_element: self.is_empty_element,
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.input.position()
    }

    pub fn line(&self) -> u32 {
        self.input.position().line
    }

    pub fn column(&self) -> u32 {
        self.input.position().column
    }

    /// `KIND @line:column: node` rendering of the current state
    pub fn position_description(&self) -> String {
        format!("{} @{}: {}", self.kind, self.position(), self.describe_node())
    }

    fn describe_node(&self) -> String {
        match self.kind {
            NodeKind::StartTag => format!("<{}>", self.name()),
            NodeKind::EndTag => format!("</{}>", self.name()),
            _ if self.is_whitespace => "[whitespace]".to_string(),
            _ => {
                let text = self.buffer.as_str();
                match text.char_indices().nth(DESCRIPTION_LIMIT) {
                    Some((cut, _)) => format!("{}...", &text[..cut]),
                    None => text.to_string(),
                }
            }
        }
    }

    fn fail(&self, message: impl Into<String>) -> Error {
        Error::NotWellFormed {
            message: message.into(),
            position: self.position(),
            node: format!("{} {}", self.kind, self.describe_node()),
        }
    }

    /// Mark the reader unusable when `result` is an error
    fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    // ========================================================================
    // Advancing
    // ========================================================================

    /// Move to the next node and return its kind
    ///
    /// The first call returns [`NodeKind::StartDocument`] without consuming
    /// input. Any error is fatal: later calls return [`Error::Unusable`].
    pub fn advance(&mut self) -> Result<NodeKind> {
        if self.failed {
            return Err(Error::Unusable);
        }
        let result = self.next_node();
        self.guard(result)
    }

    fn next_node(&mut self) -> Result<NodeKind> {
        if !self.started {
            self.started = true;
            self.kind = NodeKind::StartDocument;
            return Ok(self.kind);
        }

        self.attributes.clear();

        // <name/> reports its end tag without touching the input
        if self.is_empty_element {
            self.is_empty_element = false;
            self.stack.pop();
            self.kind = NodeKind::EndTag;
            return Ok(self.kind);
        }

        self.buffer.clear();
        self.name = None;
        self.is_whitespace = true;
        let mut have_text = false;

        loop {
            let scan = ScanKind::classify(self.input.peek0(), self.input.peek1());
            if have_text && !scan.is_text_like() {
                self.kind = NodeKind::Text;
                return Ok(self.kind);
            }

            match scan {
                ScanKind::EndDocument => {
                    self.is_whitespace = false;
                    self.kind = NodeKind::EndDocument;
                    if let Some(open) = self.stack.top() {
                        let message = format!("{UNEXPECTED_EOF}, expected: </{open}>");
                        return Err(self.fail(message));
                    }
                    return Ok(self.kind);
                }
                ScanKind::StartTag => {
                    self.is_whitespace = false;
                    self.kind = NodeKind::StartTag;
                    self.parse_start_tag()?;
                    return Ok(self.kind);
                }
                ScanKind::EndTag => {
                    self.is_whitespace = false;
                    self.kind = NodeKind::EndTag;
                    self.parse_end_tag()?;
                    return Ok(self.kind);
                }
                ScanKind::Text => {
                    self.kind = NodeKind::Text;
                    let whitespace = self.push_text()?;
                    self.is_whitespace &= whitespace;
                    have_text = true;
                }
                ScanKind::EntityRef => {
                    self.kind = NodeKind::Text;
                    let whitespace = self.push_entity(None)?;
                    self.is_whitespace &= whitespace;
                    have_text = true;
                }
                ScanKind::CData => {
                    self.kind = NodeKind::Text;
                    self.parse_legacy_cdata()?;
                    self.is_whitespace = false;
                    have_text = true;
                }
                ScanKind::Other => {
                    if self.parse_other()? {
                        self.kind = NodeKind::Text;
                        self.is_whitespace = false;
                        have_text = true;
                    }
                }
            }
        }
    }

    // ========================================================================
    // Scanners
    // ========================================================================

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.input.read()? {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(self.fail(format!("expected: '{expected}', found: '{ch}'"))),
            None => Err(self.fail(format!("{UNEXPECTED_EOF}, expected: '{expected}'"))),
        }
    }

    fn expect_str(&mut self, expected: &str) -> Result<()> {
        for ch in expected.chars() {
            self.expect(ch)?;
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while matches!(self.input.peek0(), Some(ch) if ch <= ' ') {
            self.input.read()?;
        }
        Ok(())
    }

    fn read_name(&mut self) -> Result<String> {
        if !matches!(self.input.peek0(), Some(ch) if is_name_start(ch)) {
            return Err(self.fail("name expected"));
        }
        let mark = self.buffer.mark();
        while let Some(ch) = self.input.peek0() {
            if !is_name_char(ch) {
                break;
            }
            self.input.read()?;
            self.buffer.push(ch);
        }
        Ok(self.buffer.pop(mark))
    }

    /// `<name attr="value" ...>` or `<name .../>`
    fn parse_start_tag(&mut self) -> Result<()> {
        self.input.read()?; // '<'
        let name = self.read_name()?;
        self.stack.push(name.clone());
        self.name = Some(name);

        loop {
            self.skip_whitespace()?;
            match self.input.peek0() {
                Some('/') => {
                    self.input.read()?;
                    self.skip_whitespace()?;
                    self.expect('>')?;
                    self.is_empty_element = true;
                    return Ok(());
                }
                Some('>') => {
                    self.input.read()?;
                    return Ok(());
                }
                None => return Err(self.fail(UNEXPECTED_EOF)),
                Some(_) => {}
            }

            let attribute = self.read_name()?;
            self.skip_whitespace()?;
            self.expect('=')?;
            self.skip_whitespace()?;
            let delimiter = match self.input.read()? {
                Some(ch @ ('"' | '\'')) => ch,
                Some(ch) => {
                    let message = format!("<{}>: invalid delimiter: {ch}", self.name());
                    return Err(self.fail(message));
                }
                None => return Err(self.fail(UNEXPECTED_EOF)),
            };

            let mark = self.buffer.mark();
            self.push_attribute_value(delimiter)?;
            let value = self.buffer.pop(mark);
            self.attributes.insert(attribute, value);
        }
    }

    fn push_attribute_value(&mut self, delimiter: char) -> Result<()> {
        loop {
            match self.input.peek0() {
                Some(ch) if ch == delimiter => {
                    self.input.read()?;
                    return Ok(());
                }
                Some('&') => {
                    self.push_entity(Some(delimiter))?;
                }
                Some(ch) => {
                    self.input.read()?;
                    self.buffer.push(ch);
                }
                None => return Err(self.fail(format!("{UNEXPECTED_EOF} in attribute value"))),
            }
        }
    }

    /// `</name>`; must close the innermost open element
    fn parse_end_tag(&mut self) -> Result<()> {
        self.input.read()?; // '<'
        self.input.read()?; // '/'
        let name = self.read_name()?;
        self.name = Some(name);

        if self.stack.is_empty() {
            return Err(self.fail("element stack empty"));
        }
        if self.stack.top() != self.name.as_deref() {
            let message = format!("expected: </{}>", self.stack.top().unwrap_or_default());
            return Err(self.fail(message));
        }
        self.stack.pop();

        self.skip_whitespace()?;
        self.expect('>')
    }

    /// Copy literal text up to the next `<` or `&`; true if all whitespace
    fn push_text(&mut self) -> Result<bool> {
        let mut whitespace = true;
        while let Some(ch) = self.input.peek0() {
            if ch == '<' || ch == '&' {
                break;
            }
            if ch > ' ' {
                whitespace = false;
            }
            self.input.read()?;
            self.buffer.push(ch);
        }
        Ok(whitespace)
    }

    /// Resolve `&name;` or `&#N;` into the buffer; true if the expansion is
    /// all whitespace.
    ///
    /// `delimiter` is the closing quote when inside an attribute value. In
    /// lenient mode an `&` with no `;` before the next `<` (or the closing
    /// quote) is kept as literal text; strict mode also stops at whitespace
    /// and `&` and treats every unterminated reference as an error.
    fn push_entity(&mut self, delimiter: Option<char>) -> Result<bool> {
        self.input.read()?; // '&'
        let strict = self.config.strict_entities;
        let mark = self.buffer.mark();
        loop {
            match self.input.peek0() {
                Some(';') => {
                    self.input.read()?;
                    break;
                }
                None => {
                    let message = format!(
                        "{UNEXPECTED_EOF} in entity reference: &{}",
                        self.buffer.since(mark)
                    );
                    return Err(self.fail(message));
                }
                Some(ch)
                    if ch == '<' || Some(ch) == delimiter || (strict && (ch <= ' ' || ch == '&')) =>
                {
                    if strict {
                        let message =
                            format!("unterminated entity reference: &{}", self.buffer.since(mark));
                        return Err(self.fail(message));
                    }
                    let code = self.buffer.pop(mark);
                    self.buffer.push('&');
                    self.buffer.push_str(&code);
                    return Ok(false);
                }
                Some(ch) => {
                    self.input.read()?;
                    self.buffer.push(ch);
                }
            }
        }
        let code = self.buffer.pop(mark);

        if let Some(reference) = code.strip_prefix('#') {
            return match decode_numeric(reference) {
                Some(ch) if !self.config.strict_entities || is_valid_xml_char(ch) => {
                    self.buffer.push(ch);
                    Ok(ch <= ' ')
                }
                _ => Err(self.fail(format!("invalid character reference: &{code};"))),
            };
        }

        match self.entities.get(&code) {
            Some(value) => {
                self.buffer.push_str(value);
                Ok(value.chars().all(|ch| ch <= ' '))
            }
            None if self.config.strict_entities => {
                Err(self.fail(format!("unknown entity: &{code};")))
            }
            None => {
                // Unknown names pass through untouched
                self.buffer.push('&');
                self.buffer.push_str(&code);
                self.buffer.push(';');
                Ok(false)
            }
        }
    }

    /// `<[CDATA[...]]>`
    fn parse_legacy_cdata(&mut self) -> Result<()> {
        self.input.read()?; // '<'
        self.expect_str("[CDATA[")?;
        self.copy_cdata()
    }

    /// Copy CDATA content verbatim up to `]]>`
    fn copy_cdata(&mut self) -> Result<()> {
        loop {
            match self.input.read()? {
                Some(']') if self.input.peek0() == Some(']') && self.input.peek1() == Some('>') => {
                    self.input.read()?;
                    self.input.read()?;
                    return Ok(());
                }
                Some(ch) => self.buffer.push(ch),
                None => return Err(self.fail(format!("{UNEXPECTED_EOF} in CDATA section"))),
            }
        }
    }

    /// Comment, processing instruction, DOCTYPE or `<![CDATA[...]]>`.
    /// Returns true when the construct turned out to be CDATA content.
    fn parse_other(&mut self) -> Result<bool> {
        self.input.read()?; // '<'
        match self.input.read()? {
            Some('?') => {
                self.skip_processing_instruction()?;
                trace!("discarded processing instruction @{}", self.input.position());
                Ok(false)
            }
            Some('!') => match self.input.peek0() {
                Some('-') => {
                    self.expect_str("--")?;
                    self.skip_comment()?;
                    trace!("discarded comment @{}", self.input.position());
                    Ok(false)
                }
                Some('[') => {
                    self.expect_str("[CDATA[")?;
                    self.copy_cdata()?;
                    Ok(true)
                }
                _ => {
                    self.expect_str("DOCTYPE")?;
                    self.skip_doctype()?;
                    trace!("discarded DOCTYPE @{}", self.input.position());
                    Ok(false)
                }
            },
            other => Err(self.fail(format!("can't reach: {other:?}"))),
        }
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        loop {
            if self.input.peek0() == Some('?') && self.input.peek1() == Some('>') {
                self.input.read()?;
                self.input.read()?;
                return Ok(());
            }
            if self.input.read()?.is_none() {
                return Err(self.fail(format!("{UNEXPECTED_EOF} in processing instruction")));
            }
        }
    }

    fn skip_comment(&mut self) -> Result<()> {
        loop {
            match self.input.read()? {
                Some('-') if self.input.peek0() == Some('-') && self.input.peek1() == Some('>') => {
                    self.input.read()?;
                    self.input.read()?;
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(self.fail(format!("{UNEXPECTED_EOF} in comment"))),
            }
        }
    }

    /// Skip to the `>` closing the declaration, stepping over a bracketed
    /// internal subset by counting nested `<`/`>` pairs
    fn skip_doctype(&mut self) -> Result<()> {
        let mut nesting = 1usize;
        loop {
            match self.input.read()? {
                Some('<') => nesting += 1,
                Some('>') => {
                    nesting -= 1;
                    if nesting == 0 {
                        return Ok(());
                    }
                }
                Some(_) => {}
                None => return Err(self.fail(format!("{UNEXPECTED_EOF} in DOCTYPE"))),
            }
        }
    }

    // ========================================================================
    // Markers and structure checks
    // ========================================================================

    /// Marker for detecting the end of the current element
    ///
    /// ```
    /// # use streamxml::{MarkupReader, NodeKind};
    /// let mut reader = MarkupReader::from_text("<list><item/><item/></list>").unwrap();
    /// reader.advance().unwrap();
    /// reader.advance().unwrap();
    /// let marker = reader.mark();
    /// let mut items = 0;
    /// loop {
    ///     if reader.advance().unwrap() == NodeKind::StartTag {
    ///         items += 1;
    ///     }
    ///     if !reader.still_within(&marker).unwrap() {
    ///         break;
    ///     }
    /// }
    /// assert_eq!(items, 2);
    /// ```
    pub fn mark(&self) -> Marker {
        match self.kind {
            NodeKind::StartTag => Marker::new(self.stack.depth().saturating_sub(1), self.name()),
            NodeKind::EndTag => Marker::new(self.stack.depth(), self.name()),
            _ => Marker::new(self.stack.depth(), self.stack.top().unwrap_or("")),
        }
    }

    /// Whether the reader is still inside the element `marker` was taken on.
    /// On the element's end tag this advances once more and returns false.
    pub fn still_within(&mut self, marker: &Marker) -> Result<bool> {
        if self.failed {
            return Err(Error::Unusable);
        }
        match self.kind {
            NodeKind::EndTag if marker.is_at(self.stack.depth(), self.name()) => {
                self.advance()?;
                Ok(false)
            }
            NodeKind::EndDocument => {
                let error = self.fail(format!("expected: {}/{}", NodeKind::EndTag, marker.name()));
                self.guard(Err(error))
            }
            _ => Ok(true),
        }
    }

    /// Require the current node to be `kind` (and named `name`, if given).
    /// A whitespace-only text node is stepped over first unless text is
    /// what's required.
    pub fn require(&mut self, kind: NodeKind, name: Option<&str>) -> Result<()> {
        if self.kind == NodeKind::Text && kind != NodeKind::Text && self.is_whitespace {
            self.advance()?;
        }
        let name_matches = name.map_or(true, |name| Some(name) == self.name.as_deref());
        if self.kind != kind || !name_matches {
            let error = self.fail(format!("expected: {kind}/{}", name.unwrap_or("*")));
            return self.guard(Err(error));
        }
        Ok(())
    }

    /// Advance through the rest of the document as an iterator of node kinds
    pub fn nodes(&mut self) -> Nodes<'_, R> {
        Nodes { reader: self }
    }

    /// Skip the current start tag `name` and its whole subtree, leaving the
    /// reader on the node after its end tag
    pub fn skip_tag(&mut self, name: &str) -> Result<()> {
        if self.config.log_skipped_tags {
            warn!("Skipping tag: {} @{}", name, self.input.position());
        }
        self.require(NodeKind::StartTag, Some(name))?;
        let marker = self.mark();
        loop {
            self.advance()?;
            if !self.still_within(&marker)? {
                return Ok(());
            }
        }
    }
}

impl<'a> MarkupReader<&'a [u8]> {
    /// Read from an in-memory string
    pub fn from_text(text: &'a str) -> Result<Self> {
        let config = ReaderConfig::default().with_encoding(encoding_rs::UTF_8);
        Self::with_config(text.as_bytes(), config)
    }
}

impl MarkupReader<File> {
    /// Read from a file, detecting its encoding
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::with_config(file, config)
    }
}

/// Iterator over node kinds, from [`MarkupReader::nodes`]
pub struct Nodes<'r, R: Read> {
    reader: &'r mut MarkupReader<R>,
}

/// Yields node kinds up to, but not including, the end of the document
impl<R: Read> Iterator for Nodes<'_, R> {
    type Item = Result<NodeKind>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = &mut *self.reader;
        if reader.failed || reader.kind == NodeKind::EndDocument {
            return None;
        }
        match reader.advance() {
            Ok(NodeKind::EndDocument) => None,
            other => Some(other),
        }
    }
}

#[inline]
fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == ':'
}

#[inline]
fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(input: &str) -> MarkupReader<&[u8]> {
        let mut reader = MarkupReader::from_text(input).unwrap();
        assert_eq!(reader.advance().unwrap(), NodeKind::StartDocument);
        reader
    }

    /// Every node as (kind, name, text)
    fn all_nodes(input: &str) -> Result<Vec<NodeKind>> {
        let mut reader = MarkupReader::from_text(input)?;
        reader.nodes().collect()
    }

    fn nodes(input: &str) -> Vec<(NodeKind, String, String)> {
        let mut reader = reader(input);
        let mut out = Vec::new();
        loop {
            let kind = reader.advance().unwrap();
            if kind == NodeKind::EndDocument {
                return out;
            }
            out.push((kind, reader.name().to_string(), reader.text().to_string()));
        }
    }

    #[test]
    fn test_simple_element() {
        let mut reader = reader("<root>hello</root>");
        assert_eq!(reader.advance().unwrap(), NodeKind::StartTag);
        assert_eq!(reader.name(), "root");
        assert_eq!(reader.depth(), 1);
        assert_eq!(reader.advance().unwrap(), NodeKind::Text);
        assert_eq!(reader.text(), "hello");
        assert!(!reader.is_whitespace());
        assert_eq!(reader.advance().unwrap(), NodeKind::EndTag);
        assert_eq!(reader.name(), "root");
        assert_eq!(reader.depth(), 0);
        assert_eq!(reader.advance().unwrap(), NodeKind::EndDocument);
        assert_eq!(reader.advance().unwrap(), NodeKind::EndDocument);
    }

    #[test]
    fn test_start_document_consumes_nothing() {
        let mut reader = MarkupReader::from_text("<a/>").unwrap();
        assert_eq!(reader.kind(), NodeKind::StartDocument);
        assert_eq!(reader.advance().unwrap(), NodeKind::StartDocument);
        assert_eq!(reader.position(), Position::START);
        assert_eq!(reader.advance().unwrap(), NodeKind::StartTag);
    }

    #[test]
    fn test_attributes() {
        let mut reader = reader("<div id=\"main\" class='a &amp; b' empty=\"\">x</div>");
        reader.advance().unwrap();
        assert_eq!(reader.attribute("id"), Some("main"));
        assert_eq!(reader.attribute("class"), Some("a & b"));
        assert_eq!(reader.attribute("empty"), Some(""));
        assert_eq!(reader.attribute("missing"), None);
        assert_eq!(reader.attributes().len(), 3);

        reader.advance().unwrap();
        assert!(reader.attributes().is_empty());
    }

    #[test]
    fn test_attribute_whitespace_around_equals() {
        let mut reader = reader("<a  x = \"1\"\n\ty='2' ></a>");
        reader.advance().unwrap();
        assert_eq!(reader.attribute("x"), Some("1"));
        assert_eq!(reader.attribute("y"), Some("2"));
    }

    #[test]
    fn test_self_closing_equivalence() {
        let mut short = reader("<r><x a=\"1\"/></r>");
        short.advance().unwrap();
        assert_eq!(short.advance().unwrap(), NodeKind::StartTag);
        assert!(short.is_empty_element());
        assert_eq!(short.attribute("a"), Some("1"));
        assert_eq!(short.depth(), 2);
        assert_eq!(short.advance().unwrap(), NodeKind::EndTag);
        assert_eq!(short.name(), "x");
        assert!(!short.is_empty_element());
        assert_eq!(short.depth(), 1);

        let mut long = reader("<r><x a=\"1\"></x></r>");
        long.advance().unwrap();
        assert_eq!(long.advance().unwrap(), NodeKind::StartTag);
        assert!(!long.is_empty_element());
        assert_eq!(long.advance().unwrap(), NodeKind::EndTag);
        assert_eq!(long.name(), "x");
    }

    #[test]
    fn test_coalescing() {
        let found = nodes("<a>a&amp;<!--x-->b</a>");
        assert_eq!(found.len(), 3);
        assert_eq!(found[1], (NodeKind::Text, String::new(), "a&b".to_string()));
    }

    #[test]
    fn test_text_before_comment_is_kept() {
        let found = nodes("<a>x<!-- note --></a>");
        assert_eq!(found[1].2, "x");
        assert_eq!(found[2].0, NodeKind::EndTag);
    }

    #[test]
    fn test_comment_only_yields_no_text() {
        let found = nodes("<a><!-- c --><?pi data?></a>");
        let kinds: Vec<_> = found.iter().map(|n| n.0).collect();
        assert_eq!(kinds, vec![NodeKind::StartTag, NodeKind::EndTag]);
    }

    #[test]
    fn test_no_adjacent_text_nodes() {
        let found = nodes("<a> x <![CDATA[<y>]]> &lt;z&gt; <[CDATA[w]]><!--c-->&#65;</a>");
        assert_eq!(found.len(), 3);
        assert_eq!(found[1].2, " x <y> <z> wA");
    }

    #[test]
    fn test_cdata_never_whitespace() {
        let mut reader = reader("<a><![CDATA[  ]]></a>");
        reader.advance().unwrap();
        assert_eq!(reader.advance().unwrap(), NodeKind::Text);
        assert_eq!(reader.text(), "  ");
        assert!(!reader.is_whitespace());
    }

    #[test]
    fn test_cdata_with_brackets() {
        let found = nodes("<a><![CDATA[x]]]></a>");
        assert_eq!(found[1].2, "x]");
        let found = nodes("<a><![CDATA[]]></a>");
        assert_eq!(found[1], (NodeKind::Text, String::new(), String::new()));
    }

    #[test]
    fn test_whitespace_flag() {
        let mut reader = reader("<a>\n\t <b/>&#32;&#10;</a>");
        reader.advance().unwrap();
        assert_eq!(reader.advance().unwrap(), NodeKind::Text);
        assert!(reader.is_whitespace());
        reader.advance().unwrap();
        reader.advance().unwrap();
        assert_eq!(reader.advance().unwrap(), NodeKind::Text);
        assert_eq!(reader.text(), " \n");
        assert!(reader.is_whitespace());
        assert_eq!(reader.advance().unwrap(), NodeKind::EndTag);
        assert!(!reader.is_whitespace());
    }

    #[test]
    fn test_numeric_refs() {
        let found = nodes("<a>&#65;&#x41;</a>");
        assert_eq!(found[1].2, "AA");
    }

    #[test]
    fn test_unknown_entity_passes_through() {
        let found = nodes("<a>&nbsp;x</a>");
        assert_eq!(found[1].2, "&nbsp;x");
    }

    #[test]
    fn test_defined_entity() {
        let mut reader = reader("<a>&copy; 2020</a>");
        reader.define_entity("copy", "(c)");
        reader.advance().unwrap();
        reader.advance().unwrap();
        assert_eq!(reader.text(), "(c) 2020");
    }

    #[test]
    fn test_strict_entities() {
        let config = ReaderConfig::default().with_strict_entities(true);
        let mut reader = MarkupReader::with_config("<a>&nbsp;</a>".as_bytes(), config).unwrap();
        reader.advance().unwrap();
        reader.advance().unwrap();
        let err = reader.advance().unwrap_err();
        assert!(err.to_string().contains("unknown entity"));
    }

    #[test]
    fn test_bare_ampersand_kept_literally() {
        let found = nodes("<a>AT&T rocks; ok</a>");
        assert_eq!(found[1].2, "AT&T rocks; ok");

        let found = nodes("<a>fish & chips</a>");
        assert_eq!(found.len(), 3);
        assert_eq!(found[1].2, "fish & chips");
        assert_eq!(found[2], (NodeKind::EndTag, "a".to_string(), String::new()));
    }

    #[test]
    fn test_bare_ampersand_in_attribute() {
        let mut reader = reader("<a q=\"R&D\" r='x &amp; y'/>");
        reader.advance().unwrap();
        assert_eq!(reader.attribute("q"), Some("R&D"));
        assert_eq!(reader.attribute("r"), Some("x & y"));
    }

    #[test]
    fn test_strict_rejects_bare_ampersand() {
        let config = ReaderConfig::default().with_strict_entities(true);
        let mut reader = MarkupReader::with_config("<a>AT&T rocks; ok</a>".as_bytes(), config).unwrap();
        reader.advance().unwrap();
        reader.advance().unwrap();
        let err = reader.advance().unwrap_err();
        assert!(err.to_string().contains("unterminated entity reference: &T"));
    }

    #[test]
    fn test_strict_character_references() {
        for input in ["<a>&#0;</a>", "<a>&#xFFFE;</a>"] {
            let config = ReaderConfig::default().with_strict_entities(true);
            let mut reader = MarkupReader::with_config(input.as_bytes(), config).unwrap();
            reader.advance().unwrap();
            reader.advance().unwrap();
            let err = reader.advance().unwrap_err();
            assert!(err.to_string().contains("invalid character reference"));
        }

        assert_eq!(nodes("<a>&#0;</a>")[1].2, "\u{0}");
        assert_eq!(nodes("<a>&#xFFFE;</a>")[1].2, "\u{FFFE}");
    }

    #[test]
    fn test_unparsable_character_reference() {
        for strict in [false, true] {
            let config = ReaderConfig::default().with_strict_entities(strict);
            let mut reader = MarkupReader::with_config("<a>&#xZZ;</a>".as_bytes(), config).unwrap();
            reader.advance().unwrap();
            reader.advance().unwrap();
            let err = reader.advance().unwrap_err();
            assert!(err.to_string().contains("invalid character reference: &#xZZ;"));
        }
        assert!(all_nodes("<a>&#1114112;</a>").is_err());
    }

    #[test]
    fn test_doctype_with_internal_subset() {
        let input = "<?xml version=\"1.0\"?>\n<!DOCTYPE r [\n<!ENTITY e \"v\">\n<!ELEMENT r ANY>\n]>\n<r>t</r>";
        let found = nodes(input);
        let kinds: Vec<_> = found.iter().map(|n| n.0).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Text, NodeKind::StartTag, NodeKind::Text, NodeKind::EndTag]
        );
        assert_eq!(found[0].2, "\n\n");
        assert_eq!(found[2].2, "t");
    }

    #[test]
    fn test_line_endings_in_text() {
        let found = nodes("<a>one\r\ntwo\rthree</a>");
        assert_eq!(found[1].2, "one\ntwo\nthree");
    }

    #[test]
    fn test_mismatched_end_tag() {
        let mut reader = reader("<a><b></a>");
        reader.advance().unwrap();
        reader.advance().unwrap();
        let err = reader.advance().unwrap_err();
        assert!(err.is_well_formedness());
        assert!(err.to_string().contains("expected: </b>"));
        assert!(matches!(reader.advance(), Err(Error::Unusable)));
    }

    #[test]
    fn test_eof_with_open_element() {
        let mut reader = reader("<a><b>text</b>");
        reader.advance().unwrap();
        reader.advance().unwrap();
        reader.advance().unwrap();
        reader.advance().unwrap();
        let err = reader.advance().unwrap_err();
        assert!(err.to_string().contains("</a>"));
    }

    #[test]
    fn test_end_tag_without_start() {
        let err = all_nodes("</a>").unwrap_err();
        assert!(err.to_string().contains("element stack empty"));
    }

    #[test]
    fn test_bad_delimiter() {
        let mut reader = reader("<a x=1>");
        let err = reader.advance().unwrap_err();
        assert!(err.to_string().contains("invalid delimiter"));
    }

    #[test]
    fn test_malformed_name() {
        let mut reader = reader("<1a/>");
        let err = reader.advance().unwrap_err();
        assert!(err.to_string().contains("name expected"));
    }

    #[test]
    fn test_names_are_ascii() {
        let found = nodes("<item_1 data-x.y:z=\"v\"/>");
        assert_eq!(found[0].1, "item_1");

        let mut reader = reader("<caf\u{e9}/>");
        let err = reader.advance().unwrap_err();
        assert!(err.to_string().contains("name expected"));
        assert!(all_nodes("<\u{e9}t\u{e9}/>").is_err());
    }

    #[test]
    fn test_truncated_constructs() {
        for input in [
            "<a",
            "<a x=\"1",
            "<a>&amp",
            "<a><!-- open",
            "<a><![CDATA[open",
            "<?pi",
            "<!DOCTYPE a [",
        ] {
            assert!(all_nodes(input).is_err(), "expected error for {input:?}");
        }
    }

    #[test]
    fn test_error_reports_position() {
        let mut reader = reader("<a>\n  <b></c>");
        reader.advance().unwrap();
        reader.advance().unwrap();
        reader.advance().unwrap();
        let err = reader.advance().unwrap_err();
        let position = err.position().unwrap();
        assert_eq!(position.line, 2);
    }

    #[test]
    fn test_mark_and_still_within() {
        let mut reader = reader("<a><b>1</b><b>2</b></a><tail/>");
        reader.advance().unwrap();
        let marker = reader.mark();
        let mut seen = Vec::new();
        loop {
            if reader.advance().unwrap() == NodeKind::Text {
                seen.push(reader.text().to_string());
            }
            if !reader.still_within(&marker).unwrap() {
                break;
            }
        }
        assert_eq!(seen, vec!["1", "2"]);
        assert_eq!(reader.kind(), NodeKind::StartTag);
        assert_eq!(reader.name(), "tail");
    }

    #[test]
    fn test_skip_tag_nested_same_name() {
        let mut reader = reader("<a><a><a/></a></a>");
        reader.advance().unwrap();
        reader.skip_tag("a").unwrap();
        assert_eq!(reader.kind(), NodeKind::EndDocument);
        assert_eq!(reader.depth(), 0);
    }

    #[test]
    fn test_skip_tag_leaves_siblings() {
        let mut reader = reader("<r><skip><x>1</x></skip><keep/></r>");
        reader.advance().unwrap();
        reader.advance().unwrap();
        reader.skip_tag("skip").unwrap();
        assert_eq!(reader.kind(), NodeKind::StartTag);
        assert_eq!(reader.name(), "keep");
    }

    #[test]
    fn test_skip_tag_requires_name() {
        let mut reader = reader("<r/>");
        reader.advance().unwrap();
        let err = reader.skip_tag("other").unwrap_err();
        assert!(err.to_string().contains("expected: START_TAG/other"));
    }

    #[test]
    fn test_require_skips_whitespace() {
        let mut reader = reader("<r>\n  <item/></r>");
        reader.advance().unwrap();
        reader.advance().unwrap();
        assert_eq!(reader.kind(), NodeKind::Text);
        reader.require(NodeKind::StartTag, Some("item")).unwrap();
        assert_eq!(reader.name(), "item");
        reader.require(NodeKind::StartTag, None).unwrap();
    }

    #[test]
    fn test_node_view() {
        let mut reader = reader("<a k=\"v\">t</a>");
        reader.advance().unwrap();
        let node = reader.node();
        assert_eq!(node.kind, NodeKind::StartTag);
        assert_eq!(node.name, Some("a"));
        assert_eq!(node.text, None);
        assert_eq!(node.attribute("k"), Some("v"));

        reader.advance().unwrap();
        let node = reader.node();
        assert_eq!(node.name, None);
        assert_eq!(node.text, Some("t"));
    }

    #[test]
    fn test_position_description() {
        let mut reader = reader("<a>");
        reader.advance().unwrap();
        assert_eq!(reader.position_description(), "START_TAG @1:4: <a>");
    }

    #[test]
    fn test_nodes_iterator() {
        let kinds = all_nodes("<a>x</a>").unwrap();
        assert_eq!(
            kinds,
            vec![NodeKind::StartDocument, NodeKind::StartTag, NodeKind::Text, NodeKind::EndTag]
        );
    }

    #[test]
    fn test_position_through_mutable_reference() {
        let mut reader = MarkupReader::from_text("<a>\n</a>").unwrap();
        let handle = &mut reader;
        handle.advance().unwrap();
        handle.advance().unwrap();
        assert_eq!(handle.position(), Position { line: 1, column: 4 });
        assert_eq!(handle.nodes().count(), 2);
        assert_eq!(handle.kind(), NodeKind::EndDocument);
        assert_eq!(handle.position(), Position { line: 2, column: 5 });
    }

    #[test]
    fn test_small_block_size() {
        let config = ReaderConfig::default().with_block_size(1);
        let input = "<r a=\"é\">données &amp; 日本</r>";
        let mut reader = MarkupReader::with_config(input.as_bytes(), config).unwrap();
        reader.advance().unwrap();
        reader.advance().unwrap();
        assert_eq!(reader.attribute("a"), Some("é"));
        reader.advance().unwrap();
        assert_eq!(reader.text(), "données & 日本");
    }

    #[test]
    fn test_open_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<doc version=\"2\"/>").unwrap();
        let mut reader = MarkupReader::open(file.path()).unwrap();
        reader.advance().unwrap();
        reader.advance().unwrap();
        assert_eq!(reader.attribute("version"), Some("2"));
    }
}
