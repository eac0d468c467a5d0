//! Node Types
//!
//! Kinds of nodes the pull reader yields, plus the scanner-only kinds that
//! never leave the reader.

use std::collections::HashMap;
use std::fmt;

/// Kind of the node the reader is positioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Before the first real node
    StartDocument,
    /// Input exhausted with every element closed
    EndDocument,
    /// Element start tag: `<name attr="v">` or `<name/>`
    StartTag,
    /// Element end tag: `</name>`, also synthesized after `<name/>`
    EndTag,
    /// Coalesced run of text, CDATA and entity content
    Text,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::StartDocument => "START_DOCUMENT",
            NodeKind::EndDocument => "END_DOCUMENT",
            NodeKind::StartTag => "START_TAG",
            NodeKind::EndTag => "END_TAG",
            NodeKind::Text => "TEXT",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the next two characters announce. Only the tag and document kinds
/// map onto a [`NodeKind`]; the rest are folded into text or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanKind {
    EndDocument,
    StartTag,
    EndTag,
    Text,
    /// `<[CDATA[...]]>` (the `<![CDATA[` form is found while scanning Other)
    CData,
    /// `&name;` or `&#N;`
    EntityRef,
    /// Comment, processing instruction or DOCTYPE
    Other,
}

impl ScanKind {
    /// Classify upcoming content from the two-character window alone
    #[inline]
    pub fn classify(peek0: Option<char>, peek1: Option<char>) -> ScanKind {
        match peek0 {
            None => ScanKind::EndDocument,
            Some('&') => ScanKind::EntityRef,
            Some('<') => match peek1 {
                Some('/') => ScanKind::EndTag,
                Some('[') => ScanKind::CData,
                Some('?' | '!') => ScanKind::Other,
                _ => ScanKind::StartTag,
            },
            Some(_) => ScanKind::Text,
        }
    }

    /// Content that merges into a Text node
    #[inline]
    pub fn is_text_like(self) -> bool {
        matches!(
            self,
            ScanKind::Text | ScanKind::CData | ScanKind::EntityRef | ScanKind::Other
        )
    }
}

/// Borrowed snapshot of the reader's current node
#[derive(Debug, Clone, Copy)]
pub struct Node<'r> {
    pub kind: NodeKind,
    /// Tag name for start and end tags
    pub name: Option<&'r str>,
    /// Content for text nodes
    pub text: Option<&'r str>,
    /// True iff no character of the text exceeds a space
    pub is_whitespace: bool,
    /// Decoded attributes; empty unless `kind` is [`NodeKind::StartTag`]
    pub attributes: &'r HashMap<String, String>,
    /// The start tag was written `<name/>`
    pub is_empty_element: bool,
}

impl<'r> Node<'r> {
    pub fn attribute(&self, name: &str) -> Option<&'r str> {
        self.attributes.get(name).map(String::as_str)
    }
}
