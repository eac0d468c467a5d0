//! Entity Table
//!
//! Maps entity names to their expansion text. Pre-seeded with the five
//! predefined entities (`amp`, `apos`, `gt`, `lt`, `quot`); callers may add
//! their own. Also decodes numeric character references (`#65`, `#x41`).

use std::collections::HashMap;

/// The predefined entities every table starts with
const PREDEFINED: [(&str, &str); 5] = [
    ("amp", "&"),
    ("apos", "'"),
    ("gt", ">"),
    ("lt", "<"),
    ("quot", "\""),
];

/// Name to expansion mapping for `&name;` references
#[derive(Debug, Clone)]
pub struct EntityTable {
    entries: HashMap<String, String>,
}

impl EntityTable {
    /// Create a table holding only the predefined entities
    pub fn new() -> Self {
        let entries = PREDEFINED
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        EntityTable { entries }
    }

    /// Define (or redefine) an entity
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Expansion for `name`, if known
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }
}

impl Default for EntityTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode the body of a numeric character reference (the part after `#`)
///
/// Accepts decimal digits or `x`/`X` followed by hex digits. Returns `None`
/// when the digits don't parse or name no Unicode scalar value.
pub fn decode_numeric(reference: &str) -> Option<char> {
    let codepoint = match reference.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => reference.parse::<u32>().ok()?,
    };
    char::from_u32(codepoint)
}

/// Check if a code point is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(ch: char) -> bool {
    matches!(ch as u32,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}
