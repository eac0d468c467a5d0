//! Output Escaping
//!
//! Writer output is printable ASCII only. `<`, `>` and `&` always become
//! named entities; attribute values additionally encode both quote
//! characters. Anything outside `0x20..=0x7E` becomes a decimal character
//! reference, except that tag data keeps tabs and line breaks literal
//! (CR and CRLF are written as a single `'\n'`).

use std::borrow::Cow;

/// Whether `byte` can be written as-is
#[inline]
fn is_plain(byte: u8, attribute: bool) -> bool {
    match byte {
        b'<' | b'>' | b'&' => false,
        b'"' | b'\'' | b'\t' | b'\n' => !attribute,
        0x20..=0x7E => true,
        _ => false,
    }
}

/// Encode tag data for output
pub fn encode_data(input: &str) -> Cow<'_, str> {
    // Fast path: nothing to escape
    if input.bytes().all(|b| is_plain(b, false)) {
        return Cow::Borrowed(input);
    }
    let mut result = String::with_capacity(input.len() + 16);
    push_encoded_data(input, &mut result);
    Cow::Owned(result)
}

/// Encode an attribute value for output between double quotes
pub fn encode_attribute(input: &str) -> Cow<'_, str> {
    if input.bytes().all(|b| is_plain(b, true)) {
        return Cow::Borrowed(input);
    }
    let mut result = String::with_capacity(input.len() + 16);
    push_encoded_attribute(input, &mut result);
    Cow::Owned(result)
}

fn push_encoded_data(input: &str, out: &mut String) {
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\n' | '\t' | ' '..='~' => out.push(ch),
            _ => push_char_ref(ch, out),
        }
    }
}

fn push_encoded_attribute(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            ' '..='~' => out.push(ch),
            _ => push_char_ref(ch, out),
        }
    }
}

#[inline]
fn push_char_ref(ch: char, out: &mut String) {
    let mut digits = itoa::Buffer::new();
    out.push_str("&#");
    out.push_str(digits.format(u32::from(ch)));
    out.push(';');
}
