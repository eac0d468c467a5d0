//! Markup Writer
//!
//! Tab-indented emitter producing printable ASCII output that
//! [`MarkupReader`](crate::MarkupReader) reads back unchanged. Tags are
//! assembled from small steps (`start_tag`, `write_attribute`, `finish_tag`,
//! `end_tag_eol`) with an indentation counter that `start_tag` raises and
//! `end_tag_eol`/`finish_empty_tag` lower again. Convenience methods emit a
//! whole one-line tag, and the `_not_zero`/`_not_one`/`_not_empty` variants
//! leave out values equal to the defaults the typed readers assume.

pub mod escape;
pub mod value;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::Result;

pub use escape::{encode_attribute, encode_data};
pub use value::{MarkupValue, NumericValue};

/// Declared output encoding
pub const ENCODING: &str = "US-ASCII";

pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";
pub const HOUR: &str = "hour";
pub const MINUTE: &str = "minute";
pub const SECOND: &str = "second";

const END_EMPTY_TAG: &str = "/>";
const START_COMMENT: &str = "<!-- ";
const END_COMMENT: &str = " -->";

pub struct MarkupWriter<W: Write> {
    out: W,
    indent: usize,
}

impl<W: Write> MarkupWriter<W> {
    pub fn new(out: W) -> Self {
        MarkupWriter { out, indent: 0 }
    }

    #[inline]
    fn put(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    /// `<?xml version="1.0" encoding="US-ASCII" ?>` and a line feed
    pub fn write_header(&mut self) -> Result<()> {
        self.put("<?xml version=\"1.0\" encoding=\"")?;
        self.put(ENCODING)?;
        self.put("\" ?>\n")
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Indented one-line comment
    pub fn write_comment(&mut self, comment: &str) -> Result<()> {
        self.write_indentation()?;
        self.start_comment()?;
        self.write_encoded_data(comment)?;
        self.finish_comment_eol()
    }

    pub fn start_comment(&mut self) -> Result<()> {
        self.put(START_COMMENT)
    }

    pub fn finish_comment(&mut self) -> Result<()> {
        self.put(END_COMMENT)
    }

    pub fn finish_comment_eol(&mut self) -> Result<()> {
        self.put(END_COMMENT)?;
        self.put("\n")
    }

    // ========================================================================
    // Escaped content
    // ========================================================================

    pub fn write_encoded_data(&mut self, data: &str) -> Result<()> {
        let encoded = encode_data(data);
        self.put(&encoded)
    }

    pub fn write_encoded_attribute(&mut self, value: &str) -> Result<()> {
        let encoded = encode_attribute(value);
        self.put(&encoded)
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// ` name="value"`
    pub fn write_attribute<V: MarkupValue>(&mut self, name: &str, value: V) -> Result<()> {
        self.put(" ")?;
        self.put(name)?;
        self.put("=\"")?;
        self.write_encoded_attribute(&value.attribute_text())?;
        self.put("\"")
    }

    pub fn write_attribute_not_zero<V: MarkupValue + NumericValue>(
        &mut self,
        name: &str,
        value: V,
    ) -> Result<()> {
        if value.is_zero() {
            return Ok(());
        }
        self.write_attribute(name, value)
    }

    pub fn write_attribute_not_one<V: MarkupValue + NumericValue>(
        &mut self,
        name: &str,
        value: V,
    ) -> Result<()> {
        if value.is_one() {
            return Ok(());
        }
        self.write_attribute(name, value)
    }

    pub fn write_attribute_not_empty(&mut self, name: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.write_attribute(name, value)
    }

    // ========================================================================
    // Simple tags
    // ========================================================================

    /// `<name>value</name>` on its own line
    pub fn simple_tag<V: MarkupValue>(&mut self, name: &str, value: V) -> Result<()> {
        self.start_simple_tag(name)?;
        self.write_encoded_data(&value.data_text())?;
        self.end_tag_eol(name, false)
    }

    pub fn simple_tag_not_zero<V: MarkupValue + NumericValue>(
        &mut self,
        name: &str,
        value: V,
    ) -> Result<()> {
        if value.is_zero() {
            return Ok(());
        }
        self.simple_tag(name, value)
    }

    pub fn simple_tag_not_empty(&mut self, name: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.simple_tag(name, value)
    }

    /// Simple tag for `Some` values; nothing for `None`
    pub fn simple_tag_opt<V: MarkupValue>(&mut self, name: &str, value: Option<V>) -> Result<()> {
        match value {
            Some(value) => self.simple_tag(name, value),
            None => Ok(()),
        }
    }

    /// `<name attribute="attribute_value">value</name>` on its own line
    pub fn simple_tag_with_attribute<V: MarkupValue, A: MarkupValue>(
        &mut self,
        name: &str,
        value: V,
        attribute: &str,
        attribute_value: A,
    ) -> Result<()> {
        self.start_tag(name)?;
        self.write_attribute(attribute, attribute_value)?;
        self.finish_tag()?;
        self.write_encoded_data(&value.data_text())?;
        self.end_tag_eol(name, false)
    }

    /// `<name>` with no attributes
    pub fn start_simple_tag(&mut self, name: &str) -> Result<()> {
        self.start_tag(name)?;
        self.finish_tag()
    }

    pub fn start_simple_tag_eol(&mut self, name: &str) -> Result<()> {
        self.start_tag(name)?;
        self.finish_tag_eol()
    }

    // ========================================================================
    // Tag assembly
    // ========================================================================

    /// Indented `<name`, left open for attributes
    pub fn start_tag(&mut self, name: &str) -> Result<()> {
        self.write_indentation()?;
        self.put("<")?;
        self.put(name)?;
        self.indent();
        Ok(())
    }

    /// `</name>` and a line feed, indented first when `indent` is set
    pub fn end_tag_eol(&mut self, name: &str, indent: bool) -> Result<()> {
        self.outdent();
        if indent {
            self.write_indentation()?;
        }
        self.put("</")?;
        self.put(name)?;
        self.finish_tag_eol()
    }

    pub fn finish_tag(&mut self) -> Result<()> {
        self.put(">")
    }

    pub fn finish_tag_eol(&mut self) -> Result<()> {
        self.put(">\n")
    }

    /// `/>`, closing the tag opened by [`start_tag`](Self::start_tag)
    pub fn finish_empty_tag(&mut self) -> Result<()> {
        self.put(END_EMPTY_TAG)?;
        self.outdent();
        Ok(())
    }

    pub fn finish_empty_tag_eol(&mut self) -> Result<()> {
        self.put(END_EMPTY_TAG)?;
        self.put("\n")?;
        self.outdent();
        Ok(())
    }

    /// Empty tag carrying the date and/or time fields as attributes
    pub fn write_date_time_tag(
        &mut self,
        name: &str,
        date_time: &NaiveDateTime,
        include_date: bool,
        include_time: bool,
        include_seconds: bool,
    ) -> Result<()> {
        self.start_tag(name)?;
        if include_date {
            self.write_attribute(YEAR, date_time.year())?;
            self.write_attribute(MONTH, date_time.month())?;
            self.write_attribute(DAY, date_time.day())?;
        }
        if include_time {
            self.write_attribute(HOUR, date_time.hour())?;
            self.write_attribute(MINUTE, date_time.minute())?;
            if include_seconds {
                self.write_attribute(SECOND, date_time.second())?;
            }
        }
        self.finish_empty_tag_eol()
    }

    // ========================================================================
    // Indentation
    // ========================================================================

    #[inline]
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    #[inline]
    pub fn outdent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    #[inline]
    pub fn indent_level(&self) -> usize {
        self.indent
    }

    /// One tab per indentation level
    pub fn write_indentation(&mut self) -> Result<()> {
        for _ in 0..self.indent {
            self.put("\t")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and give back the sink
    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl MarkupWriter<BufWriter<File>> {
    /// Create (or truncate) a file to write to
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}
