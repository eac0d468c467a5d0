//! Value Readers
//!
//! Convenience reads layered on the pull reader: collecting an element's
//! text, converting it to typed values, and typed attribute lookups. Value
//! conversion never fails; unparsable content yields the caller's default.

use std::io::Read;

use chrono::{Months, NaiveDate, NaiveDateTime, TimeDelta};

use super::node::NodeKind;
use super::pull::MarkupReader;
use crate::core::numbers::{extract_boolean, extract_double, extract_integer, extract_long};
use crate::error::Result;
use crate::writer::{DAY, HOUR, MINUTE, MONTH, SECOND, YEAR};

impl<R: Read> MarkupReader<R> {
    /// Text content of the current element with nested elements skipped.
    /// Separate text runs are joined with a single space. The reader ends up
    /// on the node following the element's end tag.
    pub fn read_text(&mut self) -> Result<String> {
        let marker = self.mark();
        let mut text = String::new();
        if self.kind() == NodeKind::StartTag {
            self.advance()?;
        }
        loop {
            match self.kind() {
                NodeKind::Text => {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(self.text());
                    self.advance()?;
                }
                NodeKind::StartTag => {
                    let name = self.name().to_string();
                    self.skip_tag(&name)?;
                }
                _ => {}
            }
            if !self.still_within(&marker)? {
                return Ok(text);
            }
            // a nested end tag that is not ours
            if matches!(self.kind(), NodeKind::EndTag | NodeKind::StartDocument) {
                self.advance()?;
            }
        }
    }

    /// [`read_text`](Self::read_text) interpreted as a boolean
    pub fn read_boolean(&mut self) -> Result<bool> {
        Ok(extract_boolean(&self.read_text()?))
    }

    pub fn read_integer(&mut self, default: i32) -> Result<i32> {
        Ok(extract_integer(&self.read_text()?, default))
    }

    pub fn read_long(&mut self, default: i64) -> Result<i64> {
        Ok(extract_long(&self.read_text()?, default))
    }

    pub fn read_double(&mut self, default: f64) -> Result<f64> {
        Ok(extract_double(&self.read_text()?, default))
    }

    /// Date and time from the current start tag's `year`, `month`, `day`,
    /// `hour`, `minute` and `second` attributes. Missing fields default to
    /// the Unix epoch; out-of-range fields roll over into the next unit.
    pub fn read_date_time(&self) -> NaiveDateTime {
        let year = self.attribute_as_integer(YEAR, 1970);
        let month = self.attribute_as_integer(MONTH, 1);
        let day = self.attribute_as_integer(DAY, 1);
        let hour = self.attribute_as_integer(HOUR, 0);
        let minute = self.attribute_as_integer(MINUTE, 0);
        let second = self.attribute_as_integer(SECOND, 0);
        lenient_date_time(year, month, day, hour, minute, second).unwrap_or_default()
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Attribute value or `default` when absent
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attribute(name).unwrap_or(default)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Whether the attribute is present and reads as true
    pub fn is_attribute_set(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(extract_boolean)
    }

    pub fn attribute_as_integer(&self, name: &str, default: i32) -> i32 {
        self.attribute(name)
            .map_or(default, |value| extract_integer(value, default))
    }

    pub fn attribute_as_long(&self, name: &str, default: i64) -> i64 {
        self.attribute(name)
            .map_or(default, |value| extract_long(value, default))
    }

    pub fn attribute_as_double(&self, name: &str, default: f64) -> f64 {
        self.attribute(name)
            .map_or(default, |value| extract_double(value, default))
    }
}

/// Start at January 1st of `year` and add each field as an offset
fn lenient_date_time(
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
) -> Option<NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let months = month - 1;
    let date = if months >= 0 {
        start.checked_add_months(Months::new(months as u32))?
    } else {
        start.checked_sub_months(Months::new(months.unsigned_abs()))?
    };
    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::try_days(i64::from(day) - 1)?)?
        .checked_add_signed(TimeDelta::try_hours(i64::from(hour))?)?
        .checked_add_signed(TimeDelta::try_minutes(i64::from(minute))?)?
        .checked_add_signed(TimeDelta::try_seconds(i64::from(second))?)
}
