//! Reusable Text Buffer
//!
//! A single growable buffer shared by name, text and attribute extraction so
//! that tokenizing does not allocate per token. Callers take a [`Mark`] before
//! pushing, then either borrow the pushed region or pop it off as an owned
//! string, which rewinds the buffer to the mark.

/// Offset into a [`TextBuffer`] captured before pushing a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

#[derive(Debug, Default)]
pub struct TextBuffer {
    data: String,
}

impl TextBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        TextBuffer {
            data: String::with_capacity(capacity),
        }
    }

    /// Current end of the buffer
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark(self.data.len())
    }

    #[inline]
    pub fn push(&mut self, ch: char) {
        self.data.push(ch);
    }

    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.data.push_str(s);
    }

    /// Borrow everything pushed since `mark` (no copy)
    #[inline]
    pub fn since(&self, mark: Mark) -> &str {
        &self.data[mark.0..]
    }

    /// Take everything pushed since `mark` and rewind to it
    pub fn pop(&mut self, mark: Mark) -> String {
        self.data.split_off(mark.0)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_pop() {
        let mut buf = TextBuffer::with_capacity(8);
        buf.push_str("text ");
        let mark = buf.mark();
        buf.push('n');
        buf.push('é');
        assert_eq!(buf.since(mark), "né");

        let name = buf.pop(mark);
        assert_eq!(name, "né");
        assert_eq!(buf.as_str(), "text ");
        assert_eq!(buf.mark(), mark);
    }

    #[test]
    fn test_clear() {
        let mut buf = TextBuffer::default();
        buf.push_str("xyz");
        buf.clear();
        assert_eq!(buf.as_str(), "");
    }
}
