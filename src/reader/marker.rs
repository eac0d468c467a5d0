//! Depth Markers
//!
//! The open-element stack and the opaque [`Marker`] tokens derived from it.
//! A marker captured on a start tag compares equal to the marker of its
//! matching end tag, which lets callers consume a subtree with a flat loop
//! instead of tracking depth themselves.

/// Opaque (depth, element name) token; only ever compared for equality
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker {
    depth: usize,
    name: String,
}

impl Marker {
    pub(crate) fn new(depth: usize, name: &str) -> Self {
        Marker {
            depth,
            name: name.to_string(),
        }
    }

    /// Element name the marker was taken against
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an end tag `name` leaving `depth` elements open closes the
    /// element this marker was taken on
    #[inline]
    pub(crate) fn is_at(&self, depth: usize, name: &str) -> bool {
        self.depth == depth && self.name == name
    }
}

/// Names of the currently open elements, outermost first
#[derive(Debug, Default)]
pub(crate) struct ElementStack {
    names: Vec<String>,
}

impl ElementStack {
    #[inline]
    pub fn push(&mut self, name: String) {
        self.names.push(name);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    #[inline]
    pub fn top(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
