//! streamxml - Streaming markup reader and writer
//!
//! A pull reader that walks a document one node at a time and a writer that
//! emits the same format back out.
//!
//! Reader:
//! - Decodes any `Read` source incrementally (UTF-8, UTF-16, declared labels)
//! - Surfaces only start tags, end tags, text and the document bounds;
//!   comments, processing instructions and DOCTYPE are skipped, and text,
//!   CDATA and entity references coalesce into one text node
//! - Depth markers for flat subtree loops, `skip_tag`, `require`
//! - Lenient typed reads (`read_integer`, `attribute_as_double`, ...)
//!
//! Writer:
//! - Tab-indented, printable ASCII output with exact escaping
//! - One-line tag helpers that omit default values
//!
//! ```
//! use streamxml::{MarkupReader, MarkupWriter, NodeKind};
//!
//! let mut writer = MarkupWriter::new(Vec::new());
//! writer.start_tag("item").unwrap();
//! writer.write_attribute("count", 3).unwrap();
//! writer.finish_tag_eol().unwrap();
//! writer.simple_tag("name", "Rope & Hook").unwrap();
//! writer.end_tag_eol("item", true).unwrap();
//! let bytes = writer.into_inner().unwrap();
//!
//! let mut reader = MarkupReader::new(bytes.as_slice()).unwrap();
//! reader.advance().unwrap();
//! reader.advance().unwrap();
//! reader.require(NodeKind::StartTag, Some("item")).unwrap();
//! assert_eq!(reader.attribute_as_integer("count", 1), 3);
//! reader.advance().unwrap();
//! reader.require(NodeKind::StartTag, Some("name")).unwrap();
//! assert_eq!(reader.read_text().unwrap(), "Rope & Hook");
//! ```

pub mod core;
pub mod error;
pub mod reader;
pub mod writer;

pub use crate::core::entities::EntityTable;
pub use crate::core::numbers::{extract_boolean, extract_double, extract_integer, extract_long};
pub use error::{Error, Position, Result};
pub use reader::{Marker, MarkupReader, Node, NodeKind, ReaderConfig};
pub use writer::{encode_attribute, encode_data, MarkupValue, MarkupWriter, NumericValue};
