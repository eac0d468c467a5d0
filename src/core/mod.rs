//! Core reading primitives
//!
//! Building blocks shared by the reader and writer:
//! - Encoding: byte order mark and declaration sniffing
//! - Lookahead: incremental decoding with a two character window
//! - TextBuffer: growable character buffer with rewindable marks
//! - Entities: named entity table and character reference decoding
//! - Numbers: lenient text to value conversion

pub mod encoding;
pub mod entities;
pub mod lookahead;
pub mod numbers;
pub mod text_buffer;
