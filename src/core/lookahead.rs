//! Two-Character Lookahead Buffer
//!
//! Reads raw bytes from any source implementing [`Read`] in fixed-size blocks,
//! decodes them incrementally, and exposes a two character window
//! (`peek0`/`peek1`) plus a consuming [`Lookahead::read`]. Line endings are
//! normalized on the way through: CR, LF and CRLF each surface as one `'\n'`.

use std::io::Read;

use encoding_rs::{Decoder, DecoderResult, Encoding};
use log::debug;

use super::encoding;
use crate::error::{Error, Position, Result};

/// Raw block size for reads from the underlying source
pub const DEFAULT_BLOCK_SIZE: usize = 32768;

pub struct Lookahead<R: Read> {
    source: R,
    encoding: &'static Encoding,
    decoder: Decoder,
    /// Raw bytes read from `source`
    raw: Vec<u8>,
    raw_pos: usize,
    raw_end: usize,
    source_done: bool,
    /// Decoder has seen the final block
    finished: bool,
    /// Decoded characters of the current block
    block: Vec<char>,
    block_pos: usize,
    scratch: String,
    peek0: Option<char>,
    peek1: Option<char>,
    position: Position,
}

impl<R: Read> Lookahead<R> {
    /// Create a lookahead buffer, detecting the encoding unless `forced`
    pub fn new(source: R, forced: Option<&'static Encoding>, block_size: usize) -> Result<Self> {
        let mut lookahead = Lookahead {
            source,
            encoding: encoding_rs::UTF_8,
            decoder: encoding_rs::UTF_8.new_decoder_without_bom_handling(),
            raw: vec![0u8; block_size.max(16)],
            raw_pos: 0,
            raw_end: 0,
            source_done: false,
            finished: false,
            block: Vec::new(),
            block_pos: 0,
            scratch: String::new(),
            peek0: None,
            peek1: None,
            position: Position::START,
        };

        lookahead.fill_raw()?;
        let encoding = forced.unwrap_or_else(|| encoding::detect(&lookahead.raw[..lookahead.raw_end]));
        debug!("decoding input as {}", encoding.name());
        lookahead.encoding = encoding;
        lookahead.decoder = encoding.new_decoder_with_bom_removal();

        lookahead.peek0 = lookahead.next_char()?;
        lookahead.peek1 = lookahead.next_char()?;
        Ok(lookahead)
    }

    /// Next character without consuming it
    #[inline]
    pub fn peek0(&self) -> Option<char> {
        self.peek0
    }

    /// Character after [`Lookahead::peek0`] without consuming it
    #[inline]
    pub fn peek1(&self) -> Option<char> {
        self.peek1
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Consume and return `peek0`, shifting the window by one
    pub fn read(&mut self) -> Result<Option<char>> {
        let current = self.peek0;
        match current {
            None => return Ok(None),
            Some('\n') => {
                self.position.line += 1;
                self.position.column = 1;
            }
            Some(_) => self.position.column += 1,
        }

        self.peek0 = self.peek1;
        self.peek1 = match self.peek0 {
            Some(_) => self.next_char()?,
            None => None,
        };
        Ok(current)
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Next decoded character with line endings normalized
    fn next_char(&mut self) -> Result<Option<char>> {
        let ch = match self.next_raw()? {
            Some(ch) => ch,
            None => return Ok(None),
        };
        if ch == '\r' {
            if self.peek_raw()? == Some('\n') {
                self.block_pos += 1;
            }
            return Ok(Some('\n'));
        }
        Ok(Some(ch))
    }

    #[inline]
    fn peek_raw(&mut self) -> Result<Option<char>> {
        if !self.ensure_block()? {
            return Ok(None);
        }
        Ok(self.block.get(self.block_pos).copied())
    }

    #[inline]
    fn next_raw(&mut self) -> Result<Option<char>> {
        let ch = self.peek_raw()?;
        if ch.is_some() {
            self.block_pos += 1;
        }
        Ok(ch)
    }

    /// Make sure at least one decoded character is available
    fn ensure_block(&mut self) -> Result<bool> {
        while self.block_pos >= self.block.len() {
            if !self.decode_more()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Decode the next slice of raw bytes into `block`
    fn decode_more(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        if self.raw_pos >= self.raw_end && !self.source_done {
            self.fill_raw()?;
        }

        self.block.clear();
        self.block_pos = 0;
        self.scratch.clear();

        let pending = self.raw_end - self.raw_pos;
        let needed = self
            .decoder
            .max_utf8_buffer_length_without_replacement(pending)
            .unwrap_or(pending * 3 + 16);
        self.scratch.reserve(needed);

        let last = self.source_done;
        let (result, consumed) = self.decoder.decode_to_string_without_replacement(
            &self.raw[self.raw_pos..self.raw_end],
            &mut self.scratch,
            last,
        );
        self.raw_pos += consumed;

        match result {
            DecoderResult::Malformed(_, _) => {
                return Err(Error::Decode {
                    encoding: self.encoding.name(),
                    position: self.position,
                });
            }
            DecoderResult::InputEmpty if last => self.finished = true,
            DecoderResult::InputEmpty | DecoderResult::OutputFull => {}
        }

        self.block.extend(self.scratch.chars());
        Ok(true)
    }

    /// Refill the raw block from the source
    fn fill_raw(&mut self) -> Result<()> {
        let read = self.source.read(&mut self.raw)?;
        self.raw_pos = 0;
        self.raw_end = read;
        if read == 0 {
            self.source_done = true;
        }
        Ok(())
    }
}
