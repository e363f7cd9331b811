//! Position cursor and output buffer.
//!
//! The cursor tracks how far the original source has been consumed
//! (`read_pos`) alongside an append-only output buffer. All rewriting happens
//! through its primitives:
//!
//! - [`Cursor::catch_up`] copies a verbatim span of source into the buffer
//! - [`Cursor::move_to`] advances the read position without copying (a
//!   deletion)
//! - [`Cursor::append`] inserts text without touching the read position
//!
//! Ordering of calls across nested rule invocations is the entire
//! correctness mechanism: callers must advance through a node's range in
//! source order, never catch up twice over the same span, and never skip
//! source without an explicit `move_to`. Backward targets are a hard error;
//! [`Cursor::rewind`] is the one sanctioned backward motion for rules that
//! intentionally reprocess a span. [`Cursor::finish`] asserts that every
//! byte of input was accounted for.

use std::fmt::Write as _;

use downlevel_core::Span;
use thiserror::Error;

/// Errors raised when a rule violates the cursor's advancement contract.
///
/// All of these are fatal: they indicate a rule bug, not a recoverable
/// condition, and abort the whole transform session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// A catch-up or move targeted an offset behind the read position.
    /// Deletions must use `move_to`; reprocessing must use `rewind`.
    #[error("cursor target {target} is behind read position {at}")]
    Backwards { at: usize, target: usize },

    /// A rewind targeted an offset ahead of the read position.
    #[error("rewind target {target} is ahead of read position {at}")]
    ForwardRewind { at: usize, target: usize },

    /// A target offset past the end of the source.
    #[error("cursor target {target} is beyond source length {len}")]
    OutOfBounds { target: usize, len: usize },

    /// A target offset that splits a UTF-8 character.
    #[error("cursor target {target} is not a character boundary")]
    Boundary { target: usize },

    /// The session ended with unconsumed source: some rule under-advanced
    /// or over-skipped.
    #[error("source not fully consumed at session end: read position {at} of {len}")]
    Incomplete { at: usize, len: usize },
}

/// One copied span: `output` bytes in the buffer were produced from the
/// `source` bytes of input. Verbatim catch-ups are identity mappings;
/// transformed catch-ups correlate the spans without byte equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSegment {
    pub source: Span,
    pub output: Span,
}

impl MappingSegment {
    /// Whether output and source are byte-for-byte identical in length
    /// (a verbatim copy rather than a transformed one).
    pub fn is_identity(&self) -> bool {
        self.source.len() == self.output.len()
    }
}

/// Read cursor plus output buffer for one transform session.
#[derive(Debug)]
pub struct Cursor<'src> {
    source: &'src str,
    read_pos: usize,
    buffer: String,
    segments: Vec<MappingSegment>,
    ascii_only: bool,
}

impl<'src> Cursor<'src> {
    /// Create a cursor at the start of `source` with an empty buffer.
    ///
    /// With `ascii_only` set, every emitted character outside ASCII is
    /// escaped to `\uXXXX` form (surrogate pairs above the BMP) at emission
    /// time, so recorded output offsets stay accurate.
    pub fn new(source: &'src str, ascii_only: bool) -> Self {
        Cursor {
            source,
            read_pos: 0,
            buffer: String::new(),
            segments: Vec::new(),
            ascii_only,
        }
    }

    /// The source text this cursor reads from.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// How far the original source has been consumed.
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    /// Current length of the output buffer in bytes.
    pub fn output_len(&self) -> usize {
        self.buffer.len()
    }

    /// Copy `source[read_pos..target]` verbatim into the buffer and advance.
    pub fn catch_up(&mut self, target: usize) -> Result<(), CursorError> {
        self.check_forward(target)?;
        let out_start = self.buffer.len();
        let span = &self.source[self.read_pos..target];
        self.emit(span);
        self.record(target, out_start);
        self.read_pos = target;
        Ok(())
    }

    /// Copy up to `target`, passing the span through a text transform first.
    ///
    /// Used for character-level substitutions over a span that must keep its
    /// layout, e.g. turning call parens into array brackets.
    pub fn catch_up_with<F>(&mut self, target: usize, transform: F) -> Result<(), CursorError>
    where
        F: FnOnce(&str) -> String,
    {
        self.check_forward(target)?;
        let out_start = self.buffer.len();
        let replaced = transform(&self.source[self.read_pos..target]);
        self.emit(&replaced);
        self.record(target, out_start);
        self.read_pos = target;
        Ok(())
    }

    /// Copy only whitespace up to `target`, discarding everything else.
    ///
    /// Keeps line structure and indentation when a construct is deleted
    /// wholesale (e.g. a rest parameter).
    pub fn catch_up_white_space(&mut self, target: usize) -> Result<(), CursorError> {
        self.catch_up_with(target, |text| {
            text.chars().filter(|c| c.is_whitespace()).collect()
        })
    }

    /// Copy up to `target` with every non-whitespace character replaced by a
    /// space, preserving column alignment of what follows.
    pub fn catch_up_white_out(&mut self, target: usize) -> Result<(), CursorError> {
        self.catch_up_with(target, |text| {
            text.chars()
                .map(|c| if c.is_whitespace() { c } else { ' ' })
                .collect()
        })
    }

    /// Advance the read position to `target` without copying: a deletion.
    pub fn move_to(&mut self, target: usize) -> Result<(), CursorError> {
        self.check_forward(target)?;
        self.read_pos = target;
        Ok(())
    }

    /// Move the read position backward so a span can be reprocessed.
    ///
    /// This is the only sanctioned backward motion. The caller owns the
    /// consequences: text already emitted for the span stays in the buffer,
    /// so rewinding without a matching earlier `move_to` duplicates output.
    pub fn rewind(&mut self, target: usize) -> Result<(), CursorError> {
        if target > self.read_pos {
            return Err(CursorError::ForwardRewind {
                at: self.read_pos,
                target,
            });
        }
        if !self.source.is_char_boundary(target) {
            return Err(CursorError::Boundary { target });
        }
        self.read_pos = target;
        Ok(())
    }

    /// Append text to the buffer without touching the read position: an
    /// insertion. Inserted text has no source correlate and stays unmapped.
    pub fn append(&mut self, text: &str) {
        self.emit(text);
    }

    /// Final consistency check and teardown.
    ///
    /// Every byte of input must have been consumed, either copied or
    /// explicitly discarded; finishing short of the source length means a
    /// rule under-advanced or over-skipped, which would otherwise corrupt
    /// output silently.
    pub fn finish(self) -> Result<(String, Vec<MappingSegment>), CursorError> {
        if self.read_pos != self.source.len() {
            return Err(CursorError::Incomplete {
                at: self.read_pos,
                len: self.source.len(),
            });
        }
        Ok((self.buffer, self.segments))
    }

    fn check_forward(&self, target: usize) -> Result<(), CursorError> {
        if target < self.read_pos {
            return Err(CursorError::Backwards {
                at: self.read_pos,
                target,
            });
        }
        if target > self.source.len() {
            return Err(CursorError::OutOfBounds {
                target,
                len: self.source.len(),
            });
        }
        if !self.source.is_char_boundary(target) {
            return Err(CursorError::Boundary { target });
        }
        Ok(())
    }

    fn record(&mut self, target: usize, out_start: usize) {
        if target > self.read_pos {
            self.segments.push(MappingSegment {
                source: Span::new(self.read_pos, target),
                output: Span::new(out_start, self.buffer.len()),
            });
        }
    }

    fn emit(&mut self, text: &str) {
        if !self.ascii_only || text.is_ascii() {
            self.buffer.push_str(text);
            return;
        }
        for ch in text.chars() {
            if ch.is_ascii() {
                self.buffer.push(ch);
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    // writing into a String cannot fail
                    let _ = write!(self.buffer, "\\u{unit:04x}");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
