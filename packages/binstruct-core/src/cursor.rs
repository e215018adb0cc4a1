//! ByteCursor - sequential read view over an immutable byte buffer.

use crate::error::CursorError;

/// A read position over a borrowed byte buffer.
///
/// The cursor never copies the underlying bytes; [`slice`](Self::slice)
/// hands out sub-slices of the original buffer and advances the offset.
/// Because it is `Copy`, a cursor doubles as a cheap resumption point when
/// several structs are decoded back to back from one buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Returns the next `n` bytes and advances past them.
    ///
    /// # Errors
    /// Returns [`CursorError::Underflow`] if fewer than `n` bytes remain; the
    /// offset is left unchanged in that case.
    pub fn slice(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        let bytes = self.peek(n)?;
        self.offset += n;
        Ok(bytes)
    }

    /// Returns the next `n` bytes without advancing.
    pub fn peek(&self, n: usize) -> Result<&'a [u8], CursorError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CursorError::Underflow {
                offset: self.offset,
                requested: n,
                remaining,
            });
        }
        Ok(&self.data[self.offset..self.offset + n])
    }

    /// Returns the current read offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Returns the length of the whole buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.offset == self.data.len()
    }

    /// Returns the whole underlying buffer, including consumed bytes.
    pub fn get_ref(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}

impl<'a> From<&'a [u8]> for ByteCursor<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for ByteCursor<'_> {
    fn as_ref(&self) -> &[u8] {
        self.data
    }
}

impl PartialEq<[u8]> for ByteCursor<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.data == other
    }
}

impl PartialEq<&[u8]> for ByteCursor<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.data == *other
    }
}
