// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Operand layout inside the engine RAM.
//!
//! Every request lays out its operands from word zero of the arena. Each
//! operand starts on an even word, and some operands must be followed by two
//! scratch words the sequencer uses while it runs. A [`Layout`] is built for
//! each request and thrown away afterwards, so placement only depends on the
//! operand lengths of the request being issued.
//!
//! ```text
//!  word 0                                                  capacity
//!  |  A  |pad|  B  |pad|scratch|  C  ....                       |
//! ```

use kernel::ErrorCode;

/// Words the sequencer needs after operands marked [`Padding::Scratch`].
pub const SCRATCH_WORDS: usize = 2;

/// What follows an operand in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Padding {
    /// Only the word needed to keep the next operand even aligned.
    Packed,
    /// Alignment plus [`SCRATCH_WORDS`].
    Scratch,
}

/// Number of arena words taken by an operand of `len` words.
pub const fn stride(len: usize, padding: Padding) -> usize {
    let aligned = len + len % 2;
    match padding {
        Padding::Packed => aligned,
        Padding::Scratch => aligned + SCRATCH_WORDS,
    }
}

/// One operand inside the arena, in words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slot {
    pub offset: usize,
    pub len: usize,
}

impl Slot {
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Placement cursor for a single request.
pub struct Layout {
    cursor: usize,
    capacity: usize,
}

impl Layout {
    pub const fn new(capacity: usize) -> Layout {
        Layout {
            cursor: 0,
            capacity,
        }
    }

    /// Reserve the next operand of `len` words.
    ///
    /// Returns `INVAL` if the operand and its padding do not fit in the arena.
    /// Nothing is reserved in that case.
    pub fn place(&mut self, len: usize, padding: Padding) -> Result<Slot, ErrorCode> {
        let offset = self.cursor;
        let next = offset
            .checked_add(stride(len, padding))
            .ok_or(ErrorCode::INVAL)?;
        if next > self.capacity {
            return Err(ErrorCode::INVAL);
        }
        self.cursor = next;
        Ok(Slot { offset, len })
    }

    /// Reserve the x and y coordinates of a point on a curve of `size` words.
    /// The coordinates are contiguous, y follows x.
    pub fn place_point(&mut self, size: usize) -> Result<(Slot, Slot), ErrorCode> {
        let x = self.place(size, Padding::Scratch)?;
        let y = self.place(size, Padding::Scratch)?;
        Ok((x, y))
    }

    /// First word not yet reserved.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}
