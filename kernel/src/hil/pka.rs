// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface for public key accelerator (PKA) engines.
//!
//! A PKA engine is a single hardware slot that executes one big integer or
//! elliptic curve operation at a time. Operands live in a word addressable
//! RAM owned by the engine (the arena). A request is issued by
//!
//! 1. writing the operands into the arena with `write_words()`,
//! 2. pointing the engine at them with `set_vectors()` and `set_lengths()`,
//! 3. starting it with `launch()`.
//!
//! The engine runs asynchronously. Completion is observed either by polling
//! `is_running()` or through the `Client` registered with `set_client()`,
//! which is called from the engine's interrupt handler. Once complete,
//! `status()` describes the result and `read_words()` copies it out of the
//! arena.
//!
//! This trait only abstracts register access. It does not arbitrate between
//! users, validate operand placement or interpret results; that is the job of
//! the driver built on top of it.

use core::cmp::Ordering;

/// Largest operand the engine family supports, in 32-bit words (384 bits).
pub const MAX_OPERAND_WORDS: usize = 12;

/// Value of the ECC fault register after a successful point operation.
pub const ECC_FAULT_NONE: u32 = 0;

/// Operations the engine can run. The mapping to opcode values is engine
/// specific.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// C = A + B
    Add,
    /// C = A - B
    Subtract,
    /// C = A * B
    Multiply,
    /// D = A / B, C = A mod B
    Divide,
    /// C = A mod B
    Modulo,
    /// D = A^-1 mod B
    ModularInverse,
    /// COMPARE = cmp(A, B)
    Compare,
    /// D = C^A mod B
    ModularExponentiation,
    /// D = A * C on the curve described at B
    EccMultiply,
    /// D = A + C on the curve described at B
    EccAdd,
}

/// Word offsets of the four operand vectors inside the arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vectors {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
}

/// Static description of an engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Bus address of the first arena word.
    pub ram_base: usize,
    /// Capacity of the arena, in 32-bit words.
    pub ram_words: usize,
    /// Largest operand the engine accepts, in 32-bit words. Never larger than
    /// `MAX_OPERAND_WORDS`.
    pub max_operand_words: usize,
}

/// Snapshot of the engine's result registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    /// The primary result (or the quotient of a division) is zero.
    pub result_is_zero: bool,
    /// Arena word offset of the most significant nonzero word of the primary
    /// result.
    pub msw_address: usize,
    /// The remainder of a division or modulo operation is zero.
    pub remainder_is_zero: bool,
    /// Arena word offset of the most significant nonzero word of the
    /// remainder.
    pub remainder_msw_address: usize,
    /// Outcome of the last compare, `None` if the engine reported none.
    pub compare: Option<Ordering>,
    /// ECC fault register. Anything other than `ECC_FAULT_NONE` after a
    /// point operation means the engine failed internally.
    pub ecc_fault: u32,
}

/// Implement this trait and use `set_client()` in order to receive a callback
/// when an operation completes.
pub trait Client {
    /// Called from the interrupt handler once the engine has finished.
    fn operation_done(&self);
}

pub trait Engine<'a> {
    /// Return the static description of this engine.
    fn config(&self) -> EngineConfig;

    /// Copy `words` into the arena starting at word `offset`.
    ///
    /// The caller must have checked that the range lies inside the arena and
    /// that the engine is not running.
    fn write_words(&self, offset: usize, words: &[u32]);

    /// Set `len` arena words starting at `offset` to zero.
    fn zero_words(&self, offset: usize, len: usize);

    /// Copy `words.len()` words out of the arena starting at word `offset`.
    fn read_words(&self, offset: usize, words: &mut [u32]);

    /// Program the A, B, C and D vector pointers.
    fn set_vectors(&self, vectors: Vectors);

    /// Program the A and B vector lengths, in words.
    fn set_lengths(&self, a_len: usize, b_len: usize);

    /// Program the shift register. Only used as an input by the modular
    /// exponentiation sequencer.
    fn set_shift(&self, shift: u32);

    /// Start `operation`. The engine must be idle.
    fn launch(&self, operation: Operation);

    /// Whether the last launched operation is still executing.
    fn is_running(&self) -> bool;

    /// Read the result registers. Only meaningful once `is_running()` is
    /// false.
    fn status(&self) -> Status;

    /// Set the client which will be told about completed operations.
    fn set_client(&self, client: &'a dyn Client);
}
