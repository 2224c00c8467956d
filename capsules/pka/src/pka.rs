// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Arbitration of the single public key accelerator slot.
//!
//! The engine executes one request at a time and its operand RAM is reused by
//! every request. `Pka` tracks which request owns the engine: starting an
//! operation acquires the slot and returns a [`Ticket`], and retrieving the
//! result with that ticket releases it. A second start while a ticket is
//! outstanding fails with `BUSY` instead of queueing.
//!
//! Completion can be observed by polling [`Pka::poll_done`], or by
//! registering a [`PkaClient`] which is called from the engine interrupt.
//! Retrieving a result unregisters the client.
//!
//! The hardware cannot be stopped once launched. A caller that no longer
//! wants a result hands its ticket to [`Pka::abandon`]; the slot is then
//! reclaimed by the next start, but only after the engine reports that it is
//! idle. [`Pka::recover`] does the same for a ticket that was lost.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let pka = static_init!(
//!     capsules_pka::Pka<'static, cc2538::pka::Pka<'static>>,
//!     capsules_pka::Pka::new(&peripherals.pka)
//! );
//! kernel::hil::pka::Engine::set_client(&peripherals.pka, pka);
//! ```

use core::cell::Cell;
use core::marker::PhantomData;

use kernel::debug_verbose;
use kernel::hil::pka::{self, Engine, Operation, Status, Vectors};
use kernel::utilities::cells::OptionalCell;
use kernel::ErrorCode;

use crate::arena::{Layout, Slot};

/// Receiver of completion notifications. At most one can be registered.
pub trait PkaClient {
    /// The in-flight operation has finished and its result can be retrieved.
    fn operation_complete(&self);
}

/// Ticket kind of operations producing a big integer.
#[derive(Debug)]
pub enum Arithmetic {}
/// Ticket kind of `compare`.
#[derive(Debug)]
pub enum Comparison {}
/// Ticket kind of `divide`, which produces a quotient and a remainder.
#[derive(Debug)]
pub enum Division {}
/// Ticket kind of elliptic curve point operations.
#[derive(Debug)]
pub enum Point {}

/// Proof of ownership of the engine slot, consumed by result retrieval.
///
/// Tickets cannot be copied, so only the caller that started an operation
/// can collect its result.
#[derive(Debug)]
#[must_use = "the engine stays busy until the ticket is redeemed or abandoned"]
pub struct Ticket<K> {
    sequence: u32,
    operation: Operation,
    result: Slot,
    aux: Slot,
    kind: PhantomData<K>,
}

impl<K> Ticket<K> {
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    Idle,
    InFlight(u32),
    /// The owner gave up. The engine may still be running.
    Abandoned,
}

/// A finished request whose ticket has been redeemed.
pub(crate) struct Completed {
    pub(crate) operation: Operation,
    pub(crate) result: Slot,
    pub(crate) aux: Slot,
    pub(crate) status: Status,
}

pub struct Pka<'a, E: Engine<'a>> {
    engine: &'a E,
    state: Cell<SlotState>,
    sequence: Cell<u32>,
    notifier: OptionalCell<&'a dyn PkaClient>,
}

impl<'a, E: Engine<'a>> Pka<'a, E> {
    pub fn new(engine: &'a E) -> Pka<'a, E> {
        Pka {
            engine,
            state: Cell::new(SlotState::Idle),
            sequence: Cell::new(0),
            notifier: OptionalCell::empty(),
        }
    }

    /// Largest operand accepted, in words.
    pub fn max_operand_words(&self) -> usize {
        core::cmp::min(
            self.engine.config().max_operand_words,
            pka::MAX_OPERAND_WORDS,
        )
    }

    /// Whether the engine is not executing anything. This does not mean a
    /// new operation can be started: the previous result may not have been
    /// retrieved yet.
    pub fn poll_done(&self) -> bool {
        !self.engine.is_running()
    }

    /// Register the client woken when the in-flight operation completes,
    /// replacing any previous registration.
    pub fn register_completion_notifier(&self, client: &'a dyn PkaClient) {
        self.notifier.set(client);
    }

    pub fn clear_completion_notifier(&self) {
        self.notifier.clear();
    }

    /// Give up on the operation owning `ticket`. Its result is discarded and
    /// the slot is reclaimed by the next start once the engine is idle.
    pub fn abandon<K>(&self, ticket: Ticket<K>) {
        if self.state.get() == SlotState::InFlight(ticket.sequence) {
            debug_verbose!("pka: {:?} abandoned", ticket.operation);
            self.notifier.clear();
            self.state.set(SlotState::Abandoned);
        }
    }

    /// Release the slot without its ticket. Any outstanding ticket becomes
    /// invalid.
    ///
    /// Returns `BUSY` while the engine is still executing, in which case
    /// nothing changes.
    pub fn recover(&self) -> Result<(), ErrorCode> {
        match self.state.get() {
            SlotState::Idle => Ok(()),
            SlotState::InFlight(_) | SlotState::Abandoned => {
                if self.engine.is_running() {
                    return Err(ErrorCode::BUSY);
                }
                debug_verbose!("pka: slot recovered");
                self.notifier.clear();
                self.state.set(SlotState::Idle);
                Ok(())
            }
        }
    }

    pub(crate) fn layout(&self) -> Layout {
        Layout::new(self.engine.config().ram_words)
    }

    /// Reject empty operands and operands wider than the engine.
    pub(crate) fn check_operand(&self, words: &[u32]) -> Result<(), ErrorCode> {
        if words.is_empty() || words.len() > self.max_operand_words() {
            Err(ErrorCode::INVAL)
        } else {
            Ok(())
        }
    }

    /// Take ownership of the engine for `operation`. `result` and `aux` are
    /// the arena slots the result will be read from.
    pub(crate) fn acquire<K>(
        &self,
        operation: Operation,
        result: Slot,
        aux: Slot,
    ) -> Result<Ticket<K>, ErrorCode> {
        match self.state.get() {
            SlotState::Idle => {}
            SlotState::InFlight(_) => return Err(ErrorCode::BUSY),
            SlotState::Abandoned => {
                if self.engine.is_running() {
                    return Err(ErrorCode::BUSY);
                }
                debug_verbose!("pka: reclaiming abandoned slot");
            }
        }

        let sequence = self.sequence.get().wrapping_add(1);
        self.sequence.set(sequence);
        self.state.set(SlotState::InFlight(sequence));
        Ok(Ticket {
            sequence,
            operation,
            result,
            aux,
            kind: PhantomData,
        })
    }

    /// Copy `words` into `slot`, zero extending them to the slot length.
    pub(crate) fn write_operand(&self, slot: Slot, words: &[u32]) {
        self.engine.write_words(slot.offset, words);
        if slot.len > words.len() {
            self.engine
                .zero_words(slot.offset + words.len(), slot.len - words.len());
        }
    }

    pub(crate) fn set_shift(&self, shift: u32) {
        self.engine.set_shift(shift);
    }

    pub(crate) fn launch(&self, operation: Operation, vectors: Vectors, a_len: usize, b_len: usize) {
        debug_verbose!(
            "pka: {:?} A@{} B@{} C@{} D@{} len {}/{}",
            operation,
            vectors.a,
            vectors.b,
            vectors.c,
            vectors.d,
            a_len,
            b_len
        );
        self.engine.set_vectors(vectors);
        self.engine.set_lengths(a_len, b_len);
        self.engine.launch(operation);
    }

    /// Redeem `ticket` and release the slot.
    ///
    /// The ticket is handed back with `INPROGRESS` if the engine has not
    /// finished. A ticket that no longer owns the slot (it was abandoned or
    /// the slot recovered) is rejected with `INVAL`.
    pub(crate) fn complete<K>(
        &self,
        ticket: Ticket<K>,
    ) -> Result<Completed, (ErrorCode, Option<Ticket<K>>)> {
        if self.state.get() != SlotState::InFlight(ticket.sequence) {
            return Err((ErrorCode::INVAL, None));
        }
        if self.engine.is_running() {
            return Err((ErrorCode::INPROGRESS, Some(ticket)));
        }

        self.notifier.clear();
        self.state.set(SlotState::Idle);
        Ok(Completed {
            operation: ticket.operation,
            result: ticket.result,
            aux: ticket.aux,
            status: self.engine.status(),
        })
    }

    pub(crate) fn read_words(&self, offset: usize, words: &mut [u32]) {
        self.engine.read_words(offset, words);
    }

    /// Length of a result starting at `base` whose most significant word is
    /// at `msw_address`, or `ZERO` if the engine flagged it as zero.
    pub(crate) fn result_len(
        &self,
        base: usize,
        is_zero: bool,
        msw_address: usize,
    ) -> Result<usize, ErrorCode> {
        if is_zero {
            return Err(ErrorCode::ZERO);
        }
        // An MSW below the result vector means the engine state is corrupt
        (msw_address + 1)
            .checked_sub(base)
            .ok_or(ErrorCode::FAIL)
    }

    /// Copy a result out of the arena into `out`. Nothing is copied unless
    /// the whole result fits.
    pub(crate) fn copy_result(
        &self,
        base: usize,
        is_zero: bool,
        msw_address: usize,
        out: &mut [u32],
    ) -> Result<usize, ErrorCode> {
        let len = self.result_len(base, is_zero, msw_address)?;
        if len > out.len() {
            return Err(ErrorCode::SIZE);
        }
        self.engine.read_words(base, &mut out[..len]);
        Ok(len)
    }
}

impl<'a, E: Engine<'a>> pka::Client for Pka<'a, E> {
    fn operation_done(&self) {
        self.notifier.map(|client| client.operation_complete());
    }
}
