// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! ECDH and ECDSA built from the accelerator primitives.
//!
//! An [`EccOperation`] is a state machine that runs one primitive per step.
//! The owner calls [`EccOperation::step`] whenever it is scheduled, for
//! example from a deferred call after the `Pka` completion notifier fired.
//! Each call collects the result of the primitive started by the previous
//! call, if the engine has finished, and starts the next one. The first
//! error from any primitive ends the run with that error.
//!
//! Signing, with `n` the order of the curve:
//!
//! ```text
//! 0: k^-1 mod n    1: R = k*G, r = R.x    2: d*r         3: mod n
//! 4: + hash        5: mod n               6: * k^-1      7: mod n = s
//! ```
//!
//! Verification:
//!
//! ```text
//! 0: w = s^-1 mod n   1: w*hash   2: mod n = u1   3: w*r   4: mod n = u2
//! 5: u1*G             6: u2*Q     7: u1*G + u2*Q  8: compare x with r
//! ```
//!
//! A run can be given up with [`EccOperation::abandon`], which hands the
//! in-flight primitive back to the `Pka` so the engine is not left claimed.
//!
//! Products are reduced right after every multiplication so no operand
//! grows beyond the width of the curve.

use core::cmp::Ordering;

use kernel::hil::pka::{Engine, MAX_OPERAND_WORDS};
use kernel::hil::time::Time;
use kernel::ErrorCode;
use kernel::{debug, debug_verbose};

use crate::curves::EccCurve;
use crate::ecc::EcPoint;
use crate::pka::{Arithmetic, Comparison, Pka, Point, Ticket};

type Words = [u32; MAX_OPERAND_WORDS];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Compare,
    Multiply,
    Sign,
    Verify,
}

/// Returned by [`EccOperation::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// A primitive is running on the engine. Call `step` again once it has
    /// completed.
    Pending,
    /// The run is over. A primitive that could not be started because the
    /// engine was busy with another request ends the run with `BUSY`.
    Complete(Result<(), ErrorCode>),
}

#[derive(Debug)]
enum Pending {
    Nothing,
    Arithmetic(Ticket<Arithmetic>),
    Comparison(Ticket<Comparison>),
    Point(Ticket<Point>),
}

pub struct EccOperation<'a> {
    algorithm: Algorithm,
    curve: Option<&'a EccCurve>,
    size: usize,
    step: usize,
    pending: Pending,
    outcome: Option<Result<(), ErrorCode>>,

    // Inputs
    lhs: Words,
    rhs: Words,
    secret: Words,
    nonce: Words,
    hash: Words,
    point: EcPoint,

    // Intermediate values and outputs
    inverse: Words,
    reduced: Words,
    u2: Words,
    product: [u32; 2 * MAX_OPERAND_WORDS],
    r: Words,
    s: Words,
    result: EcPoint,
    partial: EcPoint,
    ordering: Option<Ordering>,

    timer: Option<&'a dyn Time>,
    started_at: Option<u32>,
    elapsed: Option<u32>,
}

fn load(words: &[u32], size: usize) -> Result<Words, ErrorCode> {
    if words.is_empty() || words.len() > size || size > MAX_OPERAND_WORDS {
        return Err(ErrorCode::INVAL);
    }
    let mut out = [0; MAX_OPERAND_WORDS];
    out[..words.len()].copy_from_slice(words);
    Ok(out)
}

impl<'a> EccOperation<'a> {
    fn new(algorithm: Algorithm, curve: Option<&'a EccCurve>, size: usize) -> EccOperation<'a> {
        EccOperation {
            algorithm,
            curve,
            size,
            step: 0,
            pending: Pending::Nothing,
            outcome: None,
            lhs: [0; MAX_OPERAND_WORDS],
            rhs: [0; MAX_OPERAND_WORDS],
            secret: [0; MAX_OPERAND_WORDS],
            nonce: [0; MAX_OPERAND_WORDS],
            hash: [0; MAX_OPERAND_WORDS],
            point: EcPoint::zero(),
            inverse: [0; MAX_OPERAND_WORDS],
            reduced: [0; MAX_OPERAND_WORDS],
            u2: [0; MAX_OPERAND_WORDS],
            product: [0; 2 * MAX_OPERAND_WORDS],
            r: [0; MAX_OPERAND_WORDS],
            s: [0; MAX_OPERAND_WORDS],
            result: EcPoint::zero(),
            partial: EcPoint::zero(),
            ordering: None,
            timer: None,
            started_at: None,
            elapsed: None,
        }
    }

    /// Compare two numbers of equal length.
    pub fn compare(a: &[u32], b: &[u32]) -> Result<EccOperation<'a>, ErrorCode> {
        if a.len() != b.len() {
            return Err(ErrorCode::INVAL);
        }
        let mut op = EccOperation::new(Algorithm::Compare, None, a.len());
        op.lhs = load(a, a.len())?;
        op.rhs = load(b, b.len())?;
        Ok(op)
    }

    /// Compute `secret * point`, e.g. an ECDH shared point or, with the
    /// generator, a public key.
    pub fn multiply(
        secret: &[u32],
        point: &EcPoint,
        curve: &'a EccCurve,
    ) -> Result<EccOperation<'a>, ErrorCode> {
        curve.check(MAX_OPERAND_WORDS)?;
        let mut op = EccOperation::new(Algorithm::Multiply, Some(curve), curve.size);
        op.secret = load(secret, curve.size)?;
        op.point = *point;
        Ok(op)
    }

    /// Sign `hash` with the private key `secret` and the per signature
    /// secret `nonce`, which must be coprime to the curve order.
    pub fn sign(
        secret: &[u32],
        nonce: &[u32],
        hash: &[u32],
        curve: &'a EccCurve,
    ) -> Result<EccOperation<'a>, ErrorCode> {
        curve.check(MAX_OPERAND_WORDS)?;
        let mut op = EccOperation::new(Algorithm::Sign, Some(curve), curve.size);
        op.secret = load(secret, curve.size)?;
        op.nonce = load(nonce, curve.size)?;
        op.hash = load(hash, curve.size)?;
        Ok(op)
    }

    /// Check the signature `(r, s)` of `hash` against `public_key`.
    /// Completes with `BADSIG` if it does not match.
    pub fn verify(
        r: &[u32],
        s: &[u32],
        hash: &[u32],
        public_key: &EcPoint,
        curve: &'a EccCurve,
    ) -> Result<EccOperation<'a>, ErrorCode> {
        curve.check(MAX_OPERAND_WORDS)?;
        let mut op = EccOperation::new(Algorithm::Verify, Some(curve), curve.size);
        op.r = load(r, curve.size)?;
        op.s = load(s, curve.size)?;
        op.hash = load(hash, curve.size)?;
        op.point = *public_key;
        Ok(op)
    }

    /// Measure the run with `timer`. Ticks are counted from the first call
    /// to `step`.
    pub fn set_timer(&mut self, timer: &'a dyn Time) {
        self.timer = Some(timer);
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Index of the primitive currently running or about to be started.
    pub fn step_index(&self) -> usize {
        self.step
    }

    /// `None` until the run completes.
    pub fn outcome(&self) -> Option<Result<(), ErrorCode>> {
        self.outcome
    }

    /// Signature `(r, s)` of a successful signing run.
    pub fn signature(&self) -> Option<(&[u32], &[u32])> {
        match (self.algorithm, self.outcome) {
            (Algorithm::Sign, Some(Ok(()))) => {
                Some((&self.r[..self.size], &self.s[..self.size]))
            }
            _ => None,
        }
    }

    /// Product of a successful multiplication run.
    pub fn point(&self) -> Option<&EcPoint> {
        match (self.algorithm, self.outcome) {
            (Algorithm::Multiply, Some(Ok(()))) => Some(&self.result),
            _ => None,
        }
    }

    /// Outcome of a compare run, or of the final comparison of a
    /// verification.
    pub fn compare_result(&self) -> Option<Ordering> {
        self.ordering
    }

    /// Ticks taken by a completed run, if a timer was set.
    pub fn elapsed_ticks(&self) -> Option<u32> {
        self.elapsed
    }

    /// Run the state machine as far as the engine allows.
    ///
    /// Once complete, further calls return the same outcome without touching
    /// the engine.
    pub fn step<'p, E: Engine<'p>>(&mut self, pka: &Pka<'p, E>) -> Progress {
        if let Some(outcome) = self.outcome {
            return Progress::Complete(outcome);
        }
        if self.started_at.is_none() {
            self.started_at = self.timer.map(|timer| timer.now());
        }

        match self.collect(pka) {
            Ok(()) => {}
            Err(ErrorCode::INPROGRESS) => return Progress::Pending,
            Err(err) => return self.finish(Err(err)),
        }

        match self.start_next(pka) {
            Ok(Pending::Nothing) => self.finish(Ok(())),
            Ok(pending) => {
                debug_verbose!("ecc: {:?} step {} started", self.algorithm, self.step);
                self.pending = pending;
                Progress::Pending
            }
            Err(err) => self.finish(Err(err)),
        }
    }

    /// Give up on the run. The primitive in flight, if any, is abandoned
    /// and its result discarded; the engine is free for the next request
    /// once it goes idle. The run completes with `CANCEL`.
    ///
    /// A run that already completed keeps its outcome.
    pub fn abandon<'p, E: Engine<'p>>(&mut self, pka: &Pka<'p, E>) -> Progress {
        if let Some(outcome) = self.outcome {
            return Progress::Complete(outcome);
        }
        match core::mem::replace(&mut self.pending, Pending::Nothing) {
            Pending::Nothing => {}
            Pending::Arithmetic(ticket) => pka.abandon(ticket),
            Pending::Comparison(ticket) => pka.abandon(ticket),
            Pending::Point(ticket) => pka.abandon(ticket),
        }
        self.finish(Err(ErrorCode::CANCEL))
    }

    fn finish(&mut self, outcome: Result<(), ErrorCode>) -> Progress {
        self.outcome = Some(outcome);
        if let (Some(timer), Some(start)) = (self.timer, self.started_at) {
            self.elapsed = Some(timer.tics_since(start));
        }

        if kernel::config::CONFIG.trace_pka {
            debug!(
                "ecc: {:?} finished after {} steps: {:?}, {:?} ticks",
                self.algorithm, self.step, outcome, self.elapsed
            );
        }
        Progress::Complete(outcome)
    }

    /// Buffer receiving the arithmetic result of the current step.
    fn arithmetic_destination(&mut self) -> &mut [u32] {
        match (self.algorithm, self.step) {
            (Algorithm::Sign, 0) | (Algorithm::Verify, 0) => &mut self.inverse[..],
            (Algorithm::Sign, 3) | (Algorithm::Sign, 5) | (Algorithm::Verify, 2) => {
                &mut self.reduced[..]
            }
            (Algorithm::Sign, 7) => &mut self.s[..],
            (Algorithm::Verify, 4) => &mut self.u2[..],
            _ => &mut self.product[..],
        }
    }

    /// Retrieve the result of the running primitive, if any, and advance
    /// past it. `INPROGRESS` means it has not finished yet.
    fn collect<'p, E: Engine<'p>>(&mut self, pka: &Pka<'p, E>) -> Result<(), ErrorCode> {
        match core::mem::replace(&mut self.pending, Pending::Nothing) {
            Pending::Nothing => return Ok(()),
            Pending::Arithmetic(ticket) => {
                let out = self.arithmetic_destination();
                out.fill(0);
                match pka.get_result(ticket, out) {
                    Ok(_) => {}
                    Err((ErrorCode::INPROGRESS, Some(ticket))) => {
                        self.pending = Pending::Arithmetic(ticket);
                        return Err(ErrorCode::INPROGRESS);
                    }
                    Err((err, _)) => return Err(err),
                }
            }
            Pending::Comparison(ticket) => match pka.get_compare_result(ticket) {
                Ok(ordering) => {
                    self.ordering = Some(ordering);
                    if self.algorithm == Algorithm::Verify && ordering != Ordering::Equal {
                        return Err(ErrorCode::BADSIG);
                    }
                }
                Err((ErrorCode::INPROGRESS, Some(ticket))) => {
                    self.pending = Pending::Comparison(ticket);
                    return Err(ErrorCode::INPROGRESS);
                }
                Err((err, _)) => return Err(err),
            },
            Pending::Point(ticket) => {
                let out = match (self.algorithm, self.step) {
                    (Algorithm::Verify, 6) => &mut self.partial,
                    _ => &mut self.result,
                };
                match pka.get_point_result(ticket, out) {
                    Ok(()) => {}
                    Err((ErrorCode::INPROGRESS, Some(ticket))) => {
                        self.pending = Pending::Point(ticket);
                        return Err(ErrorCode::INPROGRESS);
                    }
                    Err((err, _)) => return Err(err),
                }
                if self.algorithm == Algorithm::Sign {
                    self.r = self.result.x;
                }
            }
        }

        debug_verbose!("ecc: {:?} step {} done", self.algorithm, self.step);
        self.step += 1;
        Ok(())
    }

    /// Start the primitive for the current step. Returns `Pending::Nothing`
    /// once every step has run.
    fn start_next<'p, E: Engine<'p>>(&self, pka: &Pka<'p, E>) -> Result<Pending, ErrorCode> {
        let size = self.size;
        let curve = match self.curve {
            Some(curve) => curve,
            None => {
                return match self.step {
                    0 => pka
                        .compare_start(&self.lhs[..size], &self.rhs[..size])
                        .map(Pending::Comparison),
                    _ => Ok(Pending::Nothing),
                };
            }
        };
        let n = curve.n;
        let product = &self.product[..2 * size];

        let pending = match (self.algorithm, self.step) {
            (Algorithm::Multiply, 0) => {
                Pending::Point(pka.ecc_multiply_start(&self.secret[..size], &self.point, curve)?)
            }

            (Algorithm::Sign, 0) => Pending::Arithmetic(pka.inv_mod_start(&self.nonce[..size], n)?),
            (Algorithm::Sign, 1) => {
                Pending::Point(pka.ecc_multiply_generator_start(&self.nonce[..size], curve)?)
            }
            (Algorithm::Sign, 2) => {
                Pending::Arithmetic(pka.multiply_start(&self.secret[..size], &self.r[..size])?)
            }
            (Algorithm::Sign, 3) | (Algorithm::Sign, 5) | (Algorithm::Sign, 7) => {
                Pending::Arithmetic(pka.modulo_start(product, n)?)
            }
            (Algorithm::Sign, 4) => {
                Pending::Arithmetic(pka.add_start(&self.reduced[..size], &self.hash[..size])?)
            }
            (Algorithm::Sign, 6) => {
                Pending::Arithmetic(pka.multiply_start(&self.inverse[..size], &self.reduced[..size])?)
            }

            (Algorithm::Verify, 0) => Pending::Arithmetic(pka.inv_mod_start(&self.s[..size], n)?),
            (Algorithm::Verify, 1) => {
                Pending::Arithmetic(pka.multiply_start(&self.inverse[..size], &self.hash[..size])?)
            }
            (Algorithm::Verify, 3) => {
                Pending::Arithmetic(pka.multiply_start(&self.inverse[..size], &self.r[..size])?)
            }
            (Algorithm::Verify, 2) | (Algorithm::Verify, 4) => {
                Pending::Arithmetic(pka.modulo_start(product, n)?)
            }
            (Algorithm::Verify, 5) => {
                Pending::Point(pka.ecc_multiply_generator_start(&self.reduced[..size], curve)?)
            }
            (Algorithm::Verify, 6) => {
                Pending::Point(pka.ecc_multiply_start(&self.u2[..size], &self.point, curve)?)
            }
            (Algorithm::Verify, 7) => {
                Pending::Point(pka.ecc_add_start(&self.result, &self.partial, curve)?)
            }
            (Algorithm::Verify, 8) => Pending::Comparison(
                pka.compare_start(self.result.x(size), &self.r[..size])?,
            ),

            _ => Pending::Nothing,
        };
        Ok(pending)
    }
}
