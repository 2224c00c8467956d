// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Big integer operations.
//!
//! Big integers are slices of 32-bit words, least significant word first.
//! Each operation is split into a `*_start()` call, which validates the
//! operands, lays them out in the arena and launches the engine, and a
//! result call which redeems the returned ticket once the engine is done.
//!
//! | Operation    | A         | B          | C              | D        |
//! |--------------|-----------|------------|----------------|----------|
//! | add/sub/mul  | a         | b          | result         |          |
//! | compare      | a         | b          |                |          |
//! | modulo       | a (+2)    | m (+2)     | result         |          |
//! | divide       | a (+2)    | d (+2)     | remainder (+2) | quotient |
//! | inv_mod      | a         | m          |                | result   |
//! | exp_mod      | exponent  | m (+2)     | base (+2)      | result   |
//!
//! `(+2)` marks operands followed by two scratch words.
//!
//! Moduli and divisors must be at least two words long with a nonzero most
//! significant word, and `inv_mod` and `exp_mod` additionally need an odd
//! modulus. Dividends may be up to twice the engine's operand width so that
//! the product of two operands can be reduced. Violations are rejected with
//! `INVAL` before the engine is touched.

use core::cmp::Ordering;

use kernel::hil::pka::{Engine, Operation, Vectors};
use kernel::ErrorCode;

use crate::arena::{Padding, Slot};
use crate::pka::{Arithmetic, Comparison, Division, Pka, Ticket};

/// Shift register value selecting the exponentiation sequencer's
/// left-to-right square and multiply variant.
const EXP_MOD_SHIFT: u32 = 1;

impl<'a, E: Engine<'a>> Pka<'a, E> {
    fn check_modulus(&self, modulus: &[u32]) -> Result<(), ErrorCode> {
        self.check_operand(modulus)?;
        match modulus.last() {
            Some(&msw) if modulus.len() >= 2 && msw != 0 => Ok(()),
            _ => Err(ErrorCode::INVAL),
        }
    }

    fn check_odd_modulus(&self, modulus: &[u32]) -> Result<(), ErrorCode> {
        self.check_modulus(modulus)?;
        if modulus[0] & 1 == 1 {
            Ok(())
        } else {
            Err(ErrorCode::INVAL)
        }
    }

    fn check_dividend(&self, dividend: &[u32]) -> Result<(), ErrorCode> {
        if dividend.is_empty() || dividend.len() > 2 * self.max_operand_words() {
            Err(ErrorCode::INVAL)
        } else {
            Ok(())
        }
    }

    /// Start computing `a + b`.
    pub fn add_start(&self, a: &[u32], b: &[u32]) -> Result<Ticket<Arithmetic>, ErrorCode> {
        self.check_operand(a)?;
        self.check_operand(b)?;
        self.start_packed(Operation::Add, a, b, a.len().max(b.len()) + 1)
    }

    /// Start computing `a - b`. `a` must not be smaller than `b`, otherwise
    /// the result wraps around at the width of `a`.
    pub fn subtract_start(&self, a: &[u32], b: &[u32]) -> Result<Ticket<Arithmetic>, ErrorCode> {
        self.check_operand(a)?;
        self.check_operand(b)?;
        self.start_packed(Operation::Subtract, a, b, a.len().max(b.len()))
    }

    /// Start computing `a * b`.
    pub fn multiply_start(&self, a: &[u32], b: &[u32]) -> Result<Ticket<Arithmetic>, ErrorCode> {
        self.check_operand(a)?;
        self.check_operand(b)?;
        self.start_packed(Operation::Multiply, a, b, a.len() + b.len())
    }

    fn start_packed(
        &self,
        operation: Operation,
        a: &[u32],
        b: &[u32],
        result_len: usize,
    ) -> Result<Ticket<Arithmetic>, ErrorCode> {
        let mut layout = self.layout();
        let a_slot = layout.place(a.len(), Padding::Packed)?;
        let b_slot = layout.place(b.len(), Padding::Packed)?;
        let result = layout.place(result_len, Padding::Packed)?;

        let ticket = self.acquire(operation, result, Slot::default())?;
        self.write_operand(a_slot, a);
        self.write_operand(b_slot, b);
        self.launch(
            operation,
            Vectors {
                a: a_slot.offset,
                b: b_slot.offset,
                c: result.offset,
                d: 0,
            },
            a.len(),
            b.len(),
        );
        Ok(ticket)
    }

    /// Start computing `a mod modulus`.
    pub fn modulo_start(
        &self,
        a: &[u32],
        modulus: &[u32],
    ) -> Result<Ticket<Arithmetic>, ErrorCode> {
        self.check_dividend(a)?;
        self.check_modulus(modulus)?;

        let mut layout = self.layout();
        let a_slot = layout.place(a.len(), Padding::Scratch)?;
        let m_slot = layout.place(modulus.len(), Padding::Scratch)?;
        let result = layout.place(modulus.len(), Padding::Packed)?;

        let ticket = self.acquire(Operation::Modulo, result, Slot::default())?;
        self.write_operand(a_slot, a);
        self.write_operand(m_slot, modulus);
        self.launch(
            Operation::Modulo,
            Vectors {
                a: a_slot.offset,
                b: m_slot.offset,
                c: result.offset,
                d: 0,
            },
            a.len(),
            modulus.len(),
        );
        Ok(ticket)
    }

    /// Start computing `a / divisor` and `a mod divisor`.
    pub fn divide_start(&self, a: &[u32], divisor: &[u32]) -> Result<Ticket<Division>, ErrorCode> {
        self.check_dividend(a)?;
        self.check_modulus(divisor)?;

        let mut layout = self.layout();
        let a_slot = layout.place(a.len(), Padding::Scratch)?;
        let d_slot = layout.place(divisor.len(), Padding::Scratch)?;
        let remainder = layout.place(divisor.len(), Padding::Scratch)?;
        let quotient = layout.place(a.len().saturating_sub(divisor.len()) + 1, Padding::Packed)?;

        let ticket = self.acquire(Operation::Divide, quotient, remainder)?;
        self.write_operand(a_slot, a);
        self.write_operand(d_slot, divisor);
        self.launch(
            Operation::Divide,
            Vectors {
                a: a_slot.offset,
                b: d_slot.offset,
                c: remainder.offset,
                d: quotient.offset,
            },
            a.len(),
            divisor.len(),
        );
        Ok(ticket)
    }

    /// Start computing the inverse of `a` modulo an odd `modulus`.
    ///
    /// If `a` has no inverse the result is reported as zero.
    pub fn inv_mod_start(
        &self,
        a: &[u32],
        modulus: &[u32],
    ) -> Result<Ticket<Arithmetic>, ErrorCode> {
        self.check_operand(a)?;
        self.check_odd_modulus(modulus)?;

        let mut layout = self.layout();
        let a_slot = layout.place(a.len(), Padding::Packed)?;
        let m_slot = layout.place(modulus.len(), Padding::Packed)?;
        let result = layout.place(modulus.len(), Padding::Packed)?;

        let ticket = self.acquire(Operation::ModularInverse, result, Slot::default())?;
        self.write_operand(a_slot, a);
        self.write_operand(m_slot, modulus);
        self.launch(
            Operation::ModularInverse,
            Vectors {
                a: a_slot.offset,
                b: m_slot.offset,
                c: 0,
                d: result.offset,
            },
            a.len(),
            modulus.len(),
        );
        Ok(ticket)
    }

    /// Start computing `base ^ exponent mod modulus`. `modulus` must be odd
    /// and `base` no wider than it.
    pub fn exp_mod_start(
        &self,
        exponent: &[u32],
        modulus: &[u32],
        base: &[u32],
    ) -> Result<Ticket<Arithmetic>, ErrorCode> {
        self.check_operand(exponent)?;
        self.check_odd_modulus(modulus)?;
        self.check_operand(base)?;
        if base.len() > modulus.len() {
            return Err(ErrorCode::INVAL);
        }

        let mut layout = self.layout();
        let e_slot = layout.place(exponent.len(), Padding::Packed)?;
        let m_slot = layout.place(modulus.len(), Padding::Scratch)?;
        // The sequencer reads the base with the modulus length
        let b_slot = layout.place(modulus.len(), Padding::Scratch)?;
        let result = layout.place(modulus.len(), Padding::Packed)?;

        let ticket = self.acquire(Operation::ModularExponentiation, result, Slot::default())?;
        self.write_operand(e_slot, exponent);
        self.write_operand(m_slot, modulus);
        self.write_operand(b_slot, base);
        self.set_shift(EXP_MOD_SHIFT);
        self.launch(
            Operation::ModularExponentiation,
            Vectors {
                a: e_slot.offset,
                b: m_slot.offset,
                c: b_slot.offset,
                d: result.offset,
            },
            exponent.len(),
            modulus.len(),
        );
        Ok(ticket)
    }

    /// Start comparing two numbers of the same length.
    pub fn compare_start(&self, a: &[u32], b: &[u32]) -> Result<Ticket<Comparison>, ErrorCode> {
        self.check_operand(a)?;
        if a.len() != b.len() {
            return Err(ErrorCode::INVAL);
        }

        let mut layout = self.layout();
        let a_slot = layout.place(a.len(), Padding::Packed)?;
        let b_slot = layout.place(b.len(), Padding::Packed)?;

        let ticket = self.acquire(Operation::Compare, Slot::default(), Slot::default())?;
        self.write_operand(a_slot, a);
        self.write_operand(b_slot, b);
        self.launch(
            Operation::Compare,
            Vectors {
                a: a_slot.offset,
                b: b_slot.offset,
                c: 0,
                d: 0,
            },
            a.len(),
            b.len(),
        );
        Ok(ticket)
    }

    /// Retrieve the result of an arithmetic operation into `out`, returning
    /// its length in words.
    ///
    /// - `INPROGRESS`: the engine has not finished. The ticket is handed back.
    /// - `ZERO`: the result is zero. Nothing is copied.
    /// - `SIZE`: `out` is too short. Nothing is copied.
    /// - `INVAL`: the ticket no longer owns the engine.
    pub fn get_result(
        &self,
        ticket: Ticket<Arithmetic>,
        out: &mut [u32],
    ) -> Result<usize, (ErrorCode, Option<Ticket<Arithmetic>>)> {
        let done = self.complete(ticket)?;
        let status = done.status;
        // Modulo reports through the remainder registers
        let (is_zero, msw_address) = match done.operation {
            Operation::Modulo => (status.remainder_is_zero, status.remainder_msw_address),
            _ => (status.result_is_zero, status.msw_address),
        };
        self.copy_result(done.result.offset, is_zero, msw_address, out)
            .map_err(|err| (err, None))
    }

    /// Retrieve the quotient and, if `remainder` is given, the remainder of
    /// a division. Returns the quotient and remainder lengths; a zero part
    /// has length 0 and nothing is written for it.
    ///
    /// `ZERO` is returned only when both parts are zero, i.e. the dividend
    /// was zero. `SIZE` is returned if either buffer is too short, in which
    /// case neither is written.
    pub fn get_divide_result(
        &self,
        ticket: Ticket<Division>,
        quotient: &mut [u32],
        remainder: Option<&mut [u32]>,
    ) -> Result<(usize, usize), (ErrorCode, Option<Ticket<Division>>)> {
        let done = self.complete(ticket)?;
        let status = done.status;

        let part_len = |base: usize, is_zero: bool, msw_address: usize| {
            match self.result_len(base, is_zero, msw_address) {
                Err(ErrorCode::ZERO) => Ok(0),
                other => other,
            }
        };
        let quotient_len = part_len(
            done.result.offset,
            status.result_is_zero,
            status.msw_address,
        )
        .map_err(|err| (err, None))?;
        let remainder_len = part_len(
            done.aux.offset,
            status.remainder_is_zero,
            status.remainder_msw_address,
        )
        .map_err(|err| (err, None))?;
        if quotient_len == 0 && remainder_len == 0 {
            return Err((ErrorCode::ZERO, None));
        }

        if quotient_len > quotient.len() {
            return Err((ErrorCode::SIZE, None));
        }
        if let Some(buf) = &remainder {
            if remainder_len > buf.len() {
                return Err((ErrorCode::SIZE, None));
            }
        }

        self.read_words(done.result.offset, &mut quotient[..quotient_len]);
        if let Some(buf) = remainder {
            self.read_words(done.aux.offset, &mut buf[..remainder_len]);
        }
        Ok((quotient_len, remainder_len))
    }

    /// Retrieve the outcome of a compare, `a` relative to `b`.
    pub fn get_compare_result(
        &self,
        ticket: Ticket<Comparison>,
    ) -> Result<Ordering, (ErrorCode, Option<Ticket<Comparison>>)> {
        let done = self.complete(ticket)?;
        done.status.compare.ok_or((ErrorCode::FAIL, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sim::{from_big, to_big, SimEngine};
    use num_bigint::BigUint;
    use num_traits::{One, Zero};
    use std::vec::Vec;

    const P256_ORDER: [u32; 8] = [
        0xFC632551, 0xF3B9CAC2, 0xA7179E84, 0xBCE6FAAD, 0xFFFFFFFF, 0xFFFFFFFF, 0x00000000,
        0xFFFFFFFF,
    ];

    fn samples() -> Vec<Vec<u32>> {
        vec![
            vec![0x0000_0001, 0x0000_0000, 0x0000_0000],
            vec![0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF],
            vec![0x1234_5678, 0x9ABC_DEF0, 0x0FED_CBA9],
            vec![0x1234_5679, 0x9ABC_DEF0, 0x0FED_CBA9],
            vec![0x0000_0000, 0x0000_0000, 0x8000_0000],
        ]
    }

    fn arithmetic<'a>(
        engine: &SimEngine<'a>,
        pka: &Pka<'a, SimEngine<'a>>,
        ticket: Result<Ticket<Arithmetic>, ErrorCode>,
    ) -> Result<Vec<u32>, ErrorCode> {
        let ticket = ticket?;
        engine.run_to_completion();
        let mut out = [0; 32];
        let len = pka.get_result(ticket, &mut out).map_err(|(err, _)| err)?;
        Ok(out[..len].to_vec())
    }

    fn compare<'a>(
        engine: &SimEngine<'a>,
        pka: &Pka<'a, SimEngine<'a>>,
        a: &[u32],
        b: &[u32],
    ) -> Ordering {
        let ticket = pka.compare_start(a, b).unwrap();
        engine.run_to_completion();
        pka.get_compare_result(ticket).unwrap()
    }

    #[test]
    fn compare_is_antisymmetric() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);

        for a in samples() {
            assert_eq!(compare(&engine, &pka, &a, &a), Ordering::Equal);
            for b in samples() {
                let forward = compare(&engine, &pka, &a, &b);
                let backward = compare(&engine, &pka, &b, &a);
                assert_eq!(forward, backward.reverse());
                assert_eq!(forward, to_big(&a).cmp(&to_big(&b)));
            }
        }
    }

    #[test]
    fn compare_needs_equal_lengths() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        assert_eq!(pka.compare_start(&[1, 2], &[1]).unwrap_err(), ErrorCode::INVAL);
        assert_eq!(engine.launches(), 0);
    }

    #[test]
    fn add_then_subtract_restores() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);

        for a in samples() {
            for b in samples() {
                let sum = arithmetic(&engine, &pka, pka.add_start(&a, &b)).unwrap();
                assert_eq!(to_big(&sum), to_big(&a) + to_big(&b));
                let back = arithmetic(&engine, &pka, pka.subtract_start(&sum, &b));
                if to_big(&a).is_zero() {
                    assert_eq!(back, Err(ErrorCode::ZERO));
                } else {
                    assert_eq!(to_big(&back.unwrap()), to_big(&a));
                }
            }
        }
    }

    #[test]
    fn subtracting_itself_is_zero() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let a = [0xDEAD_BEEF, 0x0000_0001];
        assert_eq!(
            arithmetic(&engine, &pka, pka.subtract_start(&a, &a)),
            Err(ErrorCode::ZERO)
        );
    }

    #[test]
    fn multiply_widens() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let a = [0xFFFF_FFFF; 12];
        let product = arithmetic(&engine, &pka, pka.multiply_start(&a, &a)).unwrap();
        assert_eq!(product.len(), 24);
        assert_eq!(to_big(&product), to_big(&a) * to_big(&a));
    }

    #[test]
    fn modulo_is_below_the_modulus() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let m = to_big(&P256_ORDER);

        for a in samples() {
            for b in samples() {
                let wide: Vec<u32> = a.iter().chain(b.iter()).copied().collect();
                let r = arithmetic(&engine, &pka, pka.modulo_start(&wide, &P256_ORDER));
                let expected = to_big(&wide) % &m;
                if expected.is_zero() {
                    assert_eq!(r, Err(ErrorCode::ZERO));
                } else {
                    let r = to_big(&r.unwrap());
                    assert!(r < m);
                    assert_eq!(r, expected);
                }
            }
        }
    }

    #[test]
    fn modulo_of_multiple_is_zero() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let multiple = from_big(&(to_big(&P256_ORDER) * 5u32), 9);
        assert_eq!(
            arithmetic(&engine, &pka, pka.modulo_start(&multiple, &P256_ORDER)),
            Err(ErrorCode::ZERO)
        );
    }

    #[test]
    fn modulo_reduces_a_double_width_product() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let a = [0xFFFF_FFFF; 12];
        let modulus = [0xFFFF_FFFD, 0xFFFF_FFFF, 0xFFFF_FFFF, 0x0000_0003];
        let product = arithmetic(&engine, &pka, pka.multiply_start(&a, &a)).unwrap();
        let r = arithmetic(&engine, &pka, pka.modulo_start(&product, &modulus)).unwrap();
        assert_eq!(
            to_big(&r),
            (to_big(&a) * to_big(&a)) % to_big(&modulus)
        );
    }

    #[test]
    fn inverse_times_value_is_one() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);

        for a in samples() {
            let inverse = arithmetic(&engine, &pka, pka.inv_mod_start(&a, &P256_ORDER));
            if to_big(&a).is_zero() {
                assert_eq!(inverse, Err(ErrorCode::ZERO));
                continue;
            }
            let inverse = inverse.unwrap();
            let product = arithmetic(&engine, &pka, pka.multiply_start(&inverse, &a)).unwrap();
            let one = arithmetic(&engine, &pka, pka.modulo_start(&product, &P256_ORDER)).unwrap();
            assert_eq!(one, vec![1]);
        }
    }

    #[test]
    fn exponentiation() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let modulus = [0x0000_0017, 0x0000_0001];
        let result = arithmetic(
            &engine,
            &pka,
            pka.exp_mod_start(&[0x0001_0001], &modulus, &[0x0000_0005]),
        )
        .unwrap();
        let expected = BigUint::from(5u32).modpow(&BigUint::from(0x0001_0001u32), &to_big(&modulus));
        assert_eq!(to_big(&result), expected);
        assert_eq!(engine.shift(), 1);
    }

    #[test]
    fn fermat_little_theorem_on_the_group_order() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        // a^(n-1) mod n = 1 for the prime n
        let exponent = from_big(&(to_big(&P256_ORDER) - BigUint::one()), 8);
        let result = arithmetic(
            &engine,
            &pka,
            pka.exp_mod_start(&exponent, &P256_ORDER, &[0x1234_5678, 0x9ABC_DEF0]),
        )
        .unwrap();
        assert_eq!(result, vec![1]);
    }

    #[test]
    fn division_returns_quotient_and_remainder() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let a = [0x89AB_CDEF, 0x0123_4567, 0xFEDC_BA98, 0x7654_3210];
        let d = [0x0000_1234, 0x0000_0010];

        let ticket = pka.divide_start(&a, &d).unwrap();
        engine.run_to_completion();
        let mut quotient = [0; 4];
        let mut remainder = [0; 2];
        let (q_len, r_len) = pka
            .get_divide_result(ticket, &mut quotient, Some(&mut remainder))
            .unwrap();
        assert_eq!(to_big(&quotient[..q_len]), to_big(&a) / to_big(&d));
        assert_eq!(to_big(&remainder[..r_len]), to_big(&a) % to_big(&d));
    }

    #[test]
    fn division_without_remainder_buffer() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let d = [0x0000_0003, 0x0000_0001];
        let a = from_big(&(to_big(&d) * 7u32), 2);

        let ticket = pka.divide_start(&a, &d).unwrap();
        engine.run_to_completion();
        let mut quotient = [0; 2];
        assert_eq!(pka.get_divide_result(ticket, &mut quotient, None).unwrap(), (1, 0));
        assert_eq!(quotient[0], 7);
    }

    #[test]
    fn dividend_below_divisor_is_all_remainder() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);

        let ticket = pka.divide_start(&[5, 0], &[7, 1]).unwrap();
        engine.run_to_completion();
        let mut quotient = [0xAAAA_AAAA; 2];
        let mut remainder = [0; 2];
        assert_eq!(
            pka.get_divide_result(ticket, &mut quotient, Some(&mut remainder))
                .unwrap(),
            (0, 1)
        );
        assert_eq!(remainder, [5, 0]);
        assert_eq!(quotient, [0xAAAA_AAAA; 2]);

        let ticket = pka.divide_start(&[0, 0], &[7, 1]).unwrap();
        engine.run_to_completion();
        match pka.get_divide_result(ticket, &mut quotient, Some(&mut remainder)) {
            Err((ErrorCode::ZERO, None)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn short_buffer_is_all_or_nothing() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let mut out = [0xAAAA_AAAA; 2];

        let ticket = pka.multiply_start(&[0xFFFF_FFFF; 2], &[0xFFFF_FFFF; 2]).unwrap();
        engine.run_to_completion();
        match pka.get_result(ticket, &mut out) {
            Err((ErrorCode::SIZE, None)) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(out, [0xAAAA_AAAA; 2]);

        let a = [0x0000_0000, 0x0000_0000, 0x0000_0005];
        let d = [0x0000_0001, 0x0000_0001];
        let ticket = pka.divide_start(&a, &d).unwrap();
        engine.run_to_completion();
        let mut quotient = [0xAAAA_AAAA; 1];
        let mut remainder = [0xAAAA_AAAA; 2];
        match pka.get_divide_result(ticket, &mut quotient, Some(&mut remainder)) {
            Err((ErrorCode::SIZE, None)) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(quotient, [0xAAAA_AAAA; 1]);
        assert_eq!(remainder, [0xAAAA_AAAA; 2]);
    }

    #[test]
    fn invalid_operands_have_no_side_effects() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let even = [0x0000_0002, 0x0000_0001];

        assert_eq!(pka.add_start(&[], &[1]).unwrap_err(), ErrorCode::INVAL);
        assert_eq!(pka.multiply_start(&[1; 13], &[1]).unwrap_err(), ErrorCode::INVAL);
        assert_eq!(pka.modulo_start(&[1; 25], &[1, 1]).unwrap_err(), ErrorCode::INVAL);
        assert_eq!(pka.modulo_start(&[5], &[3]).unwrap_err(), ErrorCode::INVAL);
        assert_eq!(pka.modulo_start(&[5], &[3, 0]).unwrap_err(), ErrorCode::INVAL);
        assert_eq!(pka.divide_start(&[5], &[7]).unwrap_err(), ErrorCode::INVAL);
        assert_eq!(pka.inv_mod_start(&[3], &even).unwrap_err(), ErrorCode::INVAL);
        assert_eq!(pka.exp_mod_start(&[3], &even, &[2]).unwrap_err(), ErrorCode::INVAL);
        assert_eq!(
            pka.exp_mod_start(&[3], &[1, 1], &[2, 2, 2]).unwrap_err(),
            ErrorCode::INVAL
        );

        assert_eq!(engine.launches(), 0);
        assert!(engine.ram_is_untouched());
        // The slot was never taken
        assert!(pka.add_start(&[1], &[1]).is_ok());
    }
}
