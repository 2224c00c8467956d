// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Elliptic curve point operations.
//!
//! The sequencer reads the curve from vector B: the prime, then `a`, then
//! (for multiplication) `b`, each followed by two scratch words. Points are
//! stored as x followed by y with the same padding, and the result point is
//! written to vector D in the same format.
//!
//! ```text
//! multiply:  A = k          B = p | a | b   C = x | y   D = x | y
//! add:       A = x1 | y1    B = p | a       C = x2 | y2 D = x | y
//! ```
//!
//! After a point operation the engine leaves a fault code in its shift
//! register. Anything but `ECC_FAULT_NONE` fails the request even if the
//! result registers look valid. A result flagged as zero is the point at
//! infinity and is reported as `ZERO`.

use kernel::debug_verbose;
use kernel::hil::pka::{Engine, Operation, Vectors, ECC_FAULT_NONE, MAX_OPERAND_WORDS};
use kernel::ErrorCode;

use crate::arena::Padding;
use crate::curves::EccCurve;
use crate::pka::{Pka, Point, Ticket};

/// Affine point. Coordinates are zero extended to the engine width; only the
/// first `curve.size` words are meaningful.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcPoint {
    pub x: [u32; MAX_OPERAND_WORDS],
    pub y: [u32; MAX_OPERAND_WORDS],
}

impl EcPoint {
    pub const fn zero() -> EcPoint {
        EcPoint {
            x: [0; MAX_OPERAND_WORDS],
            y: [0; MAX_OPERAND_WORDS],
        }
    }

    pub fn new(x: &[u32], y: &[u32]) -> Result<EcPoint, ErrorCode> {
        if x.len() > MAX_OPERAND_WORDS || y.len() > MAX_OPERAND_WORDS {
            return Err(ErrorCode::INVAL);
        }
        let mut point = EcPoint::zero();
        point.x[..x.len()].copy_from_slice(x);
        point.y[..y.len()].copy_from_slice(y);
        Ok(point)
    }

    pub fn x(&self, size: usize) -> &[u32] {
        &self.x[..size.min(MAX_OPERAND_WORDS)]
    }

    pub fn y(&self, size: usize) -> &[u32] {
        &self.y[..size.min(MAX_OPERAND_WORDS)]
    }
}

impl<'a, E: Engine<'a>> Pka<'a, E> {
    fn check_curve(&self, curve: &EccCurve) -> Result<(), ErrorCode> {
        curve.check(self.max_operand_words())
    }

    /// Start computing `scalar * point` on `curve`.
    pub fn ecc_multiply_start(
        &self,
        scalar: &[u32],
        point: &EcPoint,
        curve: &EccCurve,
    ) -> Result<Ticket<Point>, ErrorCode> {
        self.check_curve(curve)?;
        if scalar.is_empty() || scalar.len() > curve.size {
            return Err(ErrorCode::INVAL);
        }
        let size = curve.size;

        let mut layout = self.layout();
        let k = layout.place(scalar.len(), Padding::Packed)?;
        let prime = layout.place(size, Padding::Scratch)?;
        let a = layout.place(size, Padding::Scratch)?;
        let b = layout.place(size, Padding::Scratch)?;
        let (px, py) = layout.place_point(size)?;
        let (rx, ry) = layout.place_point(size)?;

        let ticket = self.acquire(Operation::EccMultiply, rx, ry)?;
        self.write_operand(k, scalar);
        self.write_operand(prime, curve.prime);
        self.write_operand(a, curve.a);
        self.write_operand(b, curve.b);
        self.write_operand(px, point.x(size));
        self.write_operand(py, point.y(size));
        self.launch(
            Operation::EccMultiply,
            Vectors {
                a: k.offset,
                b: prime.offset,
                c: px.offset,
                d: rx.offset,
            },
            scalar.len(),
            size,
        );
        Ok(ticket)
    }

    /// Start computing `scalar * G` for the generator of `curve`.
    pub fn ecc_multiply_generator_start(
        &self,
        scalar: &[u32],
        curve: &EccCurve,
    ) -> Result<Ticket<Point>, ErrorCode> {
        self.check_curve(curve)?;
        self.ecc_multiply_start(scalar, &curve.generator()?, curve)
    }

    /// Start computing `p1 + p2` on `curve`. The points must be distinct and
    /// not the inverse of each other.
    pub fn ecc_add_start(
        &self,
        p1: &EcPoint,
        p2: &EcPoint,
        curve: &EccCurve,
    ) -> Result<Ticket<Point>, ErrorCode> {
        self.check_curve(curve)?;
        let size = curve.size;

        let mut layout = self.layout();
        let (x1, y1) = layout.place_point(size)?;
        let prime = layout.place(size, Padding::Scratch)?;
        let a = layout.place(size, Padding::Scratch)?;
        let (x2, y2) = layout.place_point(size)?;
        let (rx, ry) = layout.place_point(size)?;

        let ticket = self.acquire(Operation::EccAdd, rx, ry)?;
        self.write_operand(x1, p1.x(size));
        self.write_operand(y1, p1.y(size));
        self.write_operand(prime, curve.prime);
        self.write_operand(a, curve.a);
        self.write_operand(x2, p2.x(size));
        self.write_operand(y2, p2.y(size));
        self.launch(
            Operation::EccAdd,
            Vectors {
                a: x1.offset,
                b: prime.offset,
                c: x2.offset,
                d: rx.offset,
            },
            size,
            size,
        );
        Ok(ticket)
    }

    /// Retrieve the result of a point operation into `out`.
    ///
    /// - `INPROGRESS`: the engine has not finished. The ticket is handed back.
    /// - `FAIL`: the engine reported a fault.
    /// - `ZERO`: the result is the point at infinity. `out` is not written.
    pub fn get_point_result(
        &self,
        ticket: Ticket<Point>,
        out: &mut EcPoint,
    ) -> Result<(), (ErrorCode, Option<Ticket<Point>>)> {
        let done = self.complete(ticket)?;
        if done.status.ecc_fault != ECC_FAULT_NONE {
            debug_verbose!("pka: ecc fault {:#x}", done.status.ecc_fault);
            return Err((ErrorCode::FAIL, None));
        }
        if done.status.result_is_zero {
            return Err((ErrorCode::ZERO, None));
        }

        let size = done.result.len;
        *out = EcPoint::zero();
        self.read_words(done.result.offset, &mut out.x[..size]);
        self.read_words(done.aux.offset, &mut out.y[..size]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{NIST_P192, NIST_P256};
    use crate::test::sim::{from_big, to_big, SimEngine};
    use num_bigint::BigUint;
    use num_traits::One;

    fn point<'a>(
        engine: &SimEngine<'a>,
        pka: &Pka<'a, SimEngine<'a>>,
        ticket: Result<Ticket<Point>, ErrorCode>,
    ) -> Result<EcPoint, ErrorCode> {
        let ticket = ticket?;
        engine.run_to_completion();
        let mut out = EcPoint::zero();
        pka.get_point_result(ticket, &mut out)
            .map_err(|(err, _)| err)?;
        Ok(out)
    }

    fn on_curve(curve: &EccCurve, point: &EcPoint) -> bool {
        let p = to_big(curve.prime);
        let (x, y) = (to_big(point.x(curve.size)), to_big(point.y(curve.size)));
        (&y * &y) % &p == (&x * &x * &x + to_big(curve.a) * &x + to_big(curve.b)) % &p
    }

    #[test]
    fn one_times_generator_is_generator() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);

        for curve in [&NIST_P256, &NIST_P192] {
            let g = point(&engine, &pka, pka.ecc_multiply_generator_start(&[1], curve)).unwrap();
            assert_eq!(g, curve.generator().unwrap());
        }
    }

    #[test]
    fn order_times_generator_is_infinity() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);

        for curve in [&NIST_P256, &NIST_P192] {
            assert_eq!(
                point(&engine, &pka, pka.ecc_multiply_generator_start(curve.n, curve)),
                Err(ErrorCode::ZERO)
            );
        }
    }

    #[test]
    fn multiples_stay_on_the_curve() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);

        for curve in [&NIST_P256, &NIST_P192] {
            let g = curve.generator().unwrap();
            let two_g = point(&engine, &pka, pka.ecc_multiply_start(&[2], &g, curve)).unwrap();
            assert!(on_curve(curve, &two_g));

            // G + 2G = 3G
            let sum = point(&engine, &pka, pka.ecc_add_start(&g, &two_g, curve)).unwrap();
            let three_g = point(&engine, &pka, pka.ecc_multiply_start(&[3], &g, curve)).unwrap();
            assert!(on_curve(curve, &sum));
            assert_eq!(sum, three_g);
        }
    }

    #[test]
    fn multiplication_distributes_over_scalars() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let curve = &NIST_P256;
        let a = [0x0BAD_F00D, 0x1234_5678, 0x0000_0001];
        let b = [0xCAFE_BABE, 0x8765_4321];

        let a_g = point(&engine, &pka, pka.ecc_multiply_generator_start(&a, curve)).unwrap();
        let b_g = point(&engine, &pka, pka.ecc_multiply_generator_start(&b, curve)).unwrap();
        let sum = point(&engine, &pka, pka.ecc_add_start(&a_g, &b_g, curve)).unwrap();

        let scalar = from_big(&(to_big(&a) + to_big(&b)), 3);
        let expected = point(&engine, &pka, pka.ecc_multiply_generator_start(&scalar, curve)).unwrap();
        assert_eq!(sum, expected);
    }

    #[test]
    fn fault_register_fails_the_request() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);

        engine.inject_fault(0x0000_0007);
        assert_eq!(
            point(&engine, &pka, pka.ecc_multiply_generator_start(&[5], &NIST_P256)),
            Err(ErrorCode::FAIL)
        );

        // Only the faulted request is affected
        assert!(point(&engine, &pka, pka.ecc_multiply_generator_start(&[5], &NIST_P256)).is_ok());
    }

    #[test]
    fn point_results_need_completion() {
        let engine = SimEngine::new(4);
        let pka = Pka::new(&engine);
        let mut out = EcPoint::zero();

        let ticket = pka
            .ecc_multiply_generator_start(&[9], &NIST_P192)
            .unwrap();
        engine.advance();
        let ticket = match pka.get_point_result(ticket, &mut out) {
            Err((ErrorCode::INPROGRESS, Some(ticket))) => ticket,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(out, EcPoint::zero());
        engine.run_to_completion();
        assert!(pka.get_point_result(ticket, &mut out).is_ok());
        assert!(on_curve(&NIST_P192, &out));
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let g = NIST_P192.generator().unwrap();

        let wide = EccCurve {
            size: 13,
            ..NIST_P256
        };
        assert_eq!(
            pka.ecc_multiply_start(&[1], &g, &wide).unwrap_err(),
            ErrorCode::INVAL
        );
        assert_eq!(
            pka.ecc_multiply_start(&[1; 7], &g, &NIST_P192).unwrap_err(),
            ErrorCode::INVAL
        );
        assert_eq!(
            pka.ecc_multiply_generator_start(&[], &NIST_P192).unwrap_err(),
            ErrorCode::INVAL
        );
        assert_eq!(
            pka.ecc_add_start(&g, &g, &wide).unwrap_err(),
            ErrorCode::INVAL
        );
        assert_eq!(engine.launches(), 0);
        assert!(engine.ram_is_untouched());
    }

    #[test]
    fn order_minus_one_negates_the_generator() {
        let engine = SimEngine::new(1);
        let pka = Pka::new(&engine);
        let curve = &NIST_P256;
        let scalar = from_big(&(to_big(curve.n) - BigUint::one()), 8);

        let neg = point(&engine, &pka, pka.ecc_multiply_generator_start(&scalar, curve)).unwrap();
        assert_eq!(neg.x(8), curve.x);
        assert_eq!(
            to_big(neg.y(8)),
            to_big(curve.prime) - to_big(curve.y)
        );
    }
}
