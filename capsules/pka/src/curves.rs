// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Named short Weierstrass curves, `y^2 = x^3 + a*x + b (mod p)`.
//!
//! All values are stored least significant word first, as the engine
//! expects them.

use kernel::ErrorCode;

use crate::ecc::EcPoint;

/// Domain parameters of a curve.
#[derive(Debug, PartialEq, Eq)]
pub struct EccCurve {
    pub name: &'static str,
    /// Width of every parameter, in words.
    pub size: usize,
    pub prime: &'static [u32],
    /// Order of the generator.
    pub n: &'static [u32],
    pub a: &'static [u32],
    pub b: &'static [u32],
    /// Generator x coordinate.
    pub x: &'static [u32],
    /// Generator y coordinate.
    pub y: &'static [u32],
}

impl EccCurve {
    /// Reject descriptors the engine cannot handle.
    pub fn check(&self, max_words: usize) -> Result<(), ErrorCode> {
        let size = self.size;
        if size == 0 || size > max_words {
            return Err(ErrorCode::INVAL);
        }
        let params = [self.prime, self.n, self.a, self.b, self.x, self.y];
        if params.iter().any(|param| param.len() != size) {
            return Err(ErrorCode::INVAL);
        }
        Ok(())
    }

    pub fn generator(&self) -> Result<EcPoint, ErrorCode> {
        EcPoint::new(self.x, self.y)
    }
}

/// NIST P-256 (secp256r1).
pub static NIST_P256: EccCurve = EccCurve {
    name: "NIST P-256",
    size: 8,
    prime: &[
        0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0x00000000, 0x00000000, 0x00000000, 0x00000001,
        0xFFFFFFFF,
    ],
    n: &[
        0xFC632551, 0xF3B9CAC2, 0xA7179E84, 0xBCE6FAAD, 0xFFFFFFFF, 0xFFFFFFFF, 0x00000000,
        0xFFFFFFFF,
    ],
    a: &[
        0xFFFFFFFC, 0xFFFFFFFF, 0xFFFFFFFF, 0x00000000, 0x00000000, 0x00000000, 0x00000001,
        0xFFFFFFFF,
    ],
    b: &[
        0x27D2604B, 0x3BCE3C3E, 0xCC53B0F6, 0x651D06B0, 0x769886BC, 0xB3EBBD55, 0xAA3A93E7,
        0x5AC635D8,
    ],
    x: &[
        0xD898C296, 0xF4A13945, 0x2DEB33A0, 0x77037D81, 0x63A440F2, 0xF8BCE6E5, 0xE12C4247,
        0x6B17D1F2,
    ],
    y: &[
        0x37BF51F5, 0xCBB64068, 0x6B315ECE, 0x2BCE3357, 0x7C0F9E16, 0x8EE7EB4A, 0xFE1A7F9B,
        0x4FE342E2,
    ],
};

/// NIST P-192 (secp192r1).
pub static NIST_P192: EccCurve = EccCurve {
    name: "NIST P-192",
    size: 6,
    prime: &[
        0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFE, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF,
    ],
    n: &[
        0xB4D22831, 0x146BC9B1, 0x99DEF836, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF,
    ],
    a: &[
        0xFFFFFFFC, 0xFFFFFFFF, 0xFFFFFFFE, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF,
    ],
    b: &[
        0xC146B9B1, 0xFEB8DEEC, 0x72243049, 0x0FA7E9AB, 0xE59C80E7, 0x64210519,
    ],
    x: &[
        0x82FF1012, 0xF4FF0AFD, 0x43A18800, 0x7CBF20EB, 0xB03090F6, 0x188DA80E,
    ],
    y: &[
        0x1E794811, 0x73F977A1, 0x6B24CDD5, 0x631011ED, 0xFFC8DA78, 0x07192B95,
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sim::to_big;
    use num_bigint::BigUint;

    fn on_curve(curve: &EccCurve, x: &[u32], y: &[u32]) -> bool {
        let p = to_big(curve.prime);
        let (x, y) = (to_big(x), to_big(y));
        let lhs = (&y * &y) % &p;
        let rhs = (&x * &x * &x + to_big(curve.a) * &x + to_big(curve.b)) % &p;
        lhs == rhs
    }

    #[test]
    fn generators_lie_on_their_curves() {
        for curve in [&NIST_P256, &NIST_P192] {
            assert!(on_curve(curve, curve.x, curve.y), "{}", curve.name);
        }
    }

    #[test]
    fn a_is_minus_three() {
        for curve in [&NIST_P256, &NIST_P192] {
            assert_eq!(
                to_big(curve.a) + BigUint::from(3u32),
                to_big(curve.prime),
                "{}",
                curve.name
            );
        }
    }

    #[test]
    fn descriptors_are_consistent() {
        assert_eq!(NIST_P256.check(12), Ok(()));
        assert_eq!(NIST_P192.check(12), Ok(()));
        assert_eq!(NIST_P256.check(6), Err(ErrorCode::INVAL));

        let truncated = EccCurve {
            n: &NIST_P256.n[..7],
            ..NIST_P256
        };
        assert_eq!(truncated.check(12), Err(ErrorCode::INVAL));
    }
}
