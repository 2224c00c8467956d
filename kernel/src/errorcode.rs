// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Standard error enum for public key accelerator operations.

/// Outcome codes of accelerator requests and the protocols built on them.
///
/// Success is expressed as `Ok(..)` and compare outcomes as
/// [`core::cmp::Ordering`], so this enum only carries the cases a caller has
/// to react to. They fall into distinct classes:
///
/// - caller misuse ([`ErrorCode::INVAL`]), rejected synchronously with no
///   hardware side effects;
/// - contention ([`ErrorCode::BUSY`]), safe to retry later;
/// - not yet ready ([`ErrorCode::INPROGRESS`]), which is not an error;
/// - a degenerate but valid result ([`ErrorCode::ZERO`]);
/// - an undersized output buffer ([`ErrorCode::SIZE`]), nothing is copied;
/// - a hardware reported fault ([`ErrorCode::FAIL`]), unrecoverable for the
///   request;
/// - an expected cryptographic rejection ([`ErrorCode::BADSIG`]);
/// - a run given up by its owner ([`ErrorCode::CANCEL`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// Generic failure condition, reported by the engine's fault register
    FAIL = 0,
    /// The engine is processing another request; retry
    BUSY = 1,
    /// An invalid parameter was passed
    INVAL = 5,
    /// The supplied buffer is too small to hold the result
    SIZE = 6,
    /// Operation canceled by a call
    CANCEL = 7,
    /// The operation has not completed yet
    INPROGRESS = 13,
    /// The result of the operation is zero (or the point at infinity)
    ZERO = 14,
    /// The signature does not match the hash and public key
    BADSIG = 15,
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

impl TryFrom<usize> for ErrorCode {
    type Error = ();

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::FAIL),
            1 => Ok(ErrorCode::BUSY),
            5 => Ok(ErrorCode::INVAL),
            6 => Ok(ErrorCode::SIZE),
            7 => Ok(ErrorCode::CANCEL),
            13 => Ok(ErrorCode::INPROGRESS),
            14 => Ok(ErrorCode::ZERO),
            15 => Ok(ErrorCode::BADSIG),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usize_conversion_is_reversible() {
        for code in [
            ErrorCode::FAIL,
            ErrorCode::BUSY,
            ErrorCode::INVAL,
            ErrorCode::INPROGRESS,
            ErrorCode::ZERO,
            ErrorCode::SIZE,
            ErrorCode::CANCEL,
            ErrorCode::BADSIG,
        ] {
            assert_eq!(ErrorCode::try_from(usize::from(code)), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(2), Err(()));
    }

    #[test]
    fn shared_codes_keep_their_values() {
        assert_eq!(usize::from(ErrorCode::FAIL), 0);
        assert_eq!(usize::from(ErrorCode::BUSY), 1);
        assert_eq!(usize::from(ErrorCode::INVAL), 5);
        assert_eq!(usize::from(ErrorCode::SIZE), 6);
        assert_eq!(usize::from(ErrorCode::CANCEL), 7);
    }
}
