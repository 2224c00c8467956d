// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Hardware agnostic interface for a monotonic counter.
//!
//! The public key accelerator stack only uses time to benchmark protocol
//! runs; no correctness decision depends on it.

pub trait Time {
    /// Returns the current time in hardware clock units.
    fn now(&self) -> u32;

    /// Returns the wrap-around value of the clock.
    ///
    /// The maximum value of the clock, at which `now` will wrap around. I.e.,
    /// this should return `u32::MAX` on a 32-bit clock, or `(1 << 24) - 1`
    /// for a 24-bit clock.
    fn max_tics(&self) -> u32;

    /// Returns the clock frequency in Hz.
    fn frequency(&self) -> u32;

    /// Number of tics elapsed since `reference`, accounting for one
    /// wrap-around of the clock.
    fn tics_since(&self, reference: u32) -> u32 {
        let now = self.now();
        if now >= reference {
            now - reference
        } else {
            (self.max_tics() - reference)
                .wrapping_add(now)
                .wrapping_add(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Time;
    use core::cell::Cell;

    struct Counter24 {
        value: Cell<u32>,
    }

    impl Time for Counter24 {
        fn now(&self) -> u32 {
            self.value.get()
        }

        fn max_tics(&self) -> u32 {
            (1 << 24) - 1
        }

        fn frequency(&self) -> u32 {
            32768
        }
    }

    #[test]
    fn tics_since_without_wrap() {
        let counter = Counter24 {
            value: Cell::new(1500),
        };
        assert_eq!(counter.tics_since(1000), 500);
    }

    #[test]
    fn tics_since_across_wrap() {
        let counter = Counter24 {
            value: Cell::new(10),
        };
        assert_eq!(counter.tics_since((1 << 24) - 5), 15);
    }
}
