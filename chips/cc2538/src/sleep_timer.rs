// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Sleep Timer
//!
//! Free running 32-bit counter clocked from the 32 kHz oscillator. Used as the
//! monotonic time source when benchmarking accelerator protocols.
//!
//! The counter value is split over four byte-wide registers. Reading `ST0`
//! latches `ST1` to `ST3`, so `ST0` must be read first.

use kernel::hil::time::Time;
use kernel::utilities::registers::interfaces::Readable;
use kernel::utilities::registers::{register_structs, ReadOnly};
use kernel::utilities::StaticRef;

const SLEEP_TIMER_BASE: StaticRef<SleepTimerRegisters> =
    unsafe { StaticRef::new(0x400D_5040 as *const SleepTimerRegisters) };

register_structs! {
    SleepTimerRegisters {
        (0x00 => st0: ReadOnly<u32>),
        (0x04 => st1: ReadOnly<u32>),
        (0x08 => st2: ReadOnly<u32>),
        (0x0C => st3: ReadOnly<u32>),
        (0x10 => @END),
    }
}

pub struct SleepTimer {
    registers: StaticRef<SleepTimerRegisters>,
}

impl SleepTimer {
    pub const fn new() -> SleepTimer {
        SleepTimer {
            registers: SLEEP_TIMER_BASE,
        }
    }
}

impl Time for SleepTimer {
    fn now(&self) -> u32 {
        let st0 = self.registers.st0.get() & 0xFF;
        let st1 = self.registers.st1.get() & 0xFF;
        let st2 = self.registers.st2.get() & 0xFF;
        let st3 = self.registers.st3.get() & 0xFF;
        (st3 << 24) | (st2 << 16) | (st1 << 8) | st0
    }

    fn max_tics(&self) -> u32 {
        u32::MAX
    }

    fn frequency(&self) -> u32 {
        32768
    }
}
