// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Test doubles for the accelerator driver.

use core::cell::Cell;

use kernel::hil::time::Time;

use crate::pka::PkaClient;


/// Completion notifier counting how often it was woken.
pub(crate) struct Flag {
    count: Cell<usize>,
}

impl Flag {
    pub(crate) fn new() -> Flag {
        Flag {
            count: Cell::new(0),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count.get()
    }
}

impl PkaClient for Flag {
    fn operation_complete(&self) {
        self.count.set(self.count.get() + 1);
    }
}

/// Clock advancing by a fixed amount every time it is read.
pub(crate) struct TickCounter {
    now: Cell<u32>,
    increment: u32,
}

impl TickCounter {
    pub(crate) fn new(start: u32, increment: u32) -> TickCounter {
        TickCounter {
            now: Cell::new(start),
            increment,
        }
    }
}

impl Time for TickCounter {
    fn now(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.increment));
        now
    }

    fn max_tics(&self) -> u32 {
        u32::MAX
    }

    fn frequency(&self) -> u32 {
        32768
    }
}
