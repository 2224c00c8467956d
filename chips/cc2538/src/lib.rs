// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral implementations for the TI CC2538 SoC used by the public key
//! accelerator stack.

#![no_std]
#![crate_name = "cc2538"]
#![crate_type = "rlib"]

// This is used to run the tests on a host
#[cfg(test)]
extern crate std;

pub mod pka;
pub mod sleep_timer;
