// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Core crate shared by the public key accelerator chips and capsules.
//!
//! The kernel crate holds the Hardware Interface Layer (HIL) definitions for
//! the accelerator and the time source, the standard error codes, the
//! compile-time configuration and the `debug!` facility. Most `unsafe` code
//! is in this crate.

#![warn(unreachable_pub)]
#![no_std]

// This is used to run the tests on a host
#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
#[macro_use]
pub mod debug;
pub mod errorcode;
pub mod hil;
pub mod utilities;

pub use crate::errorcode::ErrorCode;
