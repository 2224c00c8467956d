// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Hardware independent driver for public key accelerators.
//!
//! The crate is layered bottom up:
//!
//! - [`arena`] computes where operands go in the engine's operand RAM.
//! - [`pka`] owns the single engine slot and hands out [`pka::Ticket`]s.
//! - [`bignum`] and [`ecc`] implement the primitive operations as
//!   `*_start()` / `get_*_result()` pairs on top of it.
//! - [`ecc_protocol`] chains primitives into ECDH and ECDSA.

#![forbid(unsafe_code)]
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod arena;
pub mod bignum;
pub mod curves;
pub mod ecc;
pub mod ecc_protocol;
pub mod pka;

#[cfg(test)]
mod test;

pub use crate::pka::{Pka, PkaClient, Ticket};
