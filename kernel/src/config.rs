// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Data structure for storing compile-time configuration options.
//!
//! Configuration is a typed `const` object rather than scattered `#[cfg]`
//! attributes. All code paths are type-checked by the compiler, even those
//! that end up disabled, and after type-checking the compiler folds the
//! constants so a disabled option has no cost in the resulting binary.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, modify the relevant values in the `CONFIG`
/// constant object defined at the end of this file.
pub struct Config {
    /// Whether the accelerator driver and the protocols built on it should
    /// trace every primitive operation to the debug output.
    ///
    /// If enabled, each operand layout, launch, retrieval and protocol step
    /// is printed with `debug_verbose!`, together with the tick count of
    /// completed protocol runs.
    pub trace_pka: bool,
}

/// A unique instance of `Config` where compile-time configuration options are
/// defined. This is the only location where `#[cfg(x)]` is used to configure
/// code based on Cargo features.
pub const CONFIG: Config = Config {
    trace_pka: cfg!(feature = "trace_pka"),
};
