// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Wrapper type for safe pointers to static memory.

use core::ops::Deref;

/// A pointer to statically allocated mutable data such as memory mapped I/O
/// registers.
///
/// This is a simple wrapper around a raw pointer that encapsulates an unsafe
/// dereference in a safe manner. It serve the role of creating a
/// `&'static T` given a raw address and acts similarly to `extern` definitions,
/// except `StaticRef` is subject to module and crate boundaries, while
/// `extern` definitions can be imported anywhere.
#[derive(Debug)]
pub struct StaticRef<T> {
    ptr: *const T,
}

impl<T> StaticRef<T> {
    /// Create a new `StaticRef` from a raw pointer
    ///
    /// ## Safety
    ///
    /// Callers must pass in a reference to statically allocated memory which
    /// does not overlap with other values.
    pub const unsafe fn new(ptr: *const T) -> StaticRef<T> {
        StaticRef { ptr }
    }
}

impl<T> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StaticRef<T> {}

impl<T> Deref for StaticRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: `new` requires the pointer to reference static memory.
        unsafe { &*self.ptr }
    }
}

#[cfg(test)]
mod tests {
    use super::StaticRef;

    struct Registers {
        control: u32,
        status: u32,
    }

    static REGISTERS: Registers = Registers {
        control: 0x1,
        status: 0x8000_0000,
    };

    #[test]
    fn deref_reaches_the_static() {
        // SAFETY: `REGISTERS` is a static that nothing else mutates.
        let regs = unsafe { StaticRef::new(&REGISTERS as *const Registers) };
        let copy = regs;
        assert_eq!(regs.control, 0x1);
        assert_eq!(copy.status, 0x8000_0000);
    }
}
