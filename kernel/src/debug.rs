// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Support for in-kernel debugging.
//!
//! For printing, this module provides the `debug!` macro, which behaves like
//! `println!`. Messages go to the single writer registered with
//! [`set_debug_writer`]; when no writer is registered they are dropped.
//!
//! `debug_verbose!` additionally prints the message counter and the source
//! location, and only emits output when `CONFIG.trace_pka` is enabled.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! debug!("Yes the code gets here with value {}", i);
//! debug_verbose!("got here"); // includes message count, file, and line
//! ```
//!
//! ```text
//! Yes the code gets here with value 42
//! TOCK_DEBUG(0): /tock/capsules/pka/src/ecc_protocol.rs:24: got here
//! ```

use core::fmt::{self, Arguments, Write};
use core::ptr;
use core::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

/// A sink for debug output, usually a console UART owned by the board.
pub trait DebugWriter {
    /// Write a chunk of formatted text. Implementations may drop output they
    /// cannot buffer.
    fn write_str(&self, s: &str);
}

static DEBUG_WRITER: AtomicPtr<&'static (dyn DebugWriter + Sync)> =
    AtomicPtr::new(ptr::null_mut());

static DEBUG_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Register the writer that receives all `debug!` output, replacing any
/// previously registered writer.
pub fn set_debug_writer(writer: &'static &'static (dyn DebugWriter + Sync)) {
    DEBUG_WRITER.store(ptr::from_ref(writer).cast_mut(), Ordering::Release);
}

fn debug_writer() -> Option<&'static (dyn DebugWriter + Sync)> {
    let writer = DEBUG_WRITER.load(Ordering::Acquire);
    // SAFETY: the pointer was created from a `&'static &'static dyn
    // DebugWriter` in `set_debug_writer` and is never freed.
    unsafe { writer.as_ref() }.copied()
}

struct Output(&'static (dyn DebugWriter + Sync));

impl Write for Output {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

pub fn debug_println(args: Arguments) {
    if let Some(writer) = debug_writer() {
        let mut output = Output(writer);
        let _ = output.write_fmt(args);
        let _ = output.write_str("\r\n");
    }
}

pub fn debug_verbose_println(args: Arguments, file_line: &(&'static str, u32)) {
    let count = DEBUG_COUNT.fetch_add(1, Ordering::Relaxed);

    if let Some(writer) = debug_writer() {
        let mut output = Output(writer);
        let (file, line) = *file_line;
        let _ = output.write_fmt(format_args!("TOCK_DEBUG({}): {}:{}: ", count, file, line));
        let _ = output.write_fmt(args);
        let _ = output.write_str("\r\n");
    }
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        $crate::debug!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_println(format_args!($msg));
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_println(format_args!($fmt, $($arg)+));
    });
}

/// In-kernel `println()` debugging that also prints the message count and
/// source location. Compiled to nothing unless `CONFIG.trace_pka` is set.
#[macro_export]
macro_rules! debug_verbose {
    () => ({
        // Allow an empty debug_verbose!() to print the location when hit
        $crate::debug_verbose!("")
    });
    ($msg:expr $(,)?) => ({
        if $crate::config::CONFIG.trace_pka {
            $crate::debug::debug_verbose_println(format_args!($msg), {
                static _FILE_LINE: (&'static str, u32) = (file!(), line!());
                &_FILE_LINE
            })
        }
    });
    ($fmt:expr, $($arg:tt)+) => ({
        if $crate::config::CONFIG.trace_pka {
            $crate::debug::debug_verbose_println(format_args!($fmt, $($arg)+), {
                static _FILE_LINE: (&'static str, u32) = (file!(), line!());
                &_FILE_LINE
            })
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::boxed::Box;
    use std::string::String;
    use std::sync::Mutex;

    struct Capture(Mutex<String>);

    impl DebugWriter for Capture {
        fn write_str(&self, s: &str) {
            self.0.lock().unwrap().push_str(s);
        }
    }

    #[test]
    fn messages_reach_registered_writer() {
        let capture: &'static Capture = Box::leak(Box::new(Capture(Mutex::new(String::new()))));
        let writer: &'static &'static (dyn DebugWriter + Sync) = Box::leak(Box::new(
            capture as &'static (dyn DebugWriter + Sync),
        ));
        set_debug_writer(writer);

        debug!("engine revision {:#x}", 0x0102u32);

        let text = capture.0.lock().unwrap();
        assert!(text.contains("engine revision 0x102\r\n"));
    }
}
