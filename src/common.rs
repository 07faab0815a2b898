// Licensed under the Apache-2.0 license

//! Logging hooks shared by the driver modules.
//!
//! Drivers take a [`Logger`] as a defaulted generic parameter so that builds
//! without a console pay nothing for log calls. [`NoOpLogger`] is that default.
//! With the `log` feature, [`LogFacade`] forwards everything to the `log` crate.

use core::fmt::{self, Write};

/// Capacity of a single formatted log line.
pub const LOG_LINE_CAPACITY: usize = 96;

/// Bounded, allocation-free buffer for one log message.
pub type LogLine = heapless::String<LOG_LINE_CAPACITY>;

/// Minimal logging sink used by the drivers.
pub trait Logger {
    fn debug(&mut self, msg: &str);
    fn error(&mut self, msg: &str);
}

/// Logger that discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _msg: &str) {}
    fn error(&mut self, _msg: &str) {}
}

/// Logger forwarding to the `log` facade under the `i2c_handler` target.
#[cfg(feature = "log")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFacade;

#[cfg(feature = "log")]
impl Logger for LogFacade {
    fn debug(&mut self, msg: &str) {
        log::debug!(target: "i2c_handler", "{msg}");
    }

    fn error(&mut self, msg: &str) {
        log::error!(target: "i2c_handler", "{msg}");
    }
}

/// Format `args` into a [`LogLine`].
///
/// Fragments that no longer fit are dropped. A log line never fails the bus
/// operation that produced it.
#[must_use]
pub fn format_line(args: fmt::Arguments<'_>) -> LogLine {
    let mut line = LogLine::new();
    let _ = line.write_fmt(args);
    line
}
