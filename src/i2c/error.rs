// Licensed under the Apache-2.0 license

//! Error type returned by the I2C device handler.
//!
//! Driver failures are passed through unchanged and tagged with the phase
//! that produced them, so a caller can tell a failed register-address write
//! from a failed payload write, or a failed bus teardown from a failed
//! device detach.

use core::fmt;
use embedded_hal::i2c::ErrorKind;

/// Handler lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    Closed,
}

/// Step of a handler operation that issued the failing driver call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    CreateBus,
    AttachDevice,
    DeleteBus,
    DetachDevice,
    Transmit,
    Receive,
    TransmitReceive,
    /// Register-address byte of a register write.
    RegisterAddress,
    /// Data bytes of a register write.
    Payload,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::CreateBus => "bus creation",
            Phase::AttachDevice => "device attach",
            Phase::DeleteBus => "bus deletion",
            Phase::DetachDevice => "device detach",
            Phase::Transmit => "transmit",
            Phase::Receive => "receive",
            Phase::TransmitReceive => "transmit-receive",
            Phase::RegisterAddress => "register address write",
            Phase::Payload => "register payload write",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// SCL or SDA pin left unconfigured.
    InvalidArgument,
    /// Operation not allowed in the handler's current lifecycle state.
    InvalidState(Lifecycle),
    /// The bus driver reported a failure.
    Driver { phase: Phase, source: E },
    /// Recording the scan result or writing the scan report failed.
    Report,
}

impl<E> Error<E> {
    pub(crate) fn driver(phase: Phase) -> impl FnOnce(E) -> Self {
        move |source| Error::Driver { phase, source }
    }

    /// Phase of a driver failure.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Error::Driver { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// The untouched driver error, if this is a driver failure.
    #[must_use]
    pub fn driver_error(&self) -> Option<&E> {
        match self {
            Error::Driver { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid argument: SCL and SDA must be set"),
            Error::InvalidState(state) => write!(f, "operation not allowed while {state:?}"),
            Error::Driver { phase, source } => write!(f, "{phase} failed: {source:?}"),
            Error::Report => f.write_str("failed to write scan report"),
        }
    }
}

impl<E> embedded_hal::i2c::Error for Error<E>
where
    E: embedded_hal::i2c::Error,
{
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Driver { source, .. } => source.kind(),
            _ => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{Error as _, NoAcknowledgeSource};

    #[test]
    fn test_driver_error_keeps_kind() {
        let nack = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);
        let err: Error<ErrorKind> = Error::driver(Phase::Receive)(nack);

        assert_eq!(err.kind(), nack);
        assert_eq!(err.phase(), Some(Phase::Receive));
        assert_eq!(err.driver_error(), Some(&nack));
    }

    #[test]
    fn test_local_errors_map_to_other() {
        let invalid: Error<ErrorKind> = Error::InvalidArgument;
        let state: Error<ErrorKind> = Error::InvalidState(Lifecycle::Closed);

        assert_eq!(invalid.kind(), ErrorKind::Other);
        assert_eq!(state.kind(), ErrorKind::Other);
        assert_eq!(state.phase(), None);
        assert_eq!(state.driver_error(), None);
    }

    #[test]
    fn test_display_names_phase() {
        let err: Error<ErrorKind> = Error::Driver {
            phase: Phase::RegisterAddress,
            source: ErrorKind::Bus,
        };
        assert_eq!(err.to_string(), "register address write failed: Bus");
    }
}
