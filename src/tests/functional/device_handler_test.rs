// Licensed under the Apache-2.0 license

//! On-target smoke run of the device handler against a real bus.
//!
//! Results go to any `embedded_io::Write` sink, usually the debug UART:
//!
//! ```rust,ignore
//! let driver = HalDriver::new(i2c);
//! let config = I2cDeviceConfigBuilder::new().address(0x50).pins(21, 22).build();
//! let driver = run_device_handler_tests(&mut uart, driver, config, 0x00);
//! ```

use crate::i2c::common::I2cDeviceConfig;
use crate::i2c::device_handler::I2cDeviceHandler;
use crate::i2c::traits::I2cMasterDriver;
use core::fmt::Debug;
use embedded_io::Write;

/// Run every handler operation once against the device in `config`.
///
/// `register` is read back with a combined transaction, so pick one that is
/// safe to read. Returns the driver so the bus can be reused afterwards.
pub fn run_device_handler_tests<D, W>(
    out: &mut W,
    driver: D,
    config: I2cDeviceConfig,
    register: u8,
) -> D
where
    D: I2cMasterDriver,
    W: Write,
{
    let _ = writeln!(out, "\r\n=== I2C Device Handler Tests ===\r");

    let mut handler = I2cDeviceHandler::new(driver, config);
    let result = handler.init();
    report(out, "init", result);

    if handler.is_ready() {
        let _ = writeln!(out, "Scanning bus...\r");
        let result = handler.print_device_scan(out);
        report(out, "device scan", result);

        let result = handler.read(&mut []);
        report(out, "zero-length read", result);

        let mut value = [0u8; 1];
        let result = handler.read_from_register(register, &mut value);
        if result.is_ok() {
            let [byte] = value;
            let _ = writeln!(out, "register 0x{register:02X} = 0x{byte:02X}\r");
        }
        report(out, "read from register", result);

        let result = handler.read(&mut value);
        report(out, "read", result);

        let result = handler.delete();
        report(out, "delete", result);
    }

    let _ = writeln!(out, "\r\n=== I2C Device Handler Tests Done ===\r");
    handler.release()
}

fn report<W: Write, E: Debug>(out: &mut W, name: &str, result: Result<(), E>) {
    let _ = write!(out, "Testing {name}... ");
    let _ = match result {
        Ok(()) => writeln!(out, "PASSED\r"),
        Err(e) => writeln!(out, "FAILED: {e:?}\r"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::common::I2cDeviceConfigBuilder;
    use crate::i2c::hal_driver::HalDriver;
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

    /// Bus with one device at 0x50 that always reads back 0x42.
    struct OneDeviceBus;

    impl ErrorType for OneDeviceBus {
        type Error = ErrorKind;
    }

    impl I2c for OneDeviceBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if address != 0x50 {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations.iter_mut() {
                if let Operation::Read(buffer) = op {
                    buffer.fill(0x42);
                }
            }
            Ok(())
        }
    }

    struct Console(String);

    impl embedded_io::ErrorType for Console {
        type Error = core::convert::Infallible;
    }

    impl embedded_io::Write for Console {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.0.push_str(std::str::from_utf8(buf).unwrap());
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_run_against_present_device() {
        let mut console = Console(String::new());
        let config = I2cDeviceConfigBuilder::new().address(0x50).pins(21, 22).build();

        run_device_handler_tests(&mut console, HalDriver::new(OneDeviceBus), config, 0x00);

        let text = console.0;
        assert!(text.contains("Device Address 0x50 Responded\n"));
        assert!(text.contains("register 0x00 = 0x42"));
        assert_eq!(text.matches("PASSED").count(), 6);
        assert!(!text.contains("FAILED"));
    }

    #[test]
    fn test_run_reports_failed_init() {
        let mut console = Console(String::new());
        let config = I2cDeviceConfigBuilder::new().address(0x50).build();

        run_device_handler_tests(&mut console, HalDriver::new(OneDeviceBus), config, 0x00);

        assert!(console.0.contains("Testing init... FAILED: InvalidArgument"));
        assert!(!console.0.contains("Scanning bus"));
    }

    #[test]
    fn test_run_reports_missing_device() {
        let mut console = Console(String::new());
        let config = I2cDeviceConfigBuilder::new().address(0x51).pins(21, 22).build();

        run_device_handler_tests(&mut console, HalDriver::new(OneDeviceBus), config, 0x00);

        assert!(console.0.contains("Testing read from register... FAILED"));
        assert!(console.0.contains("Testing delete... PASSED"));
    }
}
