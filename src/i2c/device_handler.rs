// Licensed under the Apache-2.0 license

//! Single-device I2C master handler.
//!
//! [`I2cDeviceHandler`] configures one bus and one device through an
//! [`I2cMasterDriver`] and exposes blocking read, write and register-access
//! helpers on top of it. Every data operation is one driver call (two for
//! [`I2cDeviceHandler::write_to_register`]) guarded by a lifecycle check and
//! a zero-length short-circuit.
//!
//! ```rust,ignore
//! let config = I2cDeviceConfigBuilder::new()
//!     .address(0x50)
//!     .pins(21, 22)
//!     .speed(I2cSpeed::Standard)
//!     .timeout(Timeout::millis(100))
//!     .build();
//!
//! let mut eeprom = I2cDeviceHandler::new(driver, config);
//! eeprom.init()?;
//! let mut page = [0u8; 16];
//! eeprom.read_from_register(0x00, &mut page)?;
//! eeprom.delete()?;
//! ```

use crate::common::{format_line, Logger, NoOpLogger};
use crate::i2c::common::{BusConfig, DeviceConfig, I2cDeviceConfig, Timeout};
use crate::i2c::error::{Error, Lifecycle, Phase};
use crate::i2c::traits::{I2cBusDriver, I2cMasterDriver};
use core::fmt::Debug;
use embedded_io::Write;

/// Timeout for each probe of a bus scan.
pub const SCAN_PROBE_TIMEOUT: Timeout = Timeout::millis(1);

/// Highest address probed by a scan. 0xFF is never probed.
pub const SCAN_LAST_ADDRESS: u8 = 0xFE;

/// Number of probes in one scan.
pub const SCAN_PROBE_COUNT: usize = SCAN_LAST_ADDRESS as usize + 1;

/// Addresses that acknowledged during a scan, in ascending order.
pub type ScanResult = heapless::Vec<u8, SCAN_PROBE_COUNT>;

type HandlerResult<T, D> = Result<T, Error<<D as I2cBusDriver>::Error>>;

/// Driver-owned resources of a ready handler.
struct Attached<B, V> {
    bus_config: BusConfig,
    bus: B,
    device_config: DeviceConfig,
    device: V,
}

enum State<B, V> {
    Uninitialized,
    Ready(Attached<B, V>),
    Closed,
}

impl<B, V> State<B, V> {
    fn lifecycle(&self) -> Lifecycle {
        match self {
            State::Uninitialized => Lifecycle::Uninitialized,
            State::Ready(_) => Lifecycle::Ready,
            State::Closed => Lifecycle::Closed,
        }
    }

    fn ready(&self) -> Result<&Attached<B, V>, Lifecycle> {
        match self {
            State::Ready(attached) => Ok(attached),
            other => Err(other.lifecycle()),
        }
    }
}

/// Log a driver failure and wrap it with its phase.
fn report<L: Logger, E: Debug>(logger: &mut L, phase: Phase, source: E) -> Error<E> {
    logger.error(&format_line(format_args!("{phase} failed: {source:?}")));
    Error::driver(phase)(source)
}

/// One I2C device on one master bus.
///
/// The handler owns its driver and, once initialized, the bus and device
/// handles the driver returned. Not safe for concurrent use; every operation
/// takes `&mut self`.
pub struct I2cDeviceHandler<D: I2cMasterDriver, L: Logger = NoOpLogger> {
    driver: D,
    config: I2cDeviceConfig,
    logger: L,
    state: State<D::Bus, D::Device>,
}

impl<D: I2cMasterDriver> I2cDeviceHandler<D> {
    #[must_use]
    pub fn new(driver: D, config: I2cDeviceConfig) -> Self {
        Self::with_logger(driver, config, NoOpLogger)
    }
}

impl<D: I2cMasterDriver, L: Logger> I2cDeviceHandler<D, L> {
    #[must_use]
    pub fn with_logger(driver: D, config: I2cDeviceConfig, logger: L) -> Self {
        Self {
            driver,
            config,
            logger,
            state: State::Uninitialized,
        }
    }

    #[must_use]
    pub fn config(&self) -> &I2cDeviceConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> Lifecycle {
        self.state.lifecycle()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state() == Lifecycle::Ready
    }

    /// Bus configuration used by the last successful init.
    #[must_use]
    pub fn bus_config(&self) -> Option<&BusConfig> {
        self.state.ready().ok().map(|a| &a.bus_config)
    }

    /// Device configuration used by the last successful init.
    #[must_use]
    pub fn device_config(&self) -> Option<&DeviceConfig> {
        self.state.ready().ok().map(|a| &a.device_config)
    }

    #[must_use]
    pub fn bus(&self) -> Option<&D::Bus> {
        self.state.ready().ok().map(|a| &a.bus)
    }

    #[must_use]
    pub fn device(&self) -> Option<&D::Device> {
        self.state.ready().ok().map(|a| &a.device)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give the driver back. Handles still held are dropped without being
    /// released; call [`Self::delete`] first.
    pub fn release(self) -> D {
        self.driver
    }

    /// Create the bus and attach the device.
    ///
    /// Allowed from `Uninitialized` and `Closed`. If attaching the device
    /// fails, the bus created for it is deleted again before returning.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] if the handler is already ready.
    /// * [`Error::InvalidArgument`] if SCL or SDA is zero. The driver is not
    ///   called.
    /// * [`Error::Driver`] tagged [`Phase::CreateBus`] or
    ///   [`Phase::AttachDevice`].
    pub fn init(&mut self) -> HandlerResult<(), D> {
        if let State::Ready(_) = self.state {
            return Err(Error::InvalidState(Lifecycle::Ready));
        }
        if !self.config.pins_configured() {
            self.logger.error(&format_line(format_args!(
                "init rejected: scl={} sda={}",
                self.config.scl, self.config.sda
            )));
            return Err(Error::InvalidArgument);
        }

        let bus_config = BusConfig::for_device(&self.config);
        let bus = self
            .driver
            .new_master_bus(&bus_config)
            .map_err(|e| report(&mut self.logger, Phase::CreateBus, e))?;

        let device_config = DeviceConfig::for_device(&self.config);
        let device = match self.driver.add_device(&bus, &device_config) {
            Ok(device) => device,
            Err(source) => {
                if let Err(rollback) = self.driver.del_master_bus(bus) {
                    self.logger.error(&format_line(format_args!(
                        "bus rollback failed: {rollback:?}"
                    )));
                }
                return Err(report(&mut self.logger, Phase::AttachDevice, source));
            }
        };

        self.state = State::Ready(Attached {
            bus_config,
            bus,
            device_config,
            device,
        });
        self.logger.debug(&format_line(format_args!(
            "device 0x{:02X} attached at {} Hz",
            self.config.address,
            self.config.speed.to_Hz()
        )));
        Ok(())
    }

    /// Delete the bus, then detach the device.
    ///
    /// Both steps always run and the handler ends up `Closed` either way.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] if the handler is not ready.
    /// * The first driver failure, tagged [`Phase::DeleteBus`] or
    ///   [`Phase::DetachDevice`].
    pub fn delete(&mut self) -> HandlerResult<(), D> {
        let attached = match core::mem::replace(&mut self.state, State::Closed) {
            State::Ready(attached) => attached,
            other => {
                let lifecycle = other.lifecycle();
                self.state = other;
                return Err(Error::InvalidState(lifecycle));
            }
        };

        let bus_result = self
            .driver
            .del_master_bus(attached.bus)
            .map_err(|e| report(&mut self.logger, Phase::DeleteBus, e));
        let device_result = self
            .driver
            .rm_device(attached.device)
            .map_err(|e| report(&mut self.logger, Phase::DetachDevice, e));

        self.logger.debug(&format_line(format_args!(
            "device 0x{:02X} closed",
            self.config.address
        )));
        bus_result.and(device_result)
    }

    /// Probe every address from 0x00 to [`SCAN_LAST_ADDRESS`].
    ///
    /// A probe that fails just means nothing answered there.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the handler is not ready.
    pub fn scan(&mut self) -> HandlerResult<ScanResult, D> {
        let mut found = ScanResult::new();
        self.sweep(|address| found.push(address).map_err(|_| Error::Report))?;
        Ok(found)
    }

    /// Scan the bus and write a line per responding address to `out`.
    ///
    /// ```text
    /// Device Address 0x50 Responded
    /// Done Scanning.
    /// ```
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] if the handler is not ready.
    /// * [`Error::Report`] if writing to `out` fails. Probe failures are
    ///   never reported.
    pub fn print_device_scan<W: Write>(&mut self, out: &mut W) -> HandlerResult<(), D> {
        self.sweep(|address| {
            writeln!(out, "Device Address 0x{address:02X} Responded").map_err(|_| Error::Report)
        })?;
        writeln!(out, "Done Scanning.").map_err(|_| Error::Report)
    }

    fn sweep<F>(&mut self, mut on_ack: F) -> HandlerResult<(), D>
    where
        F: FnMut(u8) -> HandlerResult<(), D>,
    {
        let attached = self.state.ready().map_err(Error::InvalidState)?;
        for address in 0..=SCAN_LAST_ADDRESS {
            if self
                .driver
                .probe(&attached.bus, address, SCAN_PROBE_TIMEOUT)
                .is_ok()
            {
                on_ack(address)?;
            }
        }
        Ok(())
    }

    /// Fill `buffer` from the device.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] if the handler is not ready.
    /// * [`Error::Driver`] tagged [`Phase::Receive`].
    pub fn read(&mut self, buffer: &mut [u8]) -> HandlerResult<(), D> {
        let attached = self.state.ready().map_err(Error::InvalidState)?;
        if buffer.is_empty() {
            return Ok(());
        }
        self.driver
            .receive(&attached.device, buffer, self.config.timeout)
            .map_err(|e| report(&mut self.logger, Phase::Receive, e))
    }

    /// Write `register`, then fill `buffer`, as one combined transaction.
    ///
    /// The bus is held across a repeated start, so devices that advance an
    /// internal register pointer see a single access.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] if the handler is not ready.
    /// * [`Error::Driver`] tagged [`Phase::TransmitReceive`].
    pub fn read_from_register(&mut self, register: u8, buffer: &mut [u8]) -> HandlerResult<(), D> {
        let attached = self.state.ready().map_err(Error::InvalidState)?;
        if buffer.is_empty() {
            return Ok(());
        }
        self.driver
            .transmit_receive(&attached.device, &[register], buffer, self.config.timeout)
            .map_err(|e| report(&mut self.logger, Phase::TransmitReceive, e))
    }

    /// Send `bytes` to the device.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] if the handler is not ready.
    /// * [`Error::Driver`] tagged [`Phase::Transmit`].
    pub fn write(&mut self, bytes: &[u8]) -> HandlerResult<(), D> {
        let attached = self.state.ready().map_err(Error::InvalidState)?;
        if bytes.is_empty() {
            return Ok(());
        }
        self.driver
            .transmit(&attached.device, bytes, self.config.timeout)
            .map_err(|e| report(&mut self.logger, Phase::Transmit, e))
    }

    /// Send `register`, then `bytes`, as two separate transactions.
    ///
    /// There is no repeated start between the two; the bus is released after
    /// the register byte. The payload is not sent if the register byte fails.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] if the handler is not ready.
    /// * [`Error::Driver`] tagged [`Phase::RegisterAddress`] or
    ///   [`Phase::Payload`].
    pub fn write_to_register(&mut self, register: u8, bytes: &[u8]) -> HandlerResult<(), D> {
        let attached = self.state.ready().map_err(Error::InvalidState)?;
        if bytes.is_empty() {
            return Ok(());
        }
        let timeout = self.config.timeout;
        self.driver
            .transmit(&attached.device, &[register], timeout)
            .map_err(|e| report(&mut self.logger, Phase::RegisterAddress, e))?;
        self.driver
            .transmit(&attached.device, bytes, timeout)
            .map_err(|e| report(&mut self.logger, Phase::Payload, e))
    }
}
