// Licensed under the Apache-2.0 license

//! # I2C Master Driver Traits
//!
//! The device handler does no bus work itself. Everything that touches the
//! wire goes through the traits below, which a platform driver implements.
//!
//! ## Trait Hierarchy
//!
//! ```text
//! I2cBusDriver (bus lifetime + probing)
//!     └── I2cDeviceDriver (device attach/detach + transfers)
//!             └── I2cMasterDriver (blanket composite)
//! ```
//!
//! Handles are opaque associated types. They are moved into
//! [`I2cBusDriver::del_master_bus`] and [`I2cDeviceDriver::rm_device`], so a
//! released handle cannot be used again.

use crate::i2c::common::{BusConfig, DeviceConfig, Timeout};

/// Bus-level operations.
///
/// # Examples
///
/// ```rust,ignore
/// use i2c_handler::i2c::{I2cBusDriver, BusConfig, Timeout};
///
/// fn first_responder<T: I2cBusDriver>(driver: &mut T, bus: &T::Bus) -> Option<u8> {
///     (0x08..0x78).find(|&addr| driver.probe(bus, addr, Timeout::millis(1)).is_ok())
/// }
/// ```
pub trait I2cBusDriver {
    /// Driver error type that implements embedded-hal error traits
    type Error: embedded_hal::i2c::Error + core::fmt::Debug;

    /// Handle to a created master bus
    type Bus;

    /// Create a master bus with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the port is taken, the pins are invalid, or the
    /// controller cannot be brought up.
    fn new_master_bus(&mut self, config: &BusConfig) -> Result<Self::Bus, Self::Error>;

    /// Tear down a master bus
    ///
    /// # Errors
    ///
    /// Returns an error if the bus cannot be released, for example because
    /// devices are still attached and the driver requires them gone first.
    fn del_master_bus(&mut self, bus: Self::Bus) -> Result<(), Self::Error>;

    /// Check whether a device acknowledges `address`
    ///
    /// # Errors
    ///
    /// Returns an error if nothing acknowledges, which is the expected
    /// outcome for an empty address, or if the bus itself fails.
    fn probe(&mut self, bus: &Self::Bus, address: u8, timeout: Timeout)
        -> Result<(), Self::Error>;
}

/// Device-level operations on a bus created by [`I2cBusDriver`].
pub trait I2cDeviceDriver: I2cBusDriver {
    /// Handle to a device attached to a bus
    type Device;

    /// Attach a device to `bus`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected or the driver has
    /// no room for another device.
    fn add_device(
        &mut self,
        bus: &Self::Bus,
        config: &DeviceConfig,
    ) -> Result<Self::Device, Self::Error>;

    /// Detach a device
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot release the device.
    fn rm_device(&mut self, device: Self::Device) -> Result<(), Self::Error>;

    /// Write `bytes` to the device in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error on NACK, arbitration loss, timeout, or other bus
    /// failure.
    fn transmit(
        &mut self,
        device: &Self::Device,
        bytes: &[u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;

    /// Fill `buffer` from the device in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error on NACK, arbitration loss, timeout, or other bus
    /// failure.
    fn receive(
        &mut self,
        device: &Self::Device,
        buffer: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;

    /// Write `bytes`, then read into `buffer` after a repeated start
    ///
    /// The bus is not released between the two phases.
    ///
    /// # Errors
    ///
    /// Returns an error if either phase fails.
    fn transmit_receive(
        &mut self,
        device: &Self::Device,
        bytes: &[u8],
        buffer: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;
}

/// Complete master driver: bus plus device operations
pub trait I2cMasterDriver: I2cBusDriver + I2cDeviceDriver {}

/// Blanket implementation: any type implementing bus + device operations is a master driver
impl<T> I2cMasterDriver for T where T: I2cBusDriver + I2cDeviceDriver {}
