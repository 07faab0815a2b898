// Licensed under the Apache-2.0 license

//! I2C master device handler.
//!
//! [`I2cDeviceHandler`] drives one device on one bus through any
//! [`I2cMasterDriver`]. [`HalDriver`] provides that driver on top of an
//! embedded-hal 1.0 bus.

pub mod common;
pub mod device_handler;
pub mod error;
pub mod hal_driver;
pub mod traits;

pub use common::{
    AddressLength, BusConfig, ClockSource, DeviceConfig, I2cDeviceConfig, I2cDeviceConfigBuilder,
    I2cPort, I2cSpeed, Timeout,
};
pub use device_handler::{I2cDeviceHandler, ScanResult};
pub use error::{Error, Lifecycle, Phase};
pub use hal_driver::{HalBus, HalDevice, HalDriver, HalDriverError};
pub use traits::{I2cBusDriver, I2cDeviceDriver, I2cMasterDriver};
