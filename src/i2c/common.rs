// Licensed under the Apache-2.0 license

//! Configuration types for the I2C device handler.
//!
//! [`I2cDeviceConfig`] holds what the caller chooses (address, pins, speed,
//! port, timeout). [`BusConfig`] and [`DeviceConfig`] are the snapshots the
//! handler derives from it and hands to the bus driver during init.

use embedded_hal::i2c::SevenBitAddress;
use fugit::{HertzU32, MillisDurationU32};

/// Glitch filter length applied to every bus, in source clock cycles.
pub const GLITCH_IGNORE_CYCLES: u8 = 7;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum I2cSpeed {
    Standard = 100_000,
    Fast = 400_000,
    FastPlus = 1_000_000,
}

impl From<I2cSpeed> for HertzU32 {
    fn from(speed: I2cSpeed) -> Self {
        HertzU32::from_raw(speed as u32)
    }
}

/// Controller port selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cPort {
    /// Let the driver pick a free controller.
    #[default]
    Auto,
    /// Use the given controller number.
    Num(u8),
}

impl I2cPort {
    /// Port number in the convention most vendor drivers use, `-1` for auto.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            I2cPort::Auto => -1,
            I2cPort::Num(n) => i32::from(n),
        }
    }
}

/// Per-transfer timeout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Wait for the bus indefinitely.
    #[default]
    Disabled,
    Millis(MillisDurationU32),
}

impl Timeout {
    #[must_use]
    pub const fn millis(ms: u32) -> Self {
        Timeout::Millis(MillisDurationU32::millis(ms))
    }

    /// Timeout in milliseconds, `None` when disabled.
    #[must_use]
    pub fn as_millis(self) -> Option<u32> {
        match self {
            Timeout::Disabled => None,
            Timeout::Millis(duration) => Some(duration.to_millis()),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    #[default]
    Default,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressLength {
    #[default]
    SevenBit,
}

/// Caller-chosen settings for one device on one bus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cDeviceConfig {
    pub address: SevenBitAddress,
    /// SCL pin id, zero when unconfigured.
    pub scl: u8,
    /// SDA pin id, zero when unconfigured.
    pub sda: u8,
    pub speed: HertzU32,
    pub port: I2cPort,
    pub timeout: Timeout,
}

impl I2cDeviceConfig {
    /// Both pins assigned.
    #[must_use]
    pub fn pins_configured(&self) -> bool {
        self.scl != 0 && self.sda != 0
    }
}

impl Default for I2cDeviceConfig {
    fn default() -> Self {
        I2cDeviceConfigBuilder::new().build()
    }
}

pub struct I2cDeviceConfigBuilder {
    address: SevenBitAddress,
    scl: u8,
    sda: u8,
    speed: HertzU32,
    port: I2cPort,
    timeout: Timeout,
}

impl Default for I2cDeviceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl I2cDeviceConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            address: 0,
            scl: 0,
            sda: 0,
            speed: I2cSpeed::Standard.into(),
            port: I2cPort::Auto,
            timeout: Timeout::Disabled,
        }
    }
    #[must_use]
    pub fn address(mut self, address: SevenBitAddress) -> Self {
        self.address = address;
        self
    }
    #[must_use]
    pub fn scl(mut self, pin: u8) -> Self {
        self.scl = pin;
        self
    }
    #[must_use]
    pub fn sda(mut self, pin: u8) -> Self {
        self.sda = pin;
        self
    }
    #[must_use]
    pub fn pins(self, scl: u8, sda: u8) -> Self {
        self.scl(scl).sda(sda)
    }
    #[must_use]
    pub fn speed(mut self, speed: impl Into<HertzU32>) -> Self {
        self.speed = speed.into();
        self
    }
    #[must_use]
    pub fn port(mut self, port: I2cPort) -> Self {
        self.port = port;
        self
    }
    #[must_use]
    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }
    #[must_use]
    pub fn build(self) -> I2cDeviceConfig {
        I2cDeviceConfig {
            address: self.address,
            scl: self.scl,
            sda: self.sda,
            speed: self.speed,
            port: self.port,
            timeout: self.timeout,
        }
    }
}

/// Bus settings handed to [`I2cBusDriver::new_master_bus`].
///
/// [`I2cBusDriver::new_master_bus`]: crate::i2c::traits::I2cBusDriver::new_master_bus
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    pub clk_source: ClockSource,
    pub port: I2cPort,
    pub scl: u8,
    pub sda: u8,
    pub glitch_ignore_cnt: u8,
    pub enable_internal_pullup: bool,
}

impl BusConfig {
    /// External pull-ups are assumed; the internal ones stay off.
    #[must_use]
    pub fn for_device(config: &I2cDeviceConfig) -> Self {
        Self {
            clk_source: ClockSource::Default,
            port: config.port,
            scl: config.scl,
            sda: config.sda,
            glitch_ignore_cnt: GLITCH_IGNORE_CYCLES,
            enable_internal_pullup: false,
        }
    }
}

/// Device settings handed to [`I2cDeviceDriver::add_device`].
///
/// [`I2cDeviceDriver::add_device`]: crate::i2c::traits::I2cDeviceDriver::add_device
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub addr_length: AddressLength,
    pub device_address: SevenBitAddress,
    pub scl_speed: HertzU32,
}

impl DeviceConfig {
    #[must_use]
    pub fn for_device(config: &I2cDeviceConfig) -> Self {
        Self {
            addr_length: AddressLength::SevenBit,
            device_address: config.address,
            scl_speed: config.speed,
        }
    }
}
