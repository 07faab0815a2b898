// Licensed under the Apache-2.0 license

//! Master driver over any blocking `embedded_hal::i2c::I2c` bus.
//!
//! [`HalDriver`] lets the device handler run on every HAL that implements the
//! embedded-hal 1.0 I2C trait. The HAL has already configured pins and clock
//! by the time it hands over the bus, so bus creation only claims it and
//! records the requested settings.
//!
//! embedded-hal transfers carry no timeout. The timeout argument of the
//! transfer methods is ignored here; whatever timeout the HAL applies is the
//! one in effect.

use crate::i2c::common::{BusConfig, DeviceConfig, Timeout};
use crate::i2c::traits::{I2cBusDriver, I2cDeviceDriver};
use embedded_hal::i2c::{ErrorKind, I2c, SevenBitAddress};
use fugit::HertzU32;

/// Highest valid 7-bit address.
const MAX_SEVEN_BIT_ADDRESS: u8 = 0x7F;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HalDriverError<E> {
    /// The bus has already been created and not deleted.
    BusInUse,
    /// No bus has been created.
    BusNotCreated,
    /// Address does not fit in seven bits.
    InvalidAddress(u8),
    /// Error from the underlying HAL bus.
    Bus(E),
}

impl<E> embedded_hal::i2c::Error for HalDriverError<E>
where
    E: embedded_hal::i2c::Error,
{
    fn kind(&self) -> ErrorKind {
        match self {
            HalDriverError::Bus(e) => e.kind(),
            _ => ErrorKind::Other,
        }
    }
}

/// Token for the claimed bus.
#[derive(Debug, PartialEq, Eq)]
pub struct HalBus {
    config: BusConfig,
}

impl HalBus {
    #[must_use]
    pub fn config(&self) -> &BusConfig {
        &self.config
    }
}

/// Token for an attached device.
#[derive(Debug, PartialEq, Eq)]
pub struct HalDevice {
    address: SevenBitAddress,
    speed: HertzU32,
}

impl HalDevice {
    #[must_use]
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Requested clock. The HAL bus decides the actual one.
    #[must_use]
    pub fn speed(&self) -> HertzU32 {
        self.speed
    }
}

pub struct HalDriver<I> {
    i2c: I,
    bus_claimed: bool,
}

impl<I: I2c> HalDriver<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            bus_claimed: false,
        }
    }

    /// Give back the wrapped bus.
    pub fn release(self) -> I {
        self.i2c
    }

    fn claimed(&self) -> Result<(), HalDriverError<I::Error>> {
        if self.bus_claimed {
            Ok(())
        } else {
            Err(HalDriverError::BusNotCreated)
        }
    }
}

fn seven_bit<E>(address: u8) -> Result<SevenBitAddress, HalDriverError<E>> {
    if address > MAX_SEVEN_BIT_ADDRESS {
        Err(HalDriverError::InvalidAddress(address))
    } else {
        Ok(address)
    }
}

impl<I: I2c> I2cBusDriver for HalDriver<I> {
    type Error = HalDriverError<I::Error>;
    type Bus = HalBus;

    fn new_master_bus(&mut self, config: &BusConfig) -> Result<HalBus, Self::Error> {
        if self.bus_claimed {
            return Err(HalDriverError::BusInUse);
        }
        self.bus_claimed = true;
        Ok(HalBus { config: *config })
    }

    fn del_master_bus(&mut self, _bus: HalBus) -> Result<(), Self::Error> {
        self.claimed()?;
        self.bus_claimed = false;
        Ok(())
    }

    fn probe(&mut self, _bus: &HalBus, address: u8, _timeout: Timeout) -> Result<(), Self::Error> {
        self.claimed()?;
        let address = seven_bit(address)?;
        self.i2c.write(address, &[]).map_err(HalDriverError::Bus)
    }
}

impl<I: I2c> I2cDeviceDriver for HalDriver<I> {
    type Device = HalDevice;

    fn add_device(&mut self, _bus: &HalBus, config: &DeviceConfig) -> Result<HalDevice, Self::Error> {
        self.claimed()?;
        Ok(HalDevice {
            address: seven_bit(config.device_address)?,
            speed: config.scl_speed,
        })
    }

    fn rm_device(&mut self, _device: HalDevice) -> Result<(), Self::Error> {
        Ok(())
    }

    fn transmit(
        &mut self,
        device: &HalDevice,
        bytes: &[u8],
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        self.claimed()?;
        self.i2c
            .write(device.address, bytes)
            .map_err(HalDriverError::Bus)
    }

    fn receive(
        &mut self,
        device: &HalDevice,
        buffer: &mut [u8],
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        self.claimed()?;
        self.i2c
            .read(device.address, buffer)
            .map_err(HalDriverError::Bus)
    }

    fn transmit_receive(
        &mut self,
        device: &HalDevice,
        bytes: &[u8],
        buffer: &mut [u8],
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        self.claimed()?;
        self.i2c
            .write_read(device.address, bytes, buffer)
            .map_err(HalDriverError::Bus)
    }
}
