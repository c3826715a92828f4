//! MPU6050 accelerometer driver
//!
//! Minimal register access for the InvenSense MPU6050: wake the device
//! out of sleep and read raw accelerometer samples. The backrest and
//! seat-pan sensors share one I2C bus (AD0 strapped low and high), so
//! the driver holds only the address and borrows the bus per call.

use sella_core::tilt;

/// MPU6050 address with AD0 low (backrest sensor)
pub const MPU6050_ADDR_LOW: u8 = 0x68;
/// MPU6050 address with AD0 high (seat-pan sensor)
pub const MPU6050_ADDR_HIGH: u8 = 0x69;

/// WHO_AM_I reads this regardless of AD0 strapping
const DEVICE_ID: u8 = 0x68;

/// MPU6050 registers
#[allow(dead_code)]
mod reg {
    pub const SMPLRT_DIV: u8 = 0x19;
    pub const CONFIG: u8 = 0x1A;
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const WHO_AM_I: u8 = 0x75;
}

/// Accelerometer access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelError<E> {
    /// I2C transaction failed
    Bus(E),
    /// WHO_AM_I returned an unexpected identity
    WrongDevice(u8),
}

/// MPU6050 accelerometer
pub struct Mpu6050 {
    addr: u8,
}

impl Mpu6050 {
    pub fn new(addr: u8) -> Self {
        Self { addr }
    }

    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Verify the device identity and take it out of sleep
    ///
    /// The MPU6050 powers up in sleep mode with all sensor outputs
    /// frozen, so a wake write is required before the first sample.
    pub async fn init<I2C>(&self, i2c: &mut I2C) -> Result<(), AccelError<I2C::Error>>
    where
        I2C: embedded_hal_async::i2c::I2c,
    {
        let id = self.read_reg(i2c, reg::WHO_AM_I).await?;
        if id != DEVICE_ID {
            return Err(AccelError::WrongDevice(id));
        }

        // Clear SLEEP, select the gyro X PLL clock source
        self.write_reg(i2c, reg::PWR_MGMT_1, 0x01).await?;
        Ok(())
    }

    /// Read one raw accelerometer sample (x, y, z)
    pub async fn read_accel<I2C>(
        &self,
        i2c: &mut I2C,
    ) -> Result<(i16, i16, i16), AccelError<I2C::Error>>
    where
        I2C: embedded_hal_async::i2c::I2c,
    {
        let mut buf = [0u8; 6];
        i2c.write_read(self.addr, &[reg::ACCEL_XOUT_H], &mut buf)
            .await
            .map_err(AccelError::Bus)?;

        let ax = i16::from_be_bytes([buf[0], buf[1]]);
        let ay = i16::from_be_bytes([buf[2], buf[3]]);
        let az = i16::from_be_bytes([buf[4], buf[5]]);
        Ok((ax, ay, az))
    }

    /// Read the sensor and reduce it to a tilt angle in tenths of a degree
    pub async fn read_tilt_x10<I2C>(&self, i2c: &mut I2C) -> Result<i16, AccelError<I2C::Error>>
    where
        I2C: embedded_hal_async::i2c::I2c,
    {
        let (ax, _ay, az) = self.read_accel(i2c).await?;
        Ok(tilt::tilt_x10_from_accel(ax, az))
    }

    async fn read_reg<I2C>(&self, i2c: &mut I2C, reg: u8) -> Result<u8, AccelError<I2C::Error>>
    where
        I2C: embedded_hal_async::i2c::I2c,
    {
        let mut buf = [0u8; 1];
        i2c.write_read(self.addr, &[reg], &mut buf)
            .await
            .map_err(AccelError::Bus)?;
        Ok(buf[0])
    }

    async fn write_reg<I2C>(
        &self,
        i2c: &mut I2C,
        reg: u8,
        value: u8,
    ) -> Result<(), AccelError<I2C::Error>>
    where
        I2C: embedded_hal_async::i2c::I2c,
    {
        i2c.write(self.addr, &[reg, value])
            .await
            .map_err(AccelError::Bus)
    }
}
