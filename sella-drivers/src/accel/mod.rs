//! Orientation accelerometers

pub mod mpu6050;

pub use mpu6050::{AccelError, Mpu6050, MPU6050_ADDR_HIGH, MPU6050_ADDR_LOW};
