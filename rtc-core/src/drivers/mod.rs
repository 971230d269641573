//! I2C-Treiber für die externen Komponenten
//!
//! Beide Treiber sind generisch über `embedded_hal::i2c::I2c` und laufen
//! damit auf jeder HAL (und gegen Fake-Busse in Host-Tests).

pub mod at24;
pub mod ds1307;

pub use at24::{At24, At24Error};
pub use ds1307::{Ds1307, Ds1307Error};
