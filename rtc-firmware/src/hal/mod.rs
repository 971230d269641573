// Hardware Abstraction Layer (HAL) Module
//
// Verbindet die Traits aus rtc-core mit der ESP32-Hardware.

pub mod i2c_bus;
pub mod ticks;

pub use i2c_bus::{I2cBus, SharedI2c, create_i2c_bus, device};
pub use ticks::EmbassyTicks;
