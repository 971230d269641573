// Geteilter I2C-Bus
//
// DS1307 und AT24C32 sitzen auf demselben Modul und damit am selben Bus.
// Jeder Treiber bekommt ein eigenes `CriticalSectionDevice`, der Bus selbst
// liegt in einem statischen Mutex.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal_bus::i2c::CriticalSectionDevice;
use esp_hal::Blocking;
use esp_hal::i2c::master::{Config as I2cConfig, ConfigError, I2c};
use esp_hal::time::Rate;

use crate::config::I2C_FREQUENCY_KHZ;

/// Blockierender I2C-Master
pub type I2cBus = I2c<'static, Blocking>;

/// Ein Bus-Teilnehmer am geteilten Bus
pub type SharedI2c = CriticalSectionDevice<'static, I2cBus>;

/// Initialisiert I2C0 mit der konfigurierten Frequenz
///
/// # Parameter
/// - `i2c0`: I2C0 Peripheral
/// - `sda`: GPIO6 als Datenleitung
/// - `scl`: GPIO7 als Taktleitung
pub fn create_i2c_bus(
    i2c0: esp_hal::peripherals::I2C0<'static>,
    sda: esp_hal::peripherals::GPIO6<'static>,
    scl: esp_hal::peripherals::GPIO7<'static>,
) -> Result<I2cBus, ConfigError> {
    let config = I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ));
    Ok(I2c::new(i2c0, config)?.with_sda(sda).with_scl(scl))
}

/// Erzeugt einen Bus-Teilnehmer
pub fn device(bus: &'static Mutex<RefCell<I2cBus>>) -> SharedI2c {
    CriticalSectionDevice::new(bus)
}
