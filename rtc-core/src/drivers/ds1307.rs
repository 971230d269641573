//! DS1307 Real-Time-Clock Treiber
//!
//! Die DS1307 hält Datum und Uhrzeit BCD-kodiert in den Registern 0x00-0x06:
//!
//! | Reg  | Inhalt                                   |
//! |------|------------------------------------------|
//! | 0x00 | Sekunden (Bit 7: Clock Halt)             |
//! | 0x01 | Minuten                                  |
//! | 0x02 | Stunden (Bit 6: 12h-Modus, Bit 5: PM)    |
//! | 0x03 | Wochentag (1-7)                          |
//! | 0x04 | Tag                                      |
//! | 0x05 | Monat                                    |
//! | 0x06 | Jahr (0-99 ab [`DS1307_BASE_YEAR`])      |
//!
//! # Beispiel
//!
//! ```ignore
//! let mut rtc = Ds1307::new(i2c);
//! let now = rtc.read()?;
//! ```

use core::fmt;

use embedded_hal::i2c::I2c;

use crate::config::{DS1307_ADDRESS, DS1307_BASE_YEAR, DS1307_HALT_BIT};
use crate::logic::{bcd_to_dec, dec_to_bcd};
use crate::traits::TimeSource;
use crate::types::Clock;

/// Register-Adressen
mod reg {
    pub const SECONDS: u8 = 0x00;
}

/// 12h-Modus Bit im Stunden-Register
const HOUR_12H_BIT: u8 = 0x40;
/// PM Bit im 12h-Modus
const HOUR_PM_BIT: u8 = 0x20;

/// DS1307-spezifischer Fehler-Typ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ds1307Error<E> {
    /// I2C-Kommunikationsfehler
    I2c(E),
    /// Uhrzeit außerhalb des darstellbaren Bereichs
    InvalidClock,
}

impl<E: fmt::Debug> fmt::Display for Ds1307Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C communication error: {e:?}"),
            Self::InvalidClock => write!(f, "clock fields out of range for DS1307"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Ds1307Error<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::I2c(e) => defmt::write!(fmt, "I2C error: {}", e),
            Self::InvalidClock => defmt::write!(fmt, "InvalidClock"),
        }
    }
}

/// DS1307 Treiber
pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C, E> Ds1307<I2C>
where
    I2C: I2c<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Gibt den I2C-Bus zurück
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// True wenn der Oszillator läuft (Clock-Halt Bit gelöscht)
    pub fn is_running(&mut self) -> Result<bool, Ds1307Error<E>> {
        let mut seconds = [0u8; 1];
        self.i2c
            .write_read(DS1307_ADDRESS, &[reg::SECONDS], &mut seconds)
            .map_err(Ds1307Error::I2c)?;
        Ok(seconds[0] & DS1307_HALT_BIT == 0)
    }

    /// Startet oder stoppt den Oszillator, die Sekunden bleiben erhalten
    pub fn set_running(&mut self, running: bool) -> Result<(), Ds1307Error<E>> {
        let mut seconds = [0u8; 1];
        self.i2c
            .write_read(DS1307_ADDRESS, &[reg::SECONDS], &mut seconds)
            .map_err(Ds1307Error::I2c)?;

        let value = if running {
            seconds[0] & !DS1307_HALT_BIT
        } else {
            seconds[0] | DS1307_HALT_BIT
        };
        self.i2c
            .write(DS1307_ADDRESS, &[reg::SECONDS, value])
            .map_err(Ds1307Error::I2c)
    }
}

fn decode_hour(raw: u8) -> u8 {
    if raw & HOUR_12H_BIT != 0 {
        let hour = bcd_to_dec(raw & 0x1F) % 12;
        if raw & HOUR_PM_BIT != 0 { hour + 12 } else { hour }
    } else {
        bcd_to_dec(raw & 0x3F)
    }
}

impl<I2C, E> TimeSource for Ds1307<I2C>
where
    I2C: I2c<Error = E>,
{
    type Error = Ds1307Error<E>;

    fn read(&mut self) -> Result<Clock, Self::Error> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(DS1307_ADDRESS, &[reg::SECONDS], &mut regs)
            .map_err(Ds1307Error::I2c)?;

        Ok(Clock {
            second: bcd_to_dec(regs[0] & !DS1307_HALT_BIT),
            minute: bcd_to_dec(regs[1] & 0x7F),
            hour: decode_hour(regs[2]),
            day_of_week: bcd_to_dec(regs[3] & 0x07),
            day: bcd_to_dec(regs[4] & 0x3F),
            month: bcd_to_dec(regs[5] & 0x1F),
            year: DS1307_BASE_YEAR + u16::from(bcd_to_dec(regs[6])),
        })
    }

    /// Stellt die Uhr: Oszillator anhalten, Register schreiben, wieder starten
    ///
    /// Stunden werden immer im 24h-Modus geschrieben.
    fn write(&mut self, clock: &Clock) -> Result<(), Self::Error> {
        let year = clock
            .year
            .checked_sub(DS1307_BASE_YEAR)
            .filter(|year| *year < 100)
            .ok_or(Ds1307Error::InvalidClock)?;
        if !clock.is_valid() {
            return Err(Ds1307Error::InvalidClock);
        }

        let mut frame = [
            reg::SECONDS,
            dec_to_bcd(clock.second) | DS1307_HALT_BIT,
            dec_to_bcd(clock.minute),
            dec_to_bcd(clock.hour),
            dec_to_bcd(clock.day_of_week),
            dec_to_bcd(clock.day),
            dec_to_bcd(clock.month),
            // year < 100 (oben geprüft)
            dec_to_bcd(year as u8),
        ];
        self.i2c
            .write(DS1307_ADDRESS, &frame)
            .map_err(Ds1307Error::I2c)?;

        frame[1] &= !DS1307_HALT_BIT;
        self.i2c
            .write(DS1307_ADDRESS, &frame[..2])
            .map_err(Ds1307Error::I2c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hour_24h() {
        assert_eq!(decode_hour(0x00), 0);
        assert_eq!(decode_hour(0x13), 13);
        assert_eq!(decode_hour(0x23), 23);
    }

    #[test]
    fn test_decode_hour_12h() {
        // 12 AM = 0 Uhr, 12 PM = 12 Uhr
        assert_eq!(decode_hour(HOUR_12H_BIT | 0x12), 0);
        assert_eq!(decode_hour(HOUR_12H_BIT | HOUR_PM_BIT | 0x12), 12);
        assert_eq!(decode_hour(HOUR_12H_BIT | 0x07), 7);
        assert_eq!(decode_hour(HOUR_12H_BIT | HOUR_PM_BIT | 0x07), 19);
    }
}
