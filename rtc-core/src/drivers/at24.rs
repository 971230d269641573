//! AT24Cxx I2C-EEPROM Treiber
//!
//! Für die größeren Typen (AT24C32 und aufwärts) mit 16-Bit Wortadresse.
//! Der AT24C32 sitzt auf den meisten DS1307-Modulen mit auf dem Bus.
//!
//! Schreibzugriffe werden an Page-Grenzen aufgeteilt: innerhalb einer
//! Transaktion läuft der interne Adresszähler nur innerhalb der Page um.
//! Nach jeder Page wartet der Treiber die Schreibzyklus-Zeit ab.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{I2c, Operation};

use crate::config::{AT24_ADDRESS, AT24_CAPACITY, AT24_PAGE_SIZE, AT24_WRITE_CYCLE_MS};
use crate::traits::ByteStore;

/// Mit 16-Bit Wortadresse erreichbare Bytes
const MAX_ADDRESSABLE: usize = 0x1_0000;

/// AT24-spezifischer Fehler-Typ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum At24Error<E> {
    /// I2C-Kommunikationsfehler
    I2c(E),
    /// Zugriff über das Ende des EEPROMs hinaus
    OutOfRange { offset: u16, len: usize },
}

impl<E: fmt::Debug> fmt::Display for At24Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C communication error: {e:?}"),
            Self::OutOfRange { offset, len } => {
                write!(f, "EEPROM access of {len} bytes at 0x{offset:04X} out of range")
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for At24Error<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::I2c(e) => defmt::write!(fmt, "I2C error: {}", e),
            Self::OutOfRange { offset, len } => {
                defmt::write!(fmt, "OutOfRange {{ offset: {=u16:#x}, len: {} }}", offset, len)
            }
        }
    }
}

/// AT24Cxx Treiber
///
/// Standard-Geometrie: AT24C32 (4 KiB, 32-Byte Pages) an Adresse 0x50.
pub struct At24<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    page_size: usize,
    capacity: usize,
}

impl<I2C, D, E> At24<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: AT24_ADDRESS,
            page_size: AT24_PAGE_SIZE,
            capacity: AT24_CAPACITY,
        }
    }

    /// I2C-Adresse (0x50-0x57 je nach A0-A2)
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Page-Größe und Kapazität für andere Typen (z.B. AT24C256: 64 / 32768)
    ///
    /// Eine Page-Größe von 0 wird als 1 behandelt, die Kapazität ist durch
    /// die 16-Bit Wortadresse auf 64 KiB begrenzt.
    pub fn with_geometry(mut self, page_size: usize, capacity: usize) -> Self {
        self.page_size = page_size.max(1);
        self.capacity = capacity.min(MAX_ADDRESSABLE);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Gibt Bus und Delay zurück
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn check_range(&self, offset: u16, len: usize) -> Result<(), At24Error<E>> {
        match usize::from(offset).checked_add(len) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => Err(At24Error::OutOfRange { offset, len }),
        }
    }
}

impl<I2C, D, E> ByteStore for At24<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    type Error = At24Error<E>;

    fn read_bytes(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.check_range(offset, buf.len())?;
        if buf.is_empty() {
            return Ok(());
        }

        // Sequentielles Lesen läuft über Page-Grenzen hinweg
        self.i2c
            .write_read(self.address, &offset.to_be_bytes(), buf)
            .map_err(At24Error::I2c)
    }

    fn write_bytes(&mut self, offset: u16, data: &[u8]) -> Result<(), Self::Error> {
        self.check_range(offset, data.len())?;

        let mut address = usize::from(offset);
        let mut remaining = data;
        while !remaining.is_empty() {
            let page_left = self.page_size - address % self.page_size;
            let (chunk, rest) = remaining.split_at(page_left.min(remaining.len()));

            // address < capacity <= MAX_ADDRESSABLE (check_range)
            let word = (address as u16).to_be_bytes();
            self.i2c
                .transaction(
                    self.address,
                    &mut [Operation::Write(&word), Operation::Write(chunk)],
                )
                .map_err(At24Error::I2c)?;
            self.delay.delay_ms(AT24_WRITE_CYCLE_MS);

            address += chunk.len();
            remaining = rest;
        }
        Ok(())
    }
}
