//! RAM-basierter ByteStore
//!
//! Für Host-Tests und Simulation. Verhält sich wie ein frisch gelöschtes
//! EEPROM (alle Bytes 0xFF), prüft aber im Gegensatz zur Hardware die Grenzen.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::traits::ByteStore;

/// Fehler-Typ für MemoryStore-Zugriffe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStoreError {
    /// Bereich liegt (teilweise) außerhalb des Speichers
    OutOfBounds { offset: u16, len: usize },
}

impl fmt::Display for MemoryStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { offset, len } => {
                write!(f, "access of {len} bytes at offset {offset} is out of bounds")
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MemoryStoreError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::OutOfBounds { offset, len } => {
                defmt::write!(fmt, "OutOfBounds {{ offset: {}, len: {} }}", offset, len)
            }
        }
    }
}

/// In-Memory EEPROM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    bytes: Vec<u8>,
}

impl MemoryStore {
    /// Erstellt einen gelöschten Speicher mit `size` Bytes
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0xFF; size],
        }
    }

    /// Übernimmt einen vorhandenen Speicherinhalt
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn range(&self, offset: u16, len: usize) -> Result<core::ops::Range<usize>, MemoryStoreError> {
        let start = usize::from(offset);
        match start.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(start..end),
            _ => Err(MemoryStoreError::OutOfBounds { offset, len }),
        }
    }
}

impl ByteStore for MemoryStore {
    type Error = MemoryStoreError;

    fn read_bytes(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write_bytes(&mut self, offset: u16, data: &[u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }
}
