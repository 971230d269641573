//! Gemeinsame Mocks für die Integration Tests
//!
//! Jede Test-Datei ist ein eigenes Binary und nutzt nur einen Teil davon.
#![allow(dead_code)]

use std::collections::HashMap;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use rtc_core::{Clock, TickSource, TimeSource};

// ============================================================================
// SimulatedRtc
// ============================================================================

/// RTC-Simulation mit vereinfachtem Kalender (28 Tage pro Monat)
#[derive(Default)]
pub struct SimulatedRtc {
    pub now: Clock,
    pub read_count: usize,
    pub write_count: usize,
    pub fail_next_read: bool,
    /// Lässt den n-ten erfolgreichen Lesezugriff (1-basiert) einmal scheitern
    pub fail_read_number: Option<usize>,
}

impl SimulatedRtc {
    pub fn new(now: Clock) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    pub fn advance_seconds(&mut self, seconds: u32) {
        for _ in 0..seconds {
            self.tick();
        }
    }

    fn tick(&mut self) {
        let c = &mut self.now;
        c.second += 1;
        if c.second < 60 {
            return;
        }
        c.second = 0;
        c.minute += 1;
        if c.minute < 60 {
            return;
        }
        c.minute = 0;
        c.hour += 1;
        if c.hour < 24 {
            return;
        }
        c.hour = 0;
        c.day_of_week = (c.day_of_week + 1) % 7;
        c.day += 1;
        if c.day <= 28 {
            return;
        }
        c.day = 1;
        c.month += 1;
        if c.month > 12 {
            c.month = 1;
            c.year += 1;
        }
    }
}

impl TimeSource for SimulatedRtc {
    type Error = ();

    fn read(&mut self) -> Result<Clock, ()> {
        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(());
        }
        if self.fail_read_number == Some(self.read_count + 1) {
            self.fail_read_number = None;
            return Err(());
        }
        self.read_count += 1;
        Ok(self.now)
    }

    fn write(&mut self, clock: &Clock) -> Result<(), ()> {
        self.now = *clock;
        self.write_count += 1;
        Ok(())
    }
}

/// Uhrzeit-Helfer: 2024-04-10 (Mittwoch = 3)
pub fn clock(hour: u8, minute: u8, second: u8) -> Clock {
    Clock {
        second,
        minute,
        hour,
        day_of_week: 3,
        day: 10,
        month: 4,
        year: 2024,
    }
}

// ============================================================================
// ManualTicks
// ============================================================================

/// Manuell gesteuerter Millisekunden-Zähler (wrapping wie millis())
#[derive(Default)]
pub struct ManualTicks {
    pub now: u32,
}

impl ManualTicks {
    pub fn starting_at(now: u32) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }
}

impl TickSource for ManualTicks {
    fn now_ms(&mut self) -> u32 {
        self.now
    }
}

// ============================================================================
// FakeI2c
// ============================================================================

/// Register- bzw. Speicherabbild eines Bus-Teilnehmers
pub struct FakeDevice {
    pub memory: Vec<u8>,
    /// Breite der Wortadresse (1 = Register, 2 = EEPROM)
    address_bytes: usize,
    /// Umlauf des Schreibzeigers innerhalb einer Page (wie beim AT24)
    page_size: Option<usize>,
    pointer: usize,
}

impl FakeDevice {
    pub fn registers(size: usize) -> Self {
        Self {
            memory: vec![0; size],
            address_bytes: 1,
            page_size: None,
            pointer: 0,
        }
    }

    pub fn eeprom(size: usize, page_size: usize) -> Self {
        Self {
            memory: vec![0xFF; size],
            address_bytes: 2,
            page_size: Some(page_size),
            pointer: 0,
        }
    }

    fn write(&mut self, byte: u8) {
        self.memory[self.pointer] = byte;
        self.pointer = match self.page_size {
            Some(page) => self.pointer / page * page + (self.pointer + 1) % page,
            None => (self.pointer + 1) % self.memory.len(),
        };
    }

    fn read(&mut self) -> u8 {
        let byte = self.memory[self.pointer];
        self.pointer = (self.pointer + 1) % self.memory.len();
        byte
    }
}

/// I2C-Bus mit simulierten Teilnehmern
#[derive(Default)]
pub struct FakeI2c {
    pub devices: HashMap<u8, FakeDevice>,
    /// Alle geschriebenen Bytes pro Transaktion (inkl. Wortadresse)
    pub transactions: Vec<(u8, Vec<u8>)>,
    pub fail_next: bool,
}

impl FakeI2c {
    pub fn with_device(mut self, address: u8, device: FakeDevice) -> Self {
        self.devices.insert(address, device);
        self
    }

    pub fn memory(&self, address: u8) -> &[u8] {
        &self.devices[&address].memory
    }

    pub fn memory_mut(&mut self, address: u8) -> &mut Vec<u8> {
        &mut self.devices.get_mut(&address).unwrap().memory
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail_next {
            self.fail_next = false;
            return Err(ErrorKind::Other);
        }

        let device = self
            .devices
            .get_mut(&address)
            .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))?;

        let mut written = Vec::new();
        let mut word_address = Vec::new();
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        written.push(byte);
                        if word_address.len() < device.address_bytes {
                            word_address.push(byte);
                            if word_address.len() == device.address_bytes {
                                device.pointer = word_address
                                    .iter()
                                    .fold(0usize, |acc, b| (acc << 8) | usize::from(*b))
                                    % device.memory.len();
                            }
                        } else {
                            device.write(byte);
                        }
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = device.read();
                    }
                }
            }
        }

        self.transactions.push((address, written));
        Ok(())
    }
}

// ============================================================================
// FakeDelay
// ============================================================================

/// Zählt nur die angeforderte Wartezeit
#[derive(Default)]
pub struct FakeDelay {
    pub total_ns: u64,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
