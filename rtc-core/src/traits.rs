//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Uhr, Tick-Zähler und
//! persistenten Speicher ohne konkrete Implementierung.

use crate::types::{Clock, TimerInfo};

/// Trait für eine Echtzeituhr (RTC)
///
/// # Implementierungen
/// - **Production:** [`crate::Ds1307`] (I2C)
/// - **Testing:** SimulatedRtc (in-memory Mock)
///
/// Beide Operationen sind blockierende Bus-Transaktionen.
pub trait TimeSource {
    type Error;

    /// Liest die aktuelle Uhrzeit als Ganzes
    fn read(&mut self) -> Result<Clock, Self::Error>;

    /// Stellt die Uhr
    fn write(&mut self, clock: &Clock) -> Result<(), Self::Error>;
}

/// Frei laufender Millisekunden-Zähler seit Systemstart
///
/// Der Zähler darf überlaufen (wrapping u32), der Dispatcher erkennt das.
pub trait TickSource {
    fn now_ms(&mut self) -> u32;
}

/// Byte-adressierter persistenter Speicher (EEPROM)
///
/// Keine Transaktionen. Ob der Bereich in das Medium passt, muss der
/// Aufrufer sicherstellen; Implementierungen dürfen mit einem Fehler antworten.
pub trait ByteStore {
    type Error;

    /// Füllt `buf` ab absoluter Adresse `offset`
    fn read_bytes(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Schreibt `data` ab absoluter Adresse `offset`
    fn write_bytes(&mut self, offset: u16, data: &[u8]) -> Result<(), Self::Error>;
}

/// Handler für feuernde Timer
///
/// Läuft synchron im Dispatcher: ein blockierender Handler verzögert alle
/// folgenden Timer derselben Runde.
pub trait TimedEventHandler {
    fn on_event(&mut self, timer: &TimerInfo);
}

impl<F> TimedEventHandler for F
where
    F: FnMut(&TimerInfo),
{
    fn on_event(&mut self, timer: &TimerInfo) {
        self(timer)
    }
}
