//! Core Types für Timer und Uhrzeit
//!
//! Datenstrukturen ohne Hardware-Dependencies

use crate::config::{ANY, DEFAULT_TIMER_ID};

/// Momentaufnahme der RTC
///
/// Wird von einer [`crate::TimeSource`] als Ganzes geliefert und nie
/// teilweise aktualisiert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clock {
    /// 0-59
    pub second: u8,
    /// 0-59
    pub minute: u8,
    /// 0-23
    pub hour: u8,
    /// Wochentag, Nummerierung wie von der RTC geliefert
    pub day_of_week: u8,
    /// 1-31
    pub day: u8,
    /// 1-12
    pub month: u8,
    /// Absolutes Jahr (z.B. 2024)
    pub year: u16,
}

impl Clock {
    /// Prüft ob alle Felder im gültigen Kalenderbereich liegen
    ///
    /// Wochentag darf 0-7 sein (0-6 oder 1-7 je nach Konvention der RTC).
    pub fn is_valid(&self) -> bool {
        self.second < 60
            && self.minute < 60
            && self.hour < 24
            && self.day_of_week <= 7
            && (1..=31).contains(&self.day)
            && (1..=12).contains(&self.month)
    }
}

/// Kalender-Muster eines Timers
///
/// Jedes Feld ist entweder ein konkreter Wert oder [`ANY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerPattern {
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub month: u8,
    pub day_of_week: u8,
}

impl TimerPattern {
    /// Erstellt ein Muster in der Reihenfolge Minute, Stunde, Tag, Monat, Wochentag
    pub const fn new(minute: u8, hour: u8, day: u8, month: u8, day_of_week: u8) -> Self {
        Self {
            minute,
            hour,
            day,
            month,
            day_of_week,
        }
    }

    /// Feuert jede Minute
    pub const fn every_minute() -> Self {
        Self::new(ANY, ANY, ANY, ANY, ANY)
    }

    /// Feuert jede Stunde zur angegebenen Minute
    pub const fn hourly(minute: u8) -> Self {
        Self::new(minute, ANY, ANY, ANY, ANY)
    }

    /// Feuert täglich zur angegebenen Uhrzeit
    pub const fn daily(hour: u8, minute: u8) -> Self {
        Self::new(minute, hour, ANY, ANY, ANY)
    }
}

impl Default for TimerPattern {
    fn default() -> Self {
        Self::every_minute()
    }
}

/// Information über einen feuernden Timer
///
/// Wird an den Handler übergeben, damit ein Handler für mehrere Timer
/// registriert werden kann.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerInfo {
    pub event_id: i16,
    pub pattern: TimerPattern,
}

impl TimerInfo {
    /// True wenn der Timer ohne explizite ID registriert wurde
    pub fn has_default_id(&self) -> bool {
        self.event_id == DEFAULT_TIMER_ID
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Clock {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{=u16}-{=u8}-{=u8} {=u8}:{=u8}:{=u8} (dow {=u8})",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.day_of_week
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerPattern {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "TimerPattern {{ min: {}, hour: {}, day: {}, month: {}, dow: {} }}",
            self.minute,
            self.hour,
            self.day,
            self.month,
            self.day_of_week
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerInfo {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Timer {{ id: {}, {} }}", self.event_id, self.pattern)
    }
}
