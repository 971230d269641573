//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::config::{ANY, MILLIS_PER_SECOND, SECONDS_PER_MINUTE};
use crate::types::{Clock, TimerPattern};

/// Dezimal (0-99) → BCD
///
/// # Beispiele
///
/// ```
/// # use rtc_core::dec_to_bcd;
/// assert_eq!(dec_to_bcd(59), 0x59);
/// ```
pub fn dec_to_bcd(value: u8) -> u8 {
    (value / 10) * 16 + value % 10
}

/// BCD → Dezimal
pub fn bcd_to_dec(value: u8) -> u8 {
    (value / 16) * 10 + value % 16
}

fn field_matches(pattern: u8, actual: u8) -> bool {
    pattern == ANY || pattern == actual
}

/// Prüft ob ein Timer-Muster zur Uhrzeit passt
///
/// Jedes Feld wird unabhängig verglichen, [`ANY`] passt immer.
/// Sekunden und Jahr spielen keine Rolle.
pub fn pattern_matches(pattern: &TimerPattern, clock: &Clock) -> bool {
    field_matches(pattern.minute, clock.minute)
        && field_matches(pattern.hour, clock.hour)
        && field_matches(pattern.day, clock.day)
        && field_matches(pattern.month, clock.month)
        && field_matches(pattern.day_of_week, clock.day_of_week)
}

/// Millisekunden bis zur nächsten vollen Minute
///
/// Ungültige Sekundenwerte (>= 60) ergeben 0, d.h. sofort prüfen.
pub fn millis_until_next_minute(clock: &Clock) -> u32 {
    u32::from(SECONDS_PER_MINUTE.saturating_sub(clock.second)) * MILLIS_PER_SECOND
}
