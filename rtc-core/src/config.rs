//! Konstanten für Timer, Property-Store und Bus-Adressen
//!
//! Laufzeit-Einstellungen (Basis-Offset, Initial-Kapazität) werden über
//! Builder-Methoden gesetzt, siehe [`crate::PropertyStore`].

// ============================================================================
// Timer Konfiguration
// ============================================================================

/// Wildcard für Timer-Felder: passt auf jeden Wert
pub const ANY: u8 = 0xFF;

/// Event-ID für Timer ohne explizite ID
pub const DEFAULT_TIMER_ID: i16 = -99;

/// Millisekunden pro Sekunde (Tick-Zähler läuft in ms)
pub const MILLIS_PER_SECOND: u32 = 1000;

/// Sekunden pro Minute
pub const SECONDS_PER_MINUTE: u8 = 60;

// ============================================================================
// Property-Store Konfiguration
// ============================================================================

/// Exklusive Obergrenze für die Anzahl Properties
/// Ein gespeichertes Image ist nur gültig mit count in [1, MAX_PROPERTIES)
pub const MAX_PROPERTIES: u16 = 64;

/// Standard-Startadresse des Images im persistenten Speicher
pub const DEFAULT_BASE_OFFSET: u16 = 0;

/// Image-Header: [count: 2 Bytes][size: 2 Bytes]
pub const IMAGE_HEADER_LEN: usize = 4;

/// Record-Header: [propertyId: 2 Bytes][valueSize: 2 Bytes]
pub const RECORD_HEADER_LEN: usize = 4;

// ============================================================================
// DS1307 Konfiguration
// ============================================================================

/// I2C-Adresse der DS1307 RTC
pub const DS1307_ADDRESS: u8 = 0x68;

/// Clock-Halt Bit im Sekunden-Register
pub const DS1307_HALT_BIT: u8 = 0x80;

/// Basisjahr: das Jahres-Register zählt 0-99 ab diesem Jahr
pub const DS1307_BASE_YEAR: u16 = 2000;

// ============================================================================
// AT24Cxx Konfiguration
// ============================================================================

/// I2C-Adresse des AT24C32 auf gängigen DS1307-Modulen (A0-A2 = GND)
pub const AT24_ADDRESS: u8 = 0x50;

/// Page-Größe des AT24C32 in Bytes
pub const AT24_PAGE_SIZE: usize = 32;

/// Kapazität des AT24C32 in Bytes (32 Kbit)
pub const AT24_CAPACITY: usize = 4096;

/// Maximale Schreibzyklus-Zeit laut Datenblatt in Millisekunden
pub const AT24_WRITE_CYCLE_MS: u32 = 10;
