// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

// ============================================================================
// I2C Konfiguration
// ============================================================================

// SDA = GPIO6, SCL = GPIO7 (siehe hal::i2c_bus)

/// I2C Taktfrequenz in kHz
/// Die DS1307 kann nur Standard-Mode (100 kHz)
pub const I2C_FREQUENCY_KHZ: u32 = 100;

// ============================================================================
// Timer Konfiguration
// ============================================================================

/// Polling-Intervall des Dispatchers in Millisekunden
/// Die Uhr wird trotzdem nur einmal pro Minute gelesen
pub const POLL_INTERVAL_MS: u64 = 250;

/// Vorreservierte Timer-Plätze
pub const TIMER_CAPACITY: usize = 4;

/// Kapazität des Event-Channels (Dispatcher → Log Task)
pub const EVENT_QUEUE_SIZE: usize = 8;

// Timer-IDs der Demo-Timer
pub const MINUTE_TIMER_ID: i16 = 1;
pub const HOURLY_TIMER_ID: i16 = 2;
pub const DAILY_TIMER_ID: i16 = 3;

/// Uhrzeit des täglichen Timers (Stunde, Minute)
pub const DAILY_TIMER_AT: (u8, u8) = (7, 30);

// ============================================================================
// EEPROM / Property Konfiguration
// ============================================================================

/// Start des Property-Abbilds im AT24C32
pub const EEPROM_BASE_OFFSET: u16 = 0x0000;

/// Startkapazität des Property-Puffers in Bytes
pub const PROPERTY_INITIAL_CAPACITY: usize = 32;

/// Property-ID: Anzahl der Starts (i32)
pub const BOOT_COUNT_ID: i16 = 1;

/// Property-ID: Anzahl gefeuerter Timer seit dem ersten Start (i32)
pub const FIRED_TOTAL_ID: i16 = 2;

// ============================================================================
// Speicher
// ============================================================================

/// Heap-Größe (Bytes) für Timer-Handler und Property-Puffer
pub const HEAP_SIZE: usize = 32 * 1024;
