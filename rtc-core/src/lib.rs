//! RTC Core - Platform-agnostic Logic, Traits und Treiber
//!
//! Diese Crate enthält KEINE plattformspezifischen Dependencies.
//! Hardware wird nur über Traits (bzw. embedded-hal) angesprochen.
//!
//! - [`dispatcher::TimedEvents`]: minutengenauer Timer-Dispatcher (RTC-basiert)
//! - [`properties::PropertyStore`]: kompakter Key-Value-Speicher für EEPROM

#![no_std]

extern crate alloc;

// Muss als erstes Modul eingebunden werden (Log-Makros)
#[macro_use]
mod fmt;

pub mod config;
pub mod dispatcher;
pub mod drivers;
pub mod logic;
pub mod memory;
pub mod properties;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use config::{ANY, DEFAULT_TIMER_ID, MAX_PROPERTIES};
pub use dispatcher::TimedEvents;
pub use drivers::{At24, At24Error, Ds1307, Ds1307Error};
pub use logic::{bcd_to_dec, dec_to_bcd, pattern_matches};
pub use memory::{MemoryStore, MemoryStoreError};
pub use properties::{Property, PropertyError, PropertyStore};
pub use traits::{ByteStore, TickSource, TimeSource, TimedEventHandler};
pub use types::{Clock, TimerInfo, TimerPattern};
