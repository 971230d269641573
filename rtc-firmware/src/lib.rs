// Library-Root: Hardware-Anbindung und Tasks der RTC-Firmware
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von rtc-core
pub use rtc_core::{At24, Ds1307, PropertyStore, TimedEvents, TimerInfo, TimerPattern};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use esp_hal::delay::Delay;

use crate::config::EVENT_QUEUE_SIZE;
use crate::hal::{EmbassyTicks, SharedI2c};

// ============================================================================
// Type-Aliase
// ============================================================================
//
// Embassy Tasks dürfen nicht generisch sein, daher werden die konkreten
// Typen hier einmal festgelegt.

/// DS1307 am geteilten Bus
pub type Rtc = Ds1307<SharedI2c>;

/// AT24C32 am geteilten Bus
pub type Eeprom = At24<SharedI2c, Delay>;

/// Dispatcher mit DS1307 und embassy-time Ticks
pub type Events = TimedEvents<Rtc, EmbassyTicks>;

/// Property Store im AT24C32
pub type Properties = PropertyStore<Eeprom>;

/// Channel für gefeuerte Timer (Handler → Log Task)
/// Handler laufen synchron im Dispatcher, der Log Task entkoppelt die Ausgabe
pub type EventChannel = Channel<CriticalSectionRawMutex, TimerInfo, EVENT_QUEUE_SIZE>;

/// Sender für gefeuerte Timer (in den Handlern)
pub type EventSender = Sender<'static, CriticalSectionRawMutex, TimerInfo, EVENT_QUEUE_SIZE>;

/// Receiver für gefeuerte Timer (Log Task)
pub type EventReceiver = Receiver<'static, CriticalSectionRawMutex, TimerInfo, EVENT_QUEUE_SIZE>;
