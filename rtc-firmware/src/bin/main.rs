// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (Timer-Handler und Property-Puffer)
extern crate alloc;

use core::cell::RefCell;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::timer::timg::TimerGroup;

// Logging
use defmt::{info, warn};

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use static_cell::StaticCell;

// Projekt-Module und Konfiguration
use rtc_firmware::config::{
    BOOT_COUNT_ID, DAILY_TIMER_AT, DAILY_TIMER_ID, EEPROM_BASE_OFFSET, HEAP_SIZE, HOURLY_TIMER_ID,
    MINUTE_TIMER_ID, PROPERTY_INITIAL_CAPACITY, TIMER_CAPACITY,
};
use rtc_firmware::hal::{EmbassyTicks, I2cBus, create_i2c_bus, device};
use rtc_firmware::tasks::{event_log_task, timed_events_task};
use rtc_firmware::{
    At24, Ds1307, EventChannel, EventSender, Events, Properties, PropertyStore, TimedEvents,
    TimerInfo, TimerPattern,
};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware und I2C-Bus, lädt die Properties, registriert die
/// Timer und spawnt die Tasks. Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // I2C-Bus für DS1307 + AT24C32 (ein Modul, ein Bus)
    let i2c = create_i2c_bus(peripherals.I2C0, peripherals.GPIO6, peripherals.GPIO7)
        .expect("Failed to initialize I2C");
    static I2C_BUS: StaticCell<critical_section::Mutex<RefCell<I2cBus>>> = StaticCell::new();
    let i2c_bus = &*I2C_BUS.init(critical_section::Mutex::new(RefCell::new(i2c)));

    // Properties laden und Boot-Zähler erhöhen
    let mut properties = PropertyStore::new(At24::new(device(i2c_bus), Delay::new()))
        .with_base_offset(EEPROM_BASE_OFFSET)
        .with_initial_capacity(PROPERTY_INITIAL_CAPACITY);
    count_boot(&mut properties);

    // RTC prüfen: nach Batteriewechsel ist der Oszillator angehalten
    let mut rtc = Ds1307::new(device(i2c_bus));
    match rtc.is_running() {
        Ok(true) => {}
        Ok(false) => {
            warn!("RTC oscillator halted, starting it");
            if let Err(e) = rtc.set_running(true) {
                warn!("Failed to start RTC: {}", e);
            }
        }
        Err(e) => warn!("RTC not reachable: {}", e),
    }

    // Event-Channel erstellen (Dispatcher → Log Task)
    static EVENT_CHANNEL: StaticCell<EventChannel> = StaticCell::new();
    let event_channel = &*EVENT_CHANNEL.init(EventChannel::new());

    let mut events = TimedEvents::with_capacity(rtc, EmbassyTicks, TIMER_CAPACITY);
    register_timers(&mut events, event_channel.sender());
    match events.read_time() {
        Ok(now) => info!("RTC time: {}", now),
        Err(e) => warn!("RTC read failed: {}", e),
    }

    // Spawn Tasks
    spawner
        .spawn(event_log_task(event_channel.receiver(), properties))
        .unwrap();
    spawner.spawn(timed_events_task(events)).unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

/// Lädt das Property-Abbild und erhöht den Boot-Zähler
///
/// Ein leeres oder beschädigtes EEPROM beginnt bei 0.
fn count_boot(properties: &mut Properties) {
    match properties.load() {
        Ok(true) => info!("Loaded {} properties", properties.len()),
        Ok(false) => info!("No property image found, starting empty"),
        Err(e) => warn!("EEPROM read failed: {}", e),
    }

    let boots = properties
        .get_long(BOOT_COUNT_ID)
        .unwrap_or(0)
        .saturating_add(1);
    if let Err(e) = properties.set_long(BOOT_COUNT_ID, boots) {
        warn!("Failed to update boot counter: {}", e);
        return;
    }
    match properties.save() {
        Ok(()) => info!("Boot #{}", boots),
        Err(e) => warn!("EEPROM write failed: {}", e),
    }
}

/// Registriert die Demo-Timer; alle melden sich über den Event-Channel
fn register_timers(events: &mut Events, sender: EventSender) {
    let (daily_hour, daily_minute) = DAILY_TIMER_AT;
    let timers = [
        (MINUTE_TIMER_ID, TimerPattern::every_minute()),
        (HOURLY_TIMER_ID, TimerPattern::hourly(0)),
        (DAILY_TIMER_ID, TimerPattern::daily(daily_hour, daily_minute)),
    ];

    for (id, pattern) in timers {
        events.add_timer_with_id(id, pattern, move |timer: &TimerInfo| {
            if sender.try_send(*timer).is_err() {
                warn!("Event queue full, dropping timer {}", timer.event_id);
            }
        });
    }
}
