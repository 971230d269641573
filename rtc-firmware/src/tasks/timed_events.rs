// Timed Events Task - pollt den RTC-Dispatcher
use defmt::{debug, warn};
use embassy_time::{Duration, Timer};
use rtc_core::{TickSource, TimeSource, TimedEvents};

use crate::Events;
use crate::config::POLL_INTERVAL_MS;

/// Polling-Schleife ohne Hardware-Abhängigkeit
///
/// `poll()` kostet zwischen zwei Minutenwechseln nur einen Tick-Vergleich,
/// die I2C-Transaktionen fallen einmal pro Minute an.
///
/// # Trait-basierte Abstraktion
/// - `R: TimeSource` – Ds1307 am geteilten Bus (oder Mock)
/// - `T: TickSource` – embassy-time Ticks (oder Mock)
pub async fn timed_events_logic<R, T>(mut events: TimedEvents<R, T>)
where
    R: TimeSource,
    R::Error: defmt::Format,
    T: TickSource,
{
    loop {
        match events.poll() {
            Ok(0) => {}
            Ok(fired) => debug!("Dispatcher round: {} timer(s)", fired),
            // Zustand bleibt erhalten, der nächste Poll versucht es erneut
            Err(e) => warn!("RTC read failed: {}", e),
        }

        Timer::after(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

/// Timed Events Task - Embassy Task für parallele Ausführung
///
/// # Parameter
/// - `events`: fertig konfigurierter Dispatcher mit registrierten Timern
#[embassy_executor::task]
pub async fn timed_events_task(events: Events) {
    timed_events_logic(events).await;
}
