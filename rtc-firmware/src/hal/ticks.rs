// Millisekunden-Zähler auf Basis von embassy-time

use rtc_core::TickSource;

/// [`TickSource`] über `embassy_time::Instant`
///
/// Der 64-Bit Zeitstempel wird auf 32 Bit abgeschnitten und läuft damit
/// nach etwa 49 Tagen über. Der Dispatcher erkennt das und armt neu.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyTicks;

impl TickSource for EmbassyTicks {
    fn now_ms(&mut self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }
}
