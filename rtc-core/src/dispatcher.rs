//! RTC Timer Dispatcher
//!
//! Minutengenauer Scheduler im Stil von cron: die Uhr wird nur etwa einmal
//! pro Minute gelesen (I2C-Transaktion), dazwischen reicht ein Vergleich
//! gegen den Tick-Zähler.
//!
//! # Ablauf von `poll()`
//! 1. Tick-Zähler lesen; Überlauf (`now < last`) → neu initialisieren
//! 2. **Uninitialized:** Uhr lesen, Ziel-Tick = now + ms bis Minutenwechsel
//! 3. **Armed:** warten bis Ziel-Tick erreicht
//! 4. Ziel erreicht: Uhr lesen, bei neuer Minute alle passenden Timer in
//!    Registrierungs-Reihenfolge feuern, danach Uhr erneut lesen und neu armen
//!
//! Handler haben keinen Zugriff auf den Dispatcher selbst, Re-Entrancy ist
//! damit ausgeschlossen.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::config::DEFAULT_TIMER_ID;
use crate::logic::{millis_until_next_minute, pattern_matches};
use crate::traits::{TickSource, TimeSource, TimedEventHandler};
use crate::types::{Clock, TimerInfo, TimerPattern};

/// Registrierter Timer
struct Timer {
    info: TimerInfo,
    handler: Box<dyn TimedEventHandler>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    /// Noch kein Ziel-Tick berechnet
    Uninitialized,
    /// Warten auf `target_tick`; `last_minute` verhindert doppeltes Feuern
    Armed { target_tick: u32, last_minute: u8 },
}

/// Timer-Registry und Dispatcher
///
/// # Trait-basierte Abstraktion
/// - `R: TimeSource` – Ds1307 im Production-Code, Simulation in Tests
/// - `T: TickSource` – embassy-time Millisekunden oder manueller Zähler
pub struct TimedEvents<R, T> {
    rtc: R,
    ticks: T,
    timers: Vec<Timer>,
    schedule: Schedule,
    last_tick: Option<u32>,
    time: Option<Clock>,
}

impl<R, T> TimedEvents<R, T>
where
    R: TimeSource,
    T: TickSource,
{
    pub fn new(rtc: R, ticks: T) -> Self {
        Self::with_capacity(rtc, ticks, 0)
    }

    /// Reserviert Platz für `capacity` Timer im Voraus
    pub fn with_capacity(rtc: R, ticks: T, capacity: usize) -> Self {
        Self {
            rtc,
            ticks,
            timers: Vec::with_capacity(capacity),
            schedule: Schedule::Uninitialized,
            last_tick: None,
            time: None,
        }
    }

    /// Registriert einen Timer mit Standard-ID ([`DEFAULT_TIMER_ID`])
    pub fn add_timer<H>(&mut self, pattern: TimerPattern, handler: H)
    where
        H: TimedEventHandler + 'static,
    {
        self.add_timer_with_id(DEFAULT_TIMER_ID, pattern, handler);
    }

    /// Registriert einen Timer mit eigener ID
    ///
    /// IDs müssen nicht eindeutig sein. Die Feldwerte werden nicht geprüft:
    /// ein Muster wie Minute 75 feuert einfach nie.
    pub fn add_timer_with_id<H>(&mut self, event_id: i16, pattern: TimerPattern, handler: H)
    where
        H: TimedEventHandler + 'static,
    {
        debug!("Timer added: id {}", event_id);
        self.timers.push(Timer {
            info: TimerInfo { event_id, pattern },
            handler: Box::new(handler),
        });
    }

    /// Entfernt alle Timer und gibt den Speicher frei
    pub fn clear(&mut self) {
        self.timers = Vec::new();
    }

    /// Anzahl registrierter Timer
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Timer-Informationen in Dispatch-Reihenfolge
    pub fn timers(&self) -> impl Iterator<Item = &TimerInfo> {
        self.timers.iter().map(|timer| &timer.info)
    }

    /// True sobald ein Ziel-Tick berechnet wurde
    pub fn is_armed(&self) -> bool {
        matches!(self.schedule, Schedule::Armed { .. })
    }

    /// Zuletzt vom Dispatcher gelesene Uhrzeit
    pub fn time(&self) -> Option<Clock> {
        self.time
    }

    /// Liest die Uhr sofort (unabhängig vom Polling)
    pub fn read_time(&mut self) -> Result<Clock, R::Error> {
        let clock = self.rtc.read()?;
        self.time = Some(clock);
        Ok(clock)
    }

    /// Stellt die Uhr und erzwingt ein neues Armen beim nächsten Poll
    pub fn set_time(&mut self, clock: Clock) -> Result<(), R::Error> {
        self.rtc.write(&clock)?;
        self.time = Some(clock);
        self.schedule = Schedule::Uninitialized;
        Ok(())
    }

    pub fn rtc_mut(&mut self) -> &mut R {
        &mut self.rtc
    }

    pub fn ticks_mut(&mut self) -> &mut T {
        &mut self.ticks
    }

    /// Polling-Schritt, aus der Hauptschleife so oft wie möglich aufrufen
    ///
    /// Gibt die Anzahl gefeuerter Timer zurück.
    ///
    /// # Fehlerbehandlung
    /// Lesefehler der Uhr werden durchgereicht; der Zustand bleibt so, dass
    /// der nächste Aufruf es erneut versucht und keine Minute doppelt feuert.
    pub fn poll(&mut self) -> Result<usize, R::Error> {
        let now = self.ticks.now_ms();

        // Tick-Überlauf: altes Ziel wäre nie erreichbar
        if let Some(last) = self.last_tick
            && now < last
        {
            debug!("Tick counter wrapped ({} -> {}), re-arming", last, now);
            self.schedule = Schedule::Uninitialized;
        }
        self.last_tick = Some(now);

        let schedule = self.schedule;
        match schedule {
            Schedule::Uninitialized => {
                let clock = self.read_time()?;
                self.arm(now, &clock);
                Ok(0)
            }
            Schedule::Armed { target_tick, .. } if now < target_tick => Ok(0),
            Schedule::Armed { last_minute, .. } => {
                let clock = self.read_time()?;
                let fired = if clock.minute != last_minute {
                    self.dispatch(&clock)
                } else {
                    0
                };

                // Zweites Lesen: die Uhr kann während der Handler weitergelaufen sein
                match self.read_time() {
                    Ok(next) => {
                        self.schedule = Schedule::Armed {
                            target_tick: now.saturating_add(millis_until_next_minute(&next)),
                            last_minute: clock.minute,
                        };
                        Ok(fired)
                    }
                    Err(e) => {
                        warn!("RTC read failed after dispatch, retrying");
                        self.schedule = Schedule::Armed {
                            target_tick: now,
                            last_minute: clock.minute,
                        };
                        Err(e)
                    }
                }
            }
        }
    }

    fn arm(&mut self, now: u32, clock: &Clock) {
        let target_tick = now.saturating_add(millis_until_next_minute(clock));
        trace!("Armed: target tick {}", target_tick);
        self.schedule = Schedule::Armed {
            target_tick,
            last_minute: clock.minute,
        };
    }

    fn dispatch(&mut self, clock: &Clock) -> usize {
        let mut fired = 0;
        for timer in self.timers.iter_mut() {
            if pattern_matches(&timer.info.pattern, clock) {
                timer.handler.on_event(&timer.info);
                fired += 1;
            }
        }
        info!("Minute {}: {} timer(s) fired", clock.minute, fired);
        fired
    }
}
