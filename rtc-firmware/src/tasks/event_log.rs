// Event Log Task - protokolliert gefeuerte Timer und zählt sie im EEPROM
use defmt::{info, warn};

use crate::config::{FIRED_TOTAL_ID, HOURLY_TIMER_ID};
use crate::{EventReceiver, Properties};

/// Empfängt gefeuerte Timer vom Dispatcher
///
/// Der Zähler [`FIRED_TOTAL_ID`] wird bei jedem Event im RAM erhöht und
/// nur beim stündlichen Timer ins EEPROM geschrieben.
///
/// # Parameter
/// - `receiver`: Channel Receiver für gefeuerte Timer
/// - `properties`: geladener Property Store
#[embassy_executor::task]
pub async fn event_log_task(receiver: EventReceiver, mut properties: Properties) {
    loop {
        let timer = receiver.receive().await;
        info!("Timer fired: {}", timer);

        let total = properties
            .get_long(FIRED_TOTAL_ID)
            .unwrap_or(0)
            .saturating_add(1);
        if let Err(e) = properties.set_long(FIRED_TOTAL_ID, total) {
            warn!("Failed to update fired counter: {}", e);
            continue;
        }

        if timer.event_id == HOURLY_TIMER_ID {
            match properties.save() {
                Ok(()) => info!("Properties saved ({} timers fired so far)", total),
                Err(e) => warn!("Failed to save properties: {}", e),
            }
        }
    }
}
