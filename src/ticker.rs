//! Once-per-period ticker for attached workout sessions.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

/// Calls `on_tick` once per `period` until `stop` resolves or `on_tick`
/// fails. Returns the number of completed ticks.
///
/// The first tick fires one full period after the call. The interval is
/// dropped on return.
pub async fn tick_until<S, F, E>(period: Duration, stop: S, mut on_tick: F) -> Result<u64, E>
where
    S: Future,
    F: FnMut() -> Result<(), E>,
{
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(stop);

    let mut ticks = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut stop => {
                tracing::debug!(ticks, "ticker stopped");
                break;
            }
            _ = interval.tick() => {
                on_tick()?;
                ticks += 1;
            }
        }
    }

    Ok(ticks)
}
