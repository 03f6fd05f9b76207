use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::actions::Action;

/// Handle to a running refresh ticker. Dropping it stops the ticker.
#[derive(Debug)]
pub struct RefreshTicker {
    handle: JoinHandle<()>,
}

impl RefreshTicker {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Send [`Action::Tick`] every `period` until the receiver goes away.
///
/// The first tick fires one full period after spawning.
pub fn spawn_refresh_ticker(period: Duration, sender: mpsc::UnboundedSender<Action>) -> RefreshTicker {
    let period = period.max(Duration::from_millis(1));
    let handle = tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);

        loop {
            interval.tick().await;
            if sender.send(Action::Tick).is_err() {
                debug!("Refresh ticker stopped: receiver closed");
                break;
            }
        }
    });

    RefreshTicker { handle }
}
