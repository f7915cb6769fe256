//! Periodic rank refresh of every tracked player.

mod refresh;
mod scheduler;
#[cfg(test)]
pub mod testing;

pub use refresh::{RankRefresher, RefreshError};
pub use scheduler::{PollingScheduler, SweepReport};

/// Best effort text of a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
