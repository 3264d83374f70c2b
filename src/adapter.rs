//! Timing helpers for interactive surfaces: trailing-edge debouncing of
//! input events and eased counter transitions for numeric readouts.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

/// Waits for the next burst of events and returns it once the channel has
/// been quiet for `quiet`. Returns `None` when the channel is closed and
/// drained.
pub async fn next_settled<T>(rx: &mut mpsc::Receiver<T>, quiet: Duration) -> Option<Vec<T>> {
    let first = rx.recv().await?;
    let mut batch = vec![first];
    loop {
        match timeout(quiet, rx.recv()).await {
            Ok(Some(item)) => batch.push(item),
            // Sender gone: flush what we have.
            Ok(None) => return Some(batch),
            Err(_) => return Some(batch),
        }
    }
}

/// Intermediate values for an animated counter moving from `from` to `to`
/// with ease-out, rounded to whole numbers. The last value is always `to`;
/// repeated values are dropped.
pub fn counter_frames(from: i64, to: i64, steps: usize) -> Vec<i64> {
    if steps == 0 || from == to {
        return vec![to];
    }
    let span = (to - from) as f64;
    let mut frames: Vec<i64> = Vec::with_capacity(steps);
    for step in 1..=steps {
        let t = step as f64 / steps as f64;
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        let value = if step == steps {
            to
        } else {
            from + (span * eased).round() as i64
        };
        if frames.last() != Some(&value) {
            frames.push(value);
        }
    }
    frames
}
