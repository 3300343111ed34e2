// ─── Progress Stream ───
// A single structured event stream any UI layer can consume. The core never
// talks to a window or an IPC bridge directly.

use serde::Serialize;
use tokio::sync::mpsc;

/// Pipeline phase a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    VersionMeta,
    ClientJar,
    Libraries,
    Assets,
    Mods,
}

/// One aggregate progress record: `{phase, completedUnits, totalUnits}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub phase: Phase,
    pub completed_units: u64,
    /// Omitted when the total is unknown (e.g. no content-length).
    pub total_units: Option<u64>,
}

/// Byte-level progress for a single transfer, reported per chunk.
/// `total`/`percent` are present only when a content-length is known.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FetchProgress {
    pub downloaded: u64,
    pub total: Option<u64>,
    pub percent: Option<u8>,
}

/// Cloneable handle for emitting [`ProgressEvent`]s. A disabled sender
/// swallows events so components never branch on "is anyone listening".
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ProgressSender {
    /// Create a live channel; the receiver side belongs to the presentation
    /// layer.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, phase: Phase, completed_units: u64, total_units: Option<u64>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(ProgressEvent {
                phase,
                completed_units,
                total_units,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_delivers_events_in_order() {
        let (sender, mut rx) = ProgressSender::channel();
        sender.emit(Phase::Libraries, 1, Some(5));
        sender.emit(Phase::Libraries, 2, Some(5));

        let first = rx.try_recv().unwrap();
        assert_eq!(first.phase, Phase::Libraries);
        assert_eq!(first.completed_units, 1);
        assert_eq!(rx.try_recv().unwrap().completed_units, 2);
    }

    #[test]
    fn disabled_sender_swallows_events() {
        let sender = ProgressSender::disabled();
        sender.emit(Phase::Assets, 10, None);
    }
}
