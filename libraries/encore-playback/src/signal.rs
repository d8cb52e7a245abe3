//! Skip/stop handoff between callers and the play loop
//!
//! Each signal kind is a single-slot channel of requests carrying a oneshot
//! acknowledgement. A sender waits for the slot, then for the loop to
//! acknowledge, so at most one request per kind is in flight and a second
//! request queues behind the first. Channels live exactly as long as one play
//! loop: when the loop exits its receivers drop and any unobserved request
//! reports failure to its sender.

use tokio::sync::{mpsc, oneshot};

/// Move the cursor to `target` once the current stream is torn down
#[derive(Debug)]
pub(crate) struct SkipRequest {
    pub target: usize,
    pub ack: oneshot::Sender<()>,
}

/// Caller side, kept in player state while a loop runs
#[derive(Debug, Clone)]
pub(crate) struct LoopControl {
    skip_tx: mpsc::Sender<SkipRequest>,
    stop_tx: mpsc::Sender<oneshot::Sender<()>>,
}

/// Loop side, owned by the play loop task
#[derive(Debug)]
pub(crate) struct LoopSignals {
    pub skip_rx: mpsc::Receiver<SkipRequest>,
    pub stop_rx: mpsc::Receiver<oneshot::Sender<()>>,
}

pub(crate) fn loop_channel() -> (LoopControl, LoopSignals) {
    let (skip_tx, skip_rx) = mpsc::channel(1);
    let (stop_tx, stop_rx) = mpsc::channel(1);

    (
        LoopControl { skip_tx, stop_tx },
        LoopSignals { skip_rx, stop_rx },
    )
}

impl LoopControl {
    /// Send a skip and wait until the loop has placed the cursor
    ///
    /// Returns `false` if the loop ended without observing the request.
    pub async fn skip(&self, target: usize) -> bool {
        let (ack, acked) = oneshot::channel();
        if self.skip_tx.send(SkipRequest { target, ack }).await.is_err() {
            return false;
        }
        acked.await.is_ok()
    }

    /// Send a stop and wait until the loop has gone idle
    ///
    /// Returns `false` if the loop ended without observing the request.
    pub async fn stop(&self) -> bool {
        let (ack, acked) = oneshot::channel();
        if self.stop_tx.send(ack).await.is_err() {
            return false;
        }
        acked.await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skip_waits_for_acknowledgement() {
        let (control, mut signals) = loop_channel();

        let sender = tokio::spawn(async move { control.skip(4).await });

        let request = signals.skip_rx.recv().await.unwrap();
        assert_eq!(request.target, 4);
        assert!(!sender.is_finished());

        request.ack.send(()).unwrap();
        assert!(sender.await.unwrap());
    }

    #[tokio::test]
    async fn stop_reports_loop_exit() {
        let (control, signals) = loop_channel();
        drop(signals);

        assert!(!control.stop().await);
        assert!(!control.skip(0).await);
    }

    #[tokio::test]
    async fn unobserved_request_fails_when_loop_exits() {
        let (control, signals) = loop_channel();

        let sender = tokio::spawn(async move { control.skip(1).await });
        tokio::task::yield_now().await;
        drop(signals);

        assert!(!sender.await.unwrap());
    }
}
