// ABOUTME: Readiness detector for the sandbox server-ready signal
// ABOUTME: Captures the first readiness event exactly once per session

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::ServerReady;

/// Captures the engine's server-ready signal exactly once per session.
///
/// The only supported signal that a dev server is accepting connections is
/// the asynchronous event carrying a port and URL; later events on the same
/// subscription are ignored. The detector itself enforces no timeout, the
/// controller layers its configurable policy on top.
#[derive(Debug)]
pub struct ReadinessDetector {
    rx: Option<mpsc::Receiver<ServerReady>>,
}

impl ReadinessDetector {
    pub fn new(rx: mpsc::Receiver<ServerReady>) -> Self {
        Self { rx: Some(rx) }
    }

    /// Wait for the first readiness event.
    ///
    /// Returns `None` if the event was already captured, or if the engine
    /// closed the subscription without ever emitting one, in which case the
    /// session stays in Running.
    pub async fn wait(&mut self) -> Option<ServerReady> {
        let mut rx = self.rx.take()?;
        let ready = rx.recv().await;
        if let Some(ready) = &ready {
            debug!("Readiness event captured: port {} at {}", ready.port, ready.url);
        }
        // Drop the receiver either way so later events go nowhere.
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_first_event() {
        let (tx, rx) = mpsc::channel(4);
        let mut detector = ReadinessDetector::new(rx);

        tx.send(ServerReady {
            port: 3000,
            url: "https://abc.local:3000".to_string(),
        })
        .await
        .unwrap();

        let ready = detector.wait().await.unwrap();
        assert_eq!(ready.port, 3000);
        assert_eq!(ready.url, "https://abc.local:3000");
    }

    #[tokio::test]
    async fn test_second_wait_yields_nothing() {
        let (tx, rx) = mpsc::channel(4);
        let mut detector = ReadinessDetector::new(rx);

        tx.send(ServerReady {
            port: 3000,
            url: "https://abc.local:3000".to_string(),
        })
        .await
        .unwrap();
        tx.send(ServerReady {
            port: 3001,
            url: "https://abc.local:3001".to_string(),
        })
        .await
        .unwrap();

        assert!(detector.wait().await.is_some());
        assert!(detector.wait().await.is_none());
    }

    #[tokio::test]
    async fn test_closed_subscription_yields_none() {
        let (tx, rx) = mpsc::channel::<ServerReady>(4);
        let mut detector = ReadinessDetector::new(rx);
        drop(tx);

        assert!(detector.wait().await.is_none());
    }
}
