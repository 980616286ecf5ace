//! Handle for a running snapshot subscription.

use newsletters_firestore::Document;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::Result;

/// One delivery: the full document set, or the error that prevented it.
pub type Delivery = Result<Vec<Document>>;

/// A running subscription.
///
/// Dropping the handle stops the background task.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<Delivery>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Wraps a receiver fed by a background task owned by this handle.
    #[must_use]
    pub fn new(receiver: mpsc::Receiver<Delivery>, task: JoinHandle<()>) -> Self {
        Self {
            receiver,
            task: Some(task),
        }
    }

    /// Wraps a receiver whose sender is owned elsewhere.
    #[must_use]
    pub fn from_receiver(receiver: mpsc::Receiver<Delivery>) -> Self {
        Self {
            receiver,
            task: None,
        }
    }

    /// Waits for the next delivery. `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<Delivery> {
        self.receiver.recv().await
    }

    /// Stops the subscription.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.receiver.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receives_deliveries_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let mut subscription = Subscription::from_receiver(rx);

        tx.send(Ok(vec![Document::new("c/a")])).await.unwrap();
        tx.send(Ok(Vec::new())).await.unwrap();
        drop(tx);

        assert_eq!(subscription.next().await.unwrap().unwrap().len(), 1);
        assert!(subscription.next().await.unwrap().unwrap().is_empty());
        assert!(subscription.next().await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_stops_task() {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            loop {
                if tx.send(Ok(Vec::new())).await.is_err() {
                    break;
                }
            }
        });
        let mut subscription = Subscription::new(rx, task);
        assert!(subscription.next().await.is_some());

        subscription.cancel();
        // Buffered deliveries may still drain, then the stream ends.
        while subscription.next().await.is_some() {}
    }
}
