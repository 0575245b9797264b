// Event fan-out: one task owns the subscriber list and delivers every event to it.

use super::types::Event;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Notify, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Why a delivery to a subscriber failed.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("failed to serialize event: {0}")]
    Serialization(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("write deadline exceeded")]
    Timeout,
}

#[derive(Debug, Error)]
#[error("broadcaster is not running")]
pub struct BroadcasterClosed;

/// A connection that wants every event from now on.
#[async_trait]
pub trait Subscriber: Send {
    // Identifier for logs only.
    fn id(&self) -> u64;
    async fn send_event(&mut self, event: &Event) -> Result<(), SubscriberError>;
    async fn close(&mut self);
}

type Subscription = (Box<dyn Subscriber>, oneshot::Sender<()>);

#[derive(Clone)]
pub struct BroadcasterHandle {
    sub_tx: mpsc::Sender<Subscription>,
    shutdown: Arc<Notify>,
}

impl BroadcasterHandle {
    /// Hands a subscriber to the broadcaster. Returns once it is in the list,
    /// so any event emitted afterwards reaches it.
    pub async fn subscribe(
        &self,
        subscriber: Box<dyn Subscriber>,
    ) -> Result<(), BroadcasterClosed> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.sub_tx
            .send((subscriber, ack_tx))
            .await
            .map_err(|_| BroadcasterClosed)?;
        ack_rx.await.map_err(|_| BroadcasterClosed)
    }

    pub fn shutdown(&self) {
        // notify_one stores a permit, so a shutdown sent before the loop waits is not lost.
        self.shutdown.notify_one();
    }
}

pub struct Broadcaster {
    subscribers: Vec<Box<dyn Subscriber>>,
    sub_rx: mpsc::Receiver<Subscription>,
    event_rx: mpsc::Receiver<Event>,
    shutdown: Arc<Notify>,
    write_timeout: Duration,
}

impl Broadcaster {
    pub fn new(
        event_rx: mpsc::Receiver<Event>,
        write_timeout: Duration,
    ) -> (Self, BroadcasterHandle) {
        let (sub_tx, sub_rx) = mpsc::channel::<Subscription>(16);
        let shutdown = Arc::new(Notify::new());

        let broadcaster = Broadcaster {
            subscribers: Vec::new(),
            sub_rx,
            event_rx,
            shutdown: shutdown.clone(),
            write_timeout,
        };
        (broadcaster, BroadcasterHandle { sub_tx, shutdown })
    }

    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!("broadcaster starting");
        loop {
            tokio::select! {
                // Pending events go out before new subscriptions are accepted.
                biased;
                _ = self.shutdown.notified() => {
                    info!("broadcaster shutdown requested");
                    break;
                }
                event = self.event_rx.recv() => match event {
                    Some(event) => self.publish(&event).await,
                    None => {
                        info!("event channel closed");
                        break;
                    }
                },
                Some((subscriber, ack)) = self.sub_rx.recv() => {
                    debug!(
                        subscriber = subscriber.id(),
                        total = self.subscribers.len() + 1,
                        "subscriber added"
                    );
                    self.subscribers.push(subscriber);
                    let _ = ack.send(());
                }
            }
        }

        for subscriber in self.subscribers.iter_mut() {
            let _ = timeout(self.write_timeout, subscriber.close()).await;
        }
        info!("broadcaster exited");
    }

    // Every failing subscriber is pruned, not just the first one per event.
    async fn publish(&mut self, event: &Event) {
        let mut i = 0;
        while i < self.subscribers.len() {
            let outcome = timeout(self.write_timeout, self.subscribers[i].send_event(event)).await;
            let error = match outcome {
                Ok(Ok(())) => {
                    i += 1;
                    continue;
                }
                Ok(Err(e)) => e,
                Err(_) => SubscriberError::Timeout,
            };

            // swap_remove moves the last subscriber into slot i; it is tried next.
            let mut subscriber = self.subscribers.swap_remove(i);
            warn!(
                subscriber = subscriber.id(),
                event = event.label(),
                error = %error,
                remaining = self.subscribers.len(),
                "removing subscriber"
            );
            let _ = timeout(self.write_timeout, subscriber.close()).await;
        }
    }
}
