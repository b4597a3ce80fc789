//! Small helpers over rosrust pub/sub used by the action client.

use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::error::Error;

/// Subscribes to `topic` and queues every message for later pickup.
pub struct FifoSubscriber<T> {
    topic: String,
    receiver: flume::Receiver<T>,
    _subscriber: rosrust::Subscriber,
}

impl<T: rosrust::Message> FifoSubscriber<T> {
    pub fn new(topic: &str, queue_size: usize) -> Result<Self, Error> {
        let (sender, receiver) = flume::unbounded();
        let subscriber = rosrust::subscribe(topic, queue_size, move |message: T| {
            // The receiver lives as long as the subscription; a send can
            // only fail during teardown.
            let _ = sender.send(message);
        })
        .map_err(|e| Error::Ros(format!("failed to subscribe to {topic}: {e}")))?;
        Ok(Self {
            topic: topic.to_owned(),
            receiver,
            _subscriber: subscriber,
        })
    }

    /// Next queued message, waiting until `deadline` at most; `None`
    /// waits with no deadline.
    pub fn recv_deadline(&self, deadline: Option<Instant>) -> Result<Option<T>, Error> {
        let received = match deadline {
            Some(deadline) => self.receiver.recv_deadline(deadline),
            None => self
                .receiver
                .recv()
                .map_err(|_| flume::RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(message) => Ok(Some(message)),
            Err(flume::RecvTimeoutError::Timeout) => Ok(None),
            Err(flume::RecvTimeoutError::Disconnected) => Err(Error::Ros(format!(
                "subscription to {} is closed",
                self.topic
            ))),
        }
    }

    /// Everything queued right now, without waiting.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T> fmt::Debug for FifoSubscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoSubscriber")
            .field("topic", &self.topic)
            .field("queued", &self.receiver.len())
            .finish()
    }
}

/// The moment `timeout` from now lands on the clock, or `None` when it
/// does not fit, as with `Duration::MAX` from wait-forever callers.
pub fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

/// Blocks until `publisher` sees at least one subscriber.
///
/// Returns false if `deadline` passes or rosrust shuts down first; a
/// `None` deadline only stops on shutdown.
pub fn wait_subscriber<T>(
    publisher: &rosrust::Publisher<T>,
    deadline: Option<Instant>,
    poll_rate: f64,
) -> bool
where
    T: rosrust::Message,
{
    let rate = rosrust::rate(poll_rate);
    while rosrust::is_ok() && deadline.map_or(true, |deadline| Instant::now() < deadline) {
        if publisher.subscriber_count() != 0 {
            // One more sleep so the fresh connection finishes its
            // handshake before the first message goes out.
            rate.sleep();
            return true;
        }
        rate.sleep();
    }
    false
}
