//! Filtered views over a broadcast event stream.

use futures::Stream;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::domain::FlowEvent;

/// A live view over a broadcast channel that keeps only the events `select`
/// maps to a value.
///
/// Ends (`None`) once the controller producing the events stops. A lagging
/// view skips the events it missed.
#[derive(Debug)]
pub struct Projection<T, E = FlowEvent> {
    name: &'static str,
    rx: broadcast::Receiver<E>,
    select: fn(E) -> Option<T>,
}

impl<T, E: Clone> Projection<T, E> {
    /// Create a projection from a receiver and a selector
    pub fn new(name: &'static str, rx: broadcast::Receiver<E>, select: fn(E) -> Option<T>) -> Self {
        Self { name, rx, select }
    }

    /// Wait for the next selected value
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if let Some(value) = (self.select)(event) {
                        return Some(value);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(projection = self.name, skipped, "Projection lagged, events skipped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next selected value if one is already buffered
    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    if let Some(value) = (self.select)(event) {
                        return Some(value);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(projection = self.name, skipped, "Projection lagged, events skipped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// A new projection with the same selector, seeing only events sent
    /// from now on
    pub fn resubscribe(&self) -> Self {
        Self {
            name: self.name,
            rx: self.rx.resubscribe(),
            select: self.select,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Consume the projection as a `Stream`
    pub fn into_stream(self) -> impl Stream<Item = T> {
        futures::stream::unfold(self, |mut projection| async move {
            projection.recv().await.map(|value| (value, projection))
        })
    }
}
