use crate::{errors::GetDevicesError, event::Event};
use std::{
	collections::VecDeque,
	sync::{Arc, Mutex},
};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

struct EventQueueInner {
	events: Mutex<VecDeque<Event>>,
	wakeup: Notify,
}

#[derive(Clone)]
/// The mailbox backends push discovery events into.
///
/// Cloning the queue yields another handle to the same buffer. Pushing never blocks; events are
/// pulled by the client's processing task in the order they were pushed.
pub struct EventQueue(Arc<EventQueueInner>);
impl EventQueue {
	pub(crate) fn new() -> Self {
		Self(Arc::new(EventQueueInner {
			events: Mutex::new(VecDeque::new()),
			wakeup: Notify::new(),
		}))
	}

	/// Appends an event to the queue and wakes the consumer.
	pub fn push(&self, event: Event) {
		self.0.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push_back(event);

		// Stores a permit when nobody waits, so a push racing with pull is never lost
		self.0.wakeup.notify_one();
	}

	/// Number of events waiting to be pulled.
	pub fn len(&self) -> usize {
		self.0.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Removes and returns the oldest event, waiting for one if the queue is empty.
	pub(crate) async fn pull(&self, cancel: &CancellationToken) -> Result<Event, GetDevicesError> {
		loop {
			if let Some(event) = self.try_pull() {
				return Ok(event);
			}

			tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(GetDevicesError::Canceled),
				_ = self.0.wakeup.notified() => {}
			}
		}
	}

	fn try_pull(&self) -> Option<Event> {
		self.0.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).pop_front()
	}
}
impl std::fmt::Debug for EventQueue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventQueue").field("len", &self.len()).finish()
	}
}
