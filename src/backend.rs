use crate::queue::EventQueue;

/// A source of discovery events for one protocol or realm.
///
/// Backends are attached with [`Client::add_backend`](crate::client::Client::add_backend). The
/// client never looks into protocol details; it only consumes the [`Event`](crate::event::Event)s a
/// backend pushes.
pub trait Backend: Send + Sync {
	/// Backend name, for logging.
	fn name(&self) -> &str;

	/// Starts discovery. Events are pushed into `queue` from then on.
	///
	/// Must return without waiting for discovery to make progress.
	fn start(&self, queue: EventQueue);

	/// Stops discovery and releases the backend's resources.
	///
	/// Nothing may be pushed into the queue once this returns.
	fn close(&self);
}
