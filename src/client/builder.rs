use super::{Client, ClientShared};
use crate::{cache::Cache, queue::EventQueue, REFRESH_TIME, STABILIZATION_TIME, WARM_UP_TIME};
use std::{
	sync::{Arc, Mutex},
	time::Duration,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub struct ClientBuilder {
	warm_up_time: Duration,
	refresh_time: Duration,
	stabilization_time: Duration,
}
impl ClientBuilder {
	pub fn new() -> Self {
		Self {
			warm_up_time: WARM_UP_TIME,
			refresh_time: REFRESH_TIME,
			stabilization_time: STABILIZATION_TIME,
		}
	}

	/// How long after startup [`Mode::Normal`](super::Mode::Normal) queries wait for discovery to settle.
	pub fn warm_up_time(mut self, warm_up_time: Duration) -> Self {
		self.warm_up_time = warm_up_time;
		self
	}

	/// How long after [`Client::refresh`] queries wait for discovery to settle again.
	pub fn refresh_time(mut self, refresh_time: Duration) -> Self {
		self.refresh_time = refresh_time;
		self
	}

	/// How long newly announced endpoints are held back before being published.
	pub fn stabilization_time(mut self, stabilization_time: Duration) -> Self {
		self.stabilization_time = stabilization_time;
		self
	}

	/// Creates the client and spawns its event processing task.
	///
	/// The client stops when `parent` is cancelled. Must be called within a Tokio runtime.
	pub fn build(self, parent: &CancellationToken) -> Client {
		let ClientBuilder {
			warm_up_time,
			refresh_time,
			stabilization_time,
		} = self;

		let shared = Arc::new(ClientShared {
			cache: Mutex::new(Cache::new(Instant::now(), warm_up_time, stabilization_time)),
			backends: Mutex::new(Vec::new()),
			queue: EventQueue::new(),
			cancel: parent.child_token(),
			refresh_time,
		});

		let worker = tokio::spawn(Client::process(shared.clone()));

		Client {
			shared,
			worker: Mutex::new(Some(worker)),
		}
	}
}
impl Default for ClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}
