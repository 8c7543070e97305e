use crate::{
	backend::Backend,
	cache::Cache,
	device::Device,
	errors::{AddBackendError, GetDevicesError},
	queue::EventQueue,
};
use std::{
	sync::{Arc, Mutex, MutexGuard, PoisonError},
	time::Duration,
};
use tokio::{task::JoinHandle, time::Instant};
use tokio_util::sync::CancellationToken;

mod builder;
pub use builder::ClientBuilder;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// How [`Client::get_devices`] treats discovery that hasn't settled yet.
pub enum Mode {
	#[default]
	/// Wait until the warm-up (or refresh) period is over.
	Normal,

	/// Return what is known right now, without waiting.
	Snapshot,

	/// Like [`Mode::Normal`], and also wait until no unit has endpoints held back for stabilization.
	Settled,
}

struct ClientShared {
	cache: Mutex<Cache>,
	backends: Mutex<Vec<Arc<dyn Backend>>>,
	queue: EventQueue,
	cancel: CancellationToken,
	refresh_time: Duration,
}
impl ClientShared {
	fn cache(&self) -> MutexGuard<'_, Cache> {
		self.cache.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn backends(&self) -> MutexGuard<'_, Vec<Arc<dyn Backend>>> {
		self.backends.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

/// Collects discovery events from any number of backends into one device list.
///
/// A single task applies the events to the discovery cache in the order they were queued;
/// [`get_devices`](Client::get_devices) may be called concurrently from anywhere.
///
/// Dropping the client stops event processing. [`close`](Client::close) also waits for processing to
/// stop. Neither closes the attached backends.
pub struct Client {
	shared: Arc<ClientShared>,
	worker: Mutex<Option<JoinHandle<()>>>,
}
impl Client {
	/// Creates a client with the default timings. See [`ClientBuilder`] to change them.
	///
	/// Must be called within a Tokio runtime.
	pub fn new(parent: &CancellationToken) -> Self {
		ClientBuilder::new().build(parent)
	}

	/// Attaches a backend and starts it.
	///
	/// Attaching the same backend instance twice is a caller bug and is refused.
	pub fn add_backend(&self, backend: Arc<dyn Backend>) -> Result<(), AddBackendError> {
		{
			let mut backends = self.shared.backends();

			let ptr = Arc::as_ptr(&backend) as *const ();
			if backends.iter().any(|added| Arc::as_ptr(added) as *const () == ptr) {
				return Err(AddBackendError::AlreadyAdded(backend.name().to_owned()));
			}

			backends.push(backend.clone());
		}

		log::debug!("{}: backend added", backend.name());
		backend.start(self.shared.queue.clone());

		Ok(())
	}

	/// Returns the discovered devices.
	///
	/// Depending on `mode`, this may first wait for discovery to settle. Waiting ends early with
	/// [`GetDevicesError::Canceled`] when either `cancel` or the client is cancelled; that is the only
	/// way this fails.
	pub async fn get_devices(&self, cancel: &CancellationToken, mode: Mode) -> Result<Arc<[Device]>, GetDevicesError> {
		self.get_devices_until(Some(cancel), None, mode).await
	}

	/// Like [`get_devices`](Client::get_devices), but gives up with
	/// [`GetDevicesError::DeadlineExceeded`] after `timeout`.
	pub async fn get_devices_timeout(&self, timeout: Duration, mode: Mode) -> Result<Arc<[Device]>, GetDevicesError> {
		self.get_devices_until(None, Some(Instant::now() + timeout), mode).await
	}

	async fn get_devices_until(&self, cancel: Option<&CancellationToken>, deadline: Option<Instant>, mode: Mode) -> Result<Arc<[Device]>, GetDevicesError> {
		if mode != Mode::Snapshot {
			self.wait_ready(cancel, deadline, mode).await?;
		}

		Ok(self.shared.cache().export(Instant::now()))
	}

	async fn wait_ready(&self, cancel: Option<&CancellationToken>, deadline: Option<Instant>, mode: Mode) -> Result<(), GetDevicesError> {
		let never = CancellationToken::new();
		let cancel = cancel.unwrap_or(&never);

		loop {
			if cancel.is_cancelled() || self.shared.cancel.is_cancelled() {
				return Err(GetDevicesError::Canceled);
			}

			let now = Instant::now();
			if matches!(deadline, Some(deadline) if deadline <= now) {
				return Err(GetDevicesError::DeadlineExceeded);
			}

			let ready = self.shared.cache().ready_at(mode, now);
			if ready <= now {
				return Ok(());
			}

			tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(GetDevicesError::Canceled),
				_ = self.shared.cancel.cancelled() => return Err(GetDevicesError::Canceled),
				_ = tokio::time::sleep_until(deadline.unwrap_or(now)), if deadline.is_some() => {
					return Err(GetDevicesError::DeadlineExceeded);
				}

				// Readiness is re-evaluated on wakeup: in Mode::Settled new endpoints may push it further
				_ = tokio::time::sleep_until(ready) => {}
			}
		}
	}

	/// Makes [`Mode::Normal`] and [`Mode::Settled`] queries wait for discovery to settle again.
	///
	/// Returns immediately.
	pub fn refresh(&self) {
		log::debug!("refresh requested");
		self.shared.cache().refresh(Instant::now(), self.shared.refresh_time);
	}

	/// Stops event processing and waits for it to finish.
	///
	/// Attached backends are left running; closing them is up to whoever created them. Events they
	/// push afterwards are never applied.
	pub async fn close(&self) {
		self.shared.cancel.cancel();

		let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take();
		if let Some(worker) = worker {
			worker.await.ok();
		}
	}

	/// The event processing task.
	async fn process(shared: Arc<ClientShared>) {
		log::debug!("discovery client started");

		while let Ok(event) = shared.queue.pull(&shared.cancel).await {
			let name = event.name();
			let id = event.id().clone();

			match shared.cache().apply(event, Instant::now()) {
				Ok(()) => log::debug!("{name}: {id}"),

				// A misbehaving backend only loses the offending event
				Err(err) => log::error!("{name}: {id}: {err}"),
			}
		}

		log::debug!("discovery client stopped");
	}
}
impl Drop for Client {
	fn drop(&mut self) {
		self.shared.cancel.cancel();
	}
}
