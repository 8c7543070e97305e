//! The discovery cache
//!
//! One entry per unit announced by the backends. Newly announced endpoints are not published right
//! away: they sit in a staging area until the stabilization time after the first of them has
//! passed. This merges bursts of endpoint announcements (e.g. a device's IPv4 and IPv6 addresses,
//! which tend to arrive a moment apart) into a single visible update.
//!
//! The cache never reads the clock itself; time-dependent operations take `now`.

use crate::{
	client::Mode,
	device::Device,
	errors::CacheError,
	event::Event,
	output::{Output, Unit},
	unit::{Metadata, PrinterParameters, ScannerParameters, ServiceType, UnitId, UnitParameters},
	util::{sorted_contains, sorted_insert, sorted_merge, sorted_remove},
};
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tokio::time::Instant;

struct CacheEntry {
	unit: Unit,

	/// Newly discovered endpoints, not yet published. Sorted, disjoint from `unit.endpoints`.
	staging_endpoints: Vec<String>,

	/// End of the staging interval, if one is running
	staging_done_at: Option<Instant>,
}
impl CacheEntry {
	fn new(id: UnitId) -> Self {
		Self {
			unit: Unit {
				id,
				meta: None,
				params: None,
				endpoints: Vec::new(),
			},
			staging_endpoints: Vec::new(),
			staging_done_at: None,
		}
	}

	fn contains_endpoint(&self, endpoint: &String) -> bool {
		sorted_contains(&self.unit.endpoints, endpoint) || sorted_contains(&self.staging_endpoints, endpoint)
	}

	/// Starts the staging interval unless one is already running.
	///
	/// A running interval is never extended, so a steady trickle of endpoints can't hold back
	/// publication forever.
	fn staging_begin(&mut self, now: Instant, stabilization_time: Duration) {
		if self.staging_done_at.is_none() {
			self.staging_done_at = Some(now + stabilization_time);
		}
	}

	/// Publishes staged endpoints if the staging interval is over.
	fn staging_check(&mut self, now: Instant) {
		if matches!(self.staging_done_at, Some(done_at) if done_at <= now) {
			self.unit.endpoints = sorted_merge(&self.unit.endpoints, &self.staging_endpoints);
			self.staging_endpoints.clear();
			self.staging_done_at = None;
		}
	}
}

pub(crate) struct Cache {
	/// When the cache is considered warmed up
	ready_at: Instant,
	stabilization_time: Duration,
	entries: BTreeMap<UnitId, CacheEntry>,
	out: Output,
}
impl Cache {
	pub(crate) fn new(now: Instant, warm_up_time: Duration, stabilization_time: Duration) -> Self {
		Self {
			ready_at: now + warm_up_time,
			stabilization_time,
			entries: BTreeMap::new(),
			out: Output::default(),
		}
	}

	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}

	#[cfg(test)]
	pub(crate) fn contains(&self, id: &UnitId) -> bool {
		self.entries.contains_key(id)
	}

	/// When the cache may be exported in the given mode.
	pub(crate) fn ready_at(&mut self, mode: Mode, now: Instant) -> Instant {
		match mode {
			Mode::Snapshot => now,
			Mode::Normal => self.ready_at,
			Mode::Settled => {
				// A cached output doesn't short-circuit this: it may have been generated while
				// endpoints were still staged
				let mut ready = self.ready_at;
				for entry in self.entries.values_mut() {
					entry.staging_check(now);
					if let Some(done_at) = entry.staging_done_at {
						ready = ready.max(done_at);
					}
				}
				ready
			}
		}
	}

	/// Makes the cache look cold again until `now + refresh_time`.
	pub(crate) fn refresh(&mut self, now: Instant, refresh_time: Duration) {
		self.ready_at = self.ready_at.max(now + refresh_time);
		self.out.invalidate();
	}

	/// Exports the devices, reusing the previously generated list while it is still valid.
	pub(crate) fn export(&mut self, now: Instant) -> Arc<[Device]> {
		if let Some(devices) = self.out.cached(now) {
			return devices;
		}

		// The list must be rebuilt when the next staging interval ends
		let mut expires: Option<Instant> = None;
		let mut units = Vec::with_capacity(self.entries.len());

		for entry in self.entries.values_mut() {
			entry.staging_check(now);
			if let Some(done_at) = entry.staging_done_at {
				expires = Some(expires.map_or(done_at, |expires| expires.min(done_at)));
			}
			units.push(entry.unit.clone());
		}

		self.out.generate(units, expires)
	}

	/// Applies one event to the cache.
	pub(crate) fn apply(&mut self, event: Event, now: Instant) -> Result<(), CacheError> {
		match event {
			Event::AddUnit { id } => self.add_unit(id),
			Event::DelUnit { id } => self.del_unit(&id),
			Event::Metadata { id, meta } => self.set_metadata(&id, meta),
			Event::PrinterParameters { id, meta, printer } => self.set_printer_parameters(&id, meta, printer),
			Event::ScannerParameters { id, scanner } => self.set_scanner_parameters(&id, scanner),
			Event::FaxoutParameters { id, faxout } => self.set_faxout_parameters(&id, faxout),
			Event::AddEndpoints { id, endpoints } => self.add_endpoints(&id, endpoints, now),
			Event::DelEndpoints { id, endpoints } => self.del_endpoints(&id, &endpoints),
		}
	}

	pub(crate) fn add_unit(&mut self, id: UnitId) -> Result<(), CacheError> {
		if self.entries.contains_key(&id) {
			return Err(CacheError::UnitExists);
		}

		self.entries.insert(id.clone(), CacheEntry::new(id));
		self.out.invalidate();
		Ok(())
	}

	pub(crate) fn del_unit(&mut self, id: &UnitId) -> Result<(), CacheError> {
		self.entries.remove(id).ok_or(CacheError::UnknownUnit)?;
		self.out.invalidate();
		Ok(())
	}

	pub(crate) fn set_metadata(&mut self, id: &UnitId, meta: Metadata) -> Result<(), CacheError> {
		let entry = self.entries.get_mut(id).ok_or(CacheError::UnknownUnit)?;
		entry.unit.meta = Some(meta);
		self.out.invalidate();
		Ok(())
	}

	/// Saves printer parameters together with the metadata that comes with them.
	pub(crate) fn set_printer_parameters(&mut self, id: &UnitId, meta: Metadata, mut params: PrinterParameters) -> Result<(), CacheError> {
		params.fixup();
		self.set_parameters(id, ServiceType::Printer, UnitParameters::Printer(params))?;
		self.set_metadata(id, meta)
	}

	pub(crate) fn set_scanner_parameters(&mut self, id: &UnitId, params: ScannerParameters) -> Result<(), CacheError> {
		self.set_parameters(id, ServiceType::Scanner, UnitParameters::Scanner(params))
	}

	/// Fax-out parameters share the printer parameters shape.
	pub(crate) fn set_faxout_parameters(&mut self, id: &UnitId, mut params: PrinterParameters) -> Result<(), CacheError> {
		params.fixup();
		self.set_parameters(id, ServiceType::Faxout, UnitParameters::Printer(params))
	}

	fn set_parameters(&mut self, id: &UnitId, expected: ServiceType, params: UnitParameters) -> Result<(), CacheError> {
		let entry = self.entries.get_mut(id).ok_or(CacheError::UnknownUnit)?;

		if entry.unit.id.svc_type != expected {
			return Err(CacheError::ServiceMismatch {
				unit: entry.unit.id.svc_type,
				expected,
			});
		}

		entry.unit.params = Some(params);
		self.out.invalidate();
		Ok(())
	}

	/// Adds endpoints to the unit's staging area.
	///
	/// Either all endpoints are added, or none: a single already known endpoint rejects the batch.
	pub(crate) fn add_endpoints(&mut self, id: &UnitId, endpoints: Vec<String>, now: Instant) -> Result<(), CacheError> {
		let entry = self.entries.get_mut(id).ok_or(CacheError::UnknownUnit)?;

		let mut staged = entry.staging_endpoints.clone();
		for endpoint in endpoints {
			if entry.contains_endpoint(&endpoint) || !sorted_insert(&mut staged, endpoint.clone()) {
				return Err(CacheError::EndpointExists(endpoint));
			}
		}

		if staged.len() == entry.staging_endpoints.len() {
			return Ok(());
		}

		entry.staging_begin(now, self.stabilization_time);
		entry.staging_endpoints = staged;
		self.out.invalidate();
		Ok(())
	}

	/// Removes endpoints from the unit, published or staged. Removal takes effect immediately.
	///
	/// Either all endpoints are removed, or none.
	pub(crate) fn del_endpoints(&mut self, id: &UnitId, endpoints: &[String]) -> Result<(), CacheError> {
		let entry = self.entries.get_mut(id).ok_or(CacheError::UnknownUnit)?;

		if let Some(unknown) = endpoints.iter().find(|endpoint| !entry.contains_endpoint(endpoint)) {
			return Err(CacheError::UnknownEndpoint(unknown.clone()));
		}

		for endpoint in endpoints {
			if !sorted_remove(&mut entry.unit.endpoints, endpoint) {
				sorted_remove(&mut entry.staging_endpoints, endpoint);
			}
		}

		if entry.staging_endpoints.is_empty() {
			entry.staging_done_at = None;
		}

		self.out.invalidate();
		Ok(())
	}

	/// Published and staged endpoints of a unit, for inspection.
	#[cfg(test)]
	pub(crate) fn endpoints(&self, id: &UnitId) -> Option<(&[String], &[String])> {
		self.entries
			.get(id)
			.map(|entry| (entry.unit.endpoints.as_slice(), entry.staging_endpoints.as_slice()))
	}

	#[cfg(test)]
	pub(crate) fn metadata(&self, id: &UnitId) -> Option<&Metadata> {
		self.entries.get(id).and_then(|entry| entry.unit.meta.as_ref())
	}
}
