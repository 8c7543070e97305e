//! Output generator
//!
//! Turns the cached units into the exported device list. Units reached over several address
//! families (variants) are folded into one, units are grouped into devices, and within a device
//! units seen over several network interfaces (zones) are folded into one.

use crate::{
	device::{Device, DeviceUnit},
	unit::{Metadata, Realm, ServiceType, UnitId, UnitParameters},
	util::{addrs_from_endpoints, sorted_merge},
};
use std::{collections::HashMap, sync::Arc};
use tokio::time::Instant;

#[derive(Clone, Debug)]
/// A unit as held by the cache and consumed by the output generator.
pub(crate) struct Unit {
	pub(crate) id: UnitId,
	pub(crate) meta: Option<Metadata>,
	pub(crate) params: Option<UnitParameters>,

	/// Published endpoints, sorted
	pub(crate) endpoints: Vec<String>,
}
impl Unit {
	fn merge(&mut self, other: &Unit) {
		self.endpoints = sorted_merge(&self.endpoints, &other.endpoints);
	}

	fn make_model(&self) -> String {
		self.meta.as_ref().map(Metadata::make_model).unwrap_or_default()
	}

	fn export<P>(self, params: P) -> DeviceUnit<P> {
		DeviceUnit {
			id: self.id,
			meta: self.meta.unwrap_or_default(),
			params,
			endpoints: self.endpoints,
		}
	}
}

struct Generated {
	devices: Arc<[Device]>,
	expires: Option<Instant>,
}

#[derive(Default)]
/// The generated device list, kept until it expires or is invalidated.
pub(crate) struct Output {
	generated: Option<Generated>,
}
impl Output {
	/// Returns the previously generated list, if it is still valid at `now`.
	pub(crate) fn cached(&self, now: Instant) -> Option<Arc<[Device]>> {
		match &self.generated {
			Some(generated) if generated.expires.map_or(true, |expires| expires > now) => Some(generated.devices.clone()),
			_ => None,
		}
	}

	pub(crate) fn invalidate(&mut self) {
		self.generated = None;
	}

	/// Generates the device list from `units` and keeps it until `expires`, or indefinitely if `None`.
	pub(crate) fn generate(&mut self, mut units: Vec<Unit>, expires: Option<Instant>) -> Arc<[Device]> {
		units.sort_by(|a, b| a.id.cmp(&b.id));

		let units = merge_by(units, UnitId::without_variant);

		let devices: Arc<[Device]> = group_devices(units)
			.into_iter()
			.map(|units| export_device(merge_by(units, UnitId::without_zone_and_variant)))
			.collect();

		log::trace!("generated {} device(s)", devices.len());

		self.generated = Some(Generated {
			devices: devices.clone(),
			expires,
		});

		devices
	}
}

/// Folds units with the same key into the first of them, keeping the order of first appearance.
fn merge_by<K, F>(units: Vec<Unit>, key: F) -> Vec<Unit>
where
	K: std::hash::Hash + Eq,
	F: Fn(&UnitId) -> K,
{
	let mut merged: Vec<Unit> = Vec::with_capacity(units.len());
	let mut index: HashMap<K, usize> = HashMap::with_capacity(units.len());

	for unit in units {
		match index.get(&key(&unit.id)) {
			Some(&at) => merged[at].merge(&unit),
			None => {
				index.insert(key(&unit.id), merged.len());
				merged.push(unit);
			}
		}
	}

	merged
}

/// Splits units into per-device groups.
///
/// A unit that matches members of several groups joins those groups together.
fn group_devices(units: Vec<Unit>) -> Vec<Vec<Unit>> {
	let mut groups: Vec<Vec<Unit>> = Vec::new();

	for unit in units {
		let matching: Vec<usize> = groups
			.iter()
			.enumerate()
			.filter(|(_, group)| group.iter().any(|member| member.id.same_device(&unit.id)))
			.map(|(at, _)| at)
			.collect();

		match matching.split_first() {
			None => groups.push(vec![unit]),
			Some((&first, rest)) => {
				for &at in rest.iter().rev() {
					let absorbed = groups.remove(at);
					groups[first].extend(absorbed);
				}
				groups[first].push(unit);
			}
		}
	}

	for group in groups.iter_mut() {
		group.sort_by(|a, b| a.id.cmp(&b.id));
	}

	groups
}

/// Realm precedence when choosing the device's make and model.
fn make_model_rank(realm: Realm) -> u8 {
	match realm {
		Realm::Usb => 2,
		Realm::Dnssd => 1,
		Realm::Wsd => 0,
	}
}

fn export_device(units: Vec<Unit>) -> Device {
	let mut device = Device::default();
	let mut make_model_from: Option<u8> = None;

	for unit in units {
		let make_model = unit.make_model();
		let rank = make_model_rank(unit.id.realm);
		if !make_model.is_empty() && make_model_from.map_or(true, |from| rank > from) {
			device.make_model = make_model;
			make_model_from = Some(rank);
		}

		if device.dnssd_name.is_empty() && !unit.id.device_name.is_empty() {
			device.dnssd_name = unit.id.device_name.clone();
			device.dnssd_uuid = unit.id.uuid;
		}

		device.addrs = sorted_merge(&device.addrs, &addrs_from_endpoints(&unit.endpoints));

		match unit.id.svc_type {
			ServiceType::Printer => {
				let params = match &unit.params {
					Some(UnitParameters::Printer(params)) => params.clone(),
					_ => Default::default(),
				};
				device.print_units.push(unit.export(params));
			}

			ServiceType::Faxout => {
				let params = match &unit.params {
					Some(UnitParameters::Printer(params)) => params.clone(),
					_ => Default::default(),
				};
				device.faxout_units.push(unit.export(params));
			}

			ServiceType::Scanner => {
				let params = match &unit.params {
					Some(UnitParameters::Scanner(params)) => params.clone(),
					_ => Default::default(),
				};
				device.scan_units.push(unit.export(params));
			}
		}
	}

	device
}
