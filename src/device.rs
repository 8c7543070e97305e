use crate::unit::{Metadata, PrinterParameters, ScannerParameters, UnitId};
use std::net::IpAddr;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One exported print, scan or fax-out unit of a [`Device`].
pub struct DeviceUnit<P> {
	/// ID of the first of the merged units
	pub id: UnitId,
	pub meta: Metadata,
	pub params: P,

	/// Endpoint URLs, sorted
	pub endpoints: Vec<String>,
}

pub type PrintUnit = DeviceUnit<PrinterParameters>;
pub type ScanUnit = DeviceUnit<ScannerParameters>;
pub type FaxoutUnit = DeviceUnit<PrinterParameters>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A discovered device, as merged from every unit that was found to belong to it.
///
/// Devices are snapshots. They are regenerated whenever the discovery state changes and never
/// updated in place.
pub struct Device {
	/// Manufacturer and model. USB findings take precedence over DNS-SD, which takes precedence over
	/// anything else.
	pub make_model: String,

	/// Device name of the first unit that has one, empty if none does.
	///
	/// For devices found over DNS-SD this is the instance name. Devices seen only over WS-Discovery
	/// or USB report their name in that realm here.
	pub dnssd_name: String,

	/// UUID reported along with `dnssd_name`
	pub dnssd_uuid: Uuid,

	/// IP addresses found in the endpoints of all units, sorted
	pub addrs: Vec<IpAddr>,

	pub print_units: Vec<PrintUnit>,
	pub scan_units: Vec<ScanUnit>,
	pub faxout_units: Vec<FaxoutUnit>,
}
impl Device {
	/// Total number of units of all kinds.
	pub fn units_count(&self) -> usize {
		self.print_units.len() + self.scan_units.len() + self.faxout_units.len()
	}

	/// IDs of all units of the device.
	pub fn unit_ids(&self) -> impl Iterator<Item = &UnitId> + '_ {
		self.print_units
			.iter()
			.map(|unit| &unit.id)
			.chain(self.scan_units.iter().map(|unit| &unit.id))
			.chain(self.faxout_units.iter().map(|unit| &unit.id))
	}
}
