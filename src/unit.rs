//! Unit identity, metadata and per-service parameters

use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A discovery realm.
///
/// Realms are independent namespaces: units from different realms are only ever combined by the
/// device grouping heuristics, never by identity.
pub enum Realm {
	#[default]
	/// DNS-SD (mDNS or unicast DNS)
	Dnssd,

	/// WS-Discovery
	Wsd,

	/// Locally attached USB devices
	Usb,
}
impl fmt::Display for Realm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Realm::Dnssd => "DNS-SD",
			Realm::Wsd => "WSD",
			Realm::Usb => "USB",
		})
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// The kind of service a unit provides.
pub enum ServiceType {
	#[default]
	Printer,
	Scanner,
	Faxout,
}
impl fmt::Display for ServiceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ServiceType::Printer => "printer",
			ServiceType::Scanner => "scanner",
			ServiceType::Faxout => "faxout",
		})
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// The wire protocol a unit speaks.
pub enum ServiceProto {
	#[default]
	Ipp,
	Escl,
	Lpd,
	AppSocket,
	Wsd,
	Usb,
}
impl fmt::Display for ServiceProto {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ServiceProto::Ipp => "IPP",
			ServiceProto::Escl => "eSCL",
			ServiceProto::Lpd => "LPD",
			ServiceProto::AppSocket => "AppSocket",
			ServiceProto::Wsd => "WSD",
			ServiceProto::Usb => "USB",
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifies one logical print, scan or fax unit as seen by one backend.
///
/// Not every field makes sense for every discovery protocol; backends leave the irrelevant ones at
/// their defaults. `zone` and `variant` take part in identity, but the output generator folds units
/// that differ only in these fields into one exported unit.
pub struct UnitId {
	/// Realm-unique device name, e.g. "Kyocera ECOSYS M2040dn"
	pub device_name: String,

	/// Device UUID, nil if unknown
	pub uuid: Uuid,

	/// Logical unit within a device, e.g. an LPD queue
	pub unit_name: String,

	pub realm: Realm,

	/// Sub-namespace within the realm, usually the network interface
	pub zone: String,

	/// Distinguishes equivalent findings of the same unit, usually the address family
	pub variant: String,

	pub svc_type: ServiceType,
	pub svc_proto: ServiceProto,

	/// Device serial number, mostly for USB
	pub serial: String,
}
impl UnitId {
	/// Returns a copy of this ID with the variant cleared.
	pub fn without_variant(&self) -> UnitId {
		UnitId {
			variant: String::new(),
			..self.clone()
		}
	}

	/// Returns a copy of this ID with both the zone and the variant cleared.
	///
	/// A unit merged across variants keeps the variant of its first member, so the variant must
	/// not take part in the cross-zone key.
	pub fn without_zone_and_variant(&self) -> UnitId {
		UnitId {
			zone: String::new(),
			variant: String::new(),
			..self.clone()
		}
	}

	/// Reports whether two units belong to the same physical device.
	///
	/// Units match when they carry the same non-nil UUID, or the same non-empty device name within
	/// the same realm.
	pub fn same_device(&self, other: &UnitId) -> bool {
		if !self.uuid.is_nil() && self.uuid == other.uuid {
			return true;
		}

		!self.device_name.is_empty() && self.device_name == other.device_name && self.realm == other.realm
	}
}
impl fmt::Display for UnitId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {} {}", self.realm, self.svc_proto, self.svc_type)?;

		if !self.device_name.is_empty() {
			write!(f, " name={:?}", self.device_name)?;
		}
		if !self.uuid.is_nil() {
			write!(f, " uuid={}", self.uuid)?;
		}
		if !self.unit_name.is_empty() {
			write!(f, " unit={:?}", self.unit_name)?;
		}
		if !self.zone.is_empty() {
			write!(f, " zone={}", self.zone)?;
		}
		if !self.variant.is_empty() {
			write!(f, " variant={}", self.variant)?;
		}
		if !self.serial.is_empty() {
			write!(f, " serial={}", self.serial)?;
		}

		Ok(())
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Human-readable device identification.
///
/// Backends supply either `make_and_model`, or both `manufacturer` and `model`.
pub struct Metadata {
	/// E.g. "Hewlett Packard" or "Canon"
	pub manufacturer: String,
	pub model: String,
	pub make_and_model: String,
}
impl Metadata {
	/// Returns the combined make and model string.
	pub fn make_model(&self) -> String {
		if !self.make_and_model.is_empty() {
			return self.make_and_model.clone();
		}

		match (self.manufacturer.is_empty(), self.model.is_empty()) {
			(true, _) => self.model.clone(),
			(false, true) => self.manufacturer.clone(),
			(false, false) if self.model.starts_with(&self.manufacturer) => self.model.clone(),
			(false, false) => format!("{} {}", self.manufacturer, self.model),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Parameters of a print unit. Fax-out units share this shape.
pub struct PrinterParameters {
	pub location: String,
	pub admin_url: String,

	/// Supported page description languages, as MIME types
	pub pdl: Vec<String>,

	/// Queue priority, 0 is the highest
	pub priority: Option<u8>,

	/// PPD model name, without the surrounding parentheses
	pub ppd: String,

	pub color: bool,
	pub duplex: bool,
	pub copies: bool,
	pub collate: bool,
	pub staple: bool,
	pub punch: bool,
	pub bind: bool,
}
impl PrinterParameters {
	/// Normalizes parameters received from a backend.
	///
	/// Empty and repeated PDL entries are dropped and out-of-range priorities are forgotten.
	pub(crate) fn fixup(&mut self) {
		let mut seen = Vec::with_capacity(self.pdl.len());
		self.pdl.retain(|pdl| {
			if pdl.is_empty() || seen.contains(pdl) {
				false
			} else {
				seen.push(pdl.clone());
				true
			}
		});

		if matches!(self.priority, Some(priority) if priority >= 100) {
			self.priority = None;
		}

		if let Some(ppd) = self.ppd.strip_prefix('(').and_then(|ppd| ppd.strip_suffix(')')) {
			self.ppd = ppd.to_owned();
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Document sources a scanner offers.
pub struct ScanSources {
	pub platen: bool,
	pub adf: bool,
	pub adf_duplex: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Parameters of a scan unit.
pub struct ScannerParameters {
	pub location: String,
	pub admin_url: String,
	pub sources: ScanSources,

	/// Supported output formats, as MIME types
	pub formats: Vec<String>,

	/// Supported color modes, e.g. "color", "grayscale", "binary"
	pub color_modes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Parameters held for a unit, according to its service type.
pub enum UnitParameters {
	Printer(PrinterParameters),
	Scanner(ScannerParameters),
}
