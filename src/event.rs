use crate::unit::{Metadata, PrinterParameters, ScannerParameters, UnitId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A discovery fact reported by a [`Backend`](crate::backend::Backend).
///
/// Every event except [`Event::AddUnit`] requires its unit to have been added and not yet
/// deleted. Events that break their preconditions are logged and dropped by the client.
pub enum Event {
	/// A new unit was discovered. The ID must not be known yet.
	AddUnit { id: UnitId },

	/// A previously announced unit has gone away.
	DelUnit { id: UnitId },

	/// Unit metadata became available or changed.
	Metadata { id: UnitId, meta: Metadata },

	/// Printer parameters and metadata became available or changed. Printer units only.
	PrinterParameters { id: UnitId, meta: Metadata, printer: PrinterParameters },

	/// Scanner parameters became available or changed. Scanner units only.
	ScannerParameters { id: UnitId, scanner: ScannerParameters },

	/// Fax-out parameters became available or changed. Fax-out units only.
	FaxoutParameters { id: UnitId, faxout: PrinterParameters },

	/// New endpoint URLs. None of them may be known for the unit already.
	AddEndpoints { id: UnitId, endpoints: Vec<String> },

	/// Endpoint URLs that are no longer reachable. All of them must be known for the unit.
	DelEndpoints { id: UnitId, endpoints: Vec<String> },
}
impl Event {
	/// Short event name, for logging.
	pub fn name(&self) -> &'static str {
		match self {
			Event::AddUnit { .. } => "add-unit",
			Event::DelUnit { .. } => "del-unit",
			Event::Metadata { .. } => "metadata",
			Event::PrinterParameters { .. } => "printer-parameters",
			Event::ScannerParameters { .. } => "scanner-parameters",
			Event::FaxoutParameters { .. } => "faxout-parameters",
			Event::AddEndpoints { .. } => "add-endpoints",
			Event::DelEndpoints { .. } => "del-endpoints",
		}
	}

	/// The unit this event relates to.
	pub fn id(&self) -> &UnitId {
		match self {
			Event::AddUnit { id }
			| Event::DelUnit { id }
			| Event::Metadata { id, .. }
			| Event::PrinterParameters { id, .. }
			| Event::ScannerParameters { id, .. }
			| Event::FaxoutParameters { id, .. }
			| Event::AddEndpoints { id, .. }
			| Event::DelEndpoints { id, .. } => id,
		}
	}
}
