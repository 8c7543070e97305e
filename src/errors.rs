use crate::unit::ServiceType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// A backend broke the event protocol. The offending event is dropped and the cache is untouched.
pub enum CacheError {
	#[error("unit already added")]
	/// [`Event::AddUnit`](crate::event::Event::AddUnit) for a unit that already exists
	UnitExists,

	#[error("unknown unit")]
	/// The event refers to a unit that was never added or was already deleted
	UnknownUnit,

	#[error("unit is {unit}, must be {expected}")]
	/// Parameters of the wrong kind for the unit's service type
	ServiceMismatch { unit: ServiceType, expected: ServiceType },

	#[error("endpoint already added: {0}")]
	/// The endpoint is already published or staged for this unit
	EndpointExists(String),

	#[error("unknown endpoint: {0}")]
	/// The endpoint is neither published nor staged for this unit
	UnknownEndpoint(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Why [`Client::get_devices`](crate::client::Client::get_devices) gave up waiting.
pub enum GetDevicesError {
	#[error("operation canceled")]
	/// The caller's token or the client itself was cancelled
	Canceled,

	#[error("deadline exceeded")]
	/// The caller's deadline passed first
	DeadlineExceeded,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// A backend could not be attached to the client.
pub enum AddBackendError {
	#[error("backend {0} already added")]
	/// The very same backend instance is already attached
	AlreadyAdded(String),
}
