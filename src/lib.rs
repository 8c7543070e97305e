//! Printer and scanner discovery engine
//!
//! Discovery protocols ([`Backend`]s) report low-level facts about the print, scan and fax units
//! they find as [`Event`]s. The [`Client`] applies these to its cache and exports a merged,
//! de-duplicated list of [`Device`]s: one device per physical machine, however many protocols,
//! network interfaces and address families it was seen through.

#![cfg_attr(docsrs, feature(doc_cfg))]

use std::time::Duration;

#[macro_use]
extern crate thiserror;

mod cache;
mod output;
mod util;

pub mod backend;
pub mod client;
pub mod device;
pub mod errors;
pub mod event;
pub mod queue;
pub mod unit;

/// How long discovery is given to settle after the client starts.
pub const WARM_UP_TIME: Duration = Duration::from_secs(5);

/// How long discovery is given to settle after [`Client::refresh`].
pub const REFRESH_TIME: Duration = Duration::from_secs(5);

/// How long newly discovered endpoints are held back, so that endpoints announced in quick
/// succession become visible together.
pub const STABILIZATION_TIME: Duration = Duration::from_secs(1);

pub use backend::Backend;
pub use client::{Client, ClientBuilder, Mode};
pub use device::{Device, DeviceUnit, FaxoutUnit, PrintUnit, ScanUnit};
pub use event::Event;
pub use queue::EventQueue;
pub use unit::{Metadata, PrinterParameters, Realm, ScanSources, ScannerParameters, ServiceProto, ServiceType, UnitId};

pub use uuid::Uuid;
