//! The simulated system: units, their reliability state, and the
//! failure-dependency tree that decides when the system as a whole is dead.
//!
//! A [`System`] is built from a TOML chip description (see [`manifest`]):
//! a registry of [`Unit`]s, each carrying one operating trace per surviving
//! configuration, and a tree of [`Group`]s whose failure predicate counts
//! failed children against a tolerance threshold. Unit leaves are shared
//! between the tree and the registry; the registry owns them.

pub mod config;
pub mod error;
pub mod manifest;
pub mod tree;
pub mod unit;

pub use config::Configuration;
pub use error::{Result, SystemError};
pub use manifest::SystemManifest;
pub use tree::{ComponentId, Group, GroupId, System};
pub use unit::{Unit, UnitId, UnitKind};
