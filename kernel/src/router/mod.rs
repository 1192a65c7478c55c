//! Routing of channel and packet messages to application modules.
//!
//! The kernel owns no applications. The host registers each application
//! module under a [`ModuleId`], binds ports to modules, and hands a
//! [`Router`] to [`crate::entrypoint::dispatch`], which invokes the
//! module's callbacks around the core state transitions.

mod module;

pub use module::{Module, ModuleExtras};

use core::fmt::{Display, Error as FmtError, Formatter};

use displaydoc::Display as DisplayDoc;

use crate::host::identifiers::PortId;
use crate::prelude::*;

/// Identifies a registered application module.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

/// A single key/value attribute of a module event.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleEventAttribute {
    pub key: String,
    pub value: String,
}

/// An event produced by an application callback, surfaced alongside the
/// kernel's own events.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleEvent {
    pub kind: String,
    pub attributes: Vec<ModuleEventAttribute>,
}

#[derive(Debug, DisplayDoc)]
pub enum RouterError {
    /// no module is bound to port `{port_id}`
    UnknownPort { port_id: PortId },
    /// module `{module_id}` is registered in the router but has no route
    MissingModule { module_id: ModuleId },
}

#[cfg(feature = "std")]
impl std::error::Error for RouterError {}

/// The host's table of application modules.
pub trait Router {
    /// Resolves a module identifier to the module itself.
    fn get_route(&self, module_id: &ModuleId) -> Option<&dyn Module>;

    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module>;

    /// Resolves the module bound to a port.
    fn lookup_module(&self, port_id: &PortId) -> Option<ModuleId>;
}
