//! ArchSpec data model: the canonical intermediate representation that every
//! Cloudwright subsystem reads and writes.

mod archspec;
mod boundary;
mod component;
mod connection;
mod constraints;
mod cost;
mod diff;
mod error;
mod ident;
mod provider;
mod validation;
mod value;

pub use archspec::{Alternative, ArchSpec};
pub use boundary::Boundary;
pub use component::Component;
pub use connection::Connection;
pub use constraints::Constraints;
pub use cost::{ComponentCost, CostEstimate};
pub use diff::{ChangeKind, ConnectionChange, DiffResult, FieldChange};
pub use error::{InvalidSpec, Result};
pub use ident::is_iac_safe;
pub use provider::Provider;
pub use validation::{Severity, ValidationCheck, ValidationResult};
pub use value::{ConfigMap, Value};
