//! Validated, unit-aware configuration pipeline for NMR spectrum simulation.
//!
//! Loose JSON mappings are compiled into immutable [`models::Site`],
//! [`models::Isotopomer`] and [`models::Spectrum`] values, composed in a
//! [`simulator::Simulator`] and handed to an external [`simulator::Kernel`].

pub mod common;
pub mod domain;
pub mod methods;
pub mod models;
pub mod simulator;

pub use common::{IsotopeProperties, IsotopeTable, NucleusResolver, NucleusSymbol, PhysicalQuantity};
pub use domain::{ErrorCategory, Mapping, MrsimError, MrsimResult};
pub use simulator::{Kernel, KernelOptions, RunError, SimulationOutput, Simulator};
