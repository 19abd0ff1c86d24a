pub mod constants;
pub mod isotopes;
pub mod nucleus;
pub mod quantity;

pub use isotopes::{IsotopeProperties, IsotopeTable};
pub use nucleus::{NucleusResolver, NucleusSymbol};
pub use quantity::{Dimension, PhysicalQuantity, Unit};
