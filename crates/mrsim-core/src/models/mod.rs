pub mod isotopomer;
pub mod options;
pub mod site;
pub mod spectrum;

pub use isotopomer::{Isotopomer, build_isotopomer, build_isotopomers};
pub use options::{OptionDefault, OptionKind, OptionSpec};
pub use site::{Site, SymmetricTensor, build_site};
pub use spectrum::{DetectionNucleus, Spectrum, build_spectrum};
