use crate::domain::{Mapping, MrsimError};
use crate::models::{Isotopomer, Spectrum};
use serde::Serialize;

/// Extra keyword options forwarded to the kernel untouched.
pub type KernelOptions = Mapping;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutput {
    pub frequencies: Vec<f64>,
    pub amplitudes: Vec<f64>,
}

impl SimulationOutput {
    pub fn new(frequencies: Vec<f64>, amplitudes: Vec<f64>) -> Self {
        Self {
            frequencies,
            amplitudes,
        }
    }
}

/// Numerical routine turning compiled inputs into a spectrum.
pub trait Kernel {
    type Error;

    fn simulate(
        &self,
        spectrum: &Spectrum,
        isotopomers: &[Isotopomer],
        options: &KernelOptions,
    ) -> Result<SimulationOutput, Self::Error>;
}

impl<F, E> Kernel for F
where
    F: Fn(&Spectrum, &[Isotopomer], &KernelOptions) -> Result<SimulationOutput, E>,
{
    type Error = E;

    fn simulate(
        &self,
        spectrum: &Spectrum,
        isotopomers: &[Isotopomer],
        options: &KernelOptions,
    ) -> Result<SimulationOutput, E> {
        self(spectrum, isotopomers, options)
    }
}

/// Failure of [`super::Simulator::run`]. Kernel errors pass through as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError<E> {
    #[error(transparent)]
    Precondition(MrsimError),
    #[error("kernel failed: {0}")]
    Kernel(E),
}

impl<E> RunError<E> {
    pub fn into_kernel_error(self) -> Option<E> {
        match self {
            Self::Kernel(error) => Some(error),
            Self::Precondition(_) => None,
        }
    }

    pub fn precondition(&self) -> Option<&MrsimError> {
        match self {
            Self::Precondition(error) => Some(error),
            Self::Kernel(_) => None,
        }
    }
}
