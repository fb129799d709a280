//! Built-in compilation passes.

mod decomposition;
mod verification;

pub use decomposition::IcmDecomposition;
pub use verification::{IcmFormReport, IcmFormVerification};
