//! Built-in routing passes.
//!
//! - [`Segmentation`]: split the circuit into mappable segments
//! - [`SwapPlanning`]: complete the layouts and plan swaps between segments
//! - [`MappingVerification`]: re-check the result against the coupling map

mod segmentation;
mod swap_planning;
mod verification;

pub use segmentation::{Segmentation, segment_circuit};
pub use swap_planning::{ConstructiveFallbacks, SwapPlanning, plan_transitions};
pub use verification::{MappingVerification, VerificationResult, verify_routing};
