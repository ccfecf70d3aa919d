//! Scalar scoring of candidate trace sets.
//!
//! Every model returns a non-negative cost that is zero only when no rule is
//! violated. More violation in an otherwise identical configuration always
//! yields a strictly higher score.

mod elbow;
mod offset;
pub mod terms;

pub use elbow::{ElbowCostModel, ElbowCostParams};
pub use offset::{OffsetCostModel, OffsetCostParams};
pub use terms::{Falloff, ProximityRule};
