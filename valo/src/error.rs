use thiserror::Error;

use crate::{scheduler::BakeState, surface::SurfaceId};

/// Error taxonomy for the bake.
///
/// Per-probe failures (`ResourceAllocation`, `NumericDivergence`) are isolated
/// by the scheduler and never abort the bake. Structural failures surface
/// synchronously from `Volume::build` or a scheduler entry point.
#[derive(Error, Debug)]
pub enum BakeError {
    #[error("resource allocation failed: {0}")]
    ResourceAllocation(String),

    #[error("surface '{name}' cannot participate in bouncing: {reason}")]
    InvalidSurface { name: String, reason: String },

    #[error("no bounce store entry for surface {0:?}")]
    InvalidSurfaceReference(SurfaceId),

    #[error("spherical harmonic estimate is not finite")]
    NumericDivergence,

    #[error("{op} called in scheduler state {state}")]
    InvalidState { op: &'static str, state: BakeState },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
