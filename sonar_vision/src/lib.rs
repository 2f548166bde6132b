//! Visibility reasoning on top of the ray-trace interop layer.
//!
//! Turns raw geometric hit results into a semantic answer ("can A see
//! B"): a single-ray wall classifier, a multi-height visibility test
//! and the sonar scan that drives both.

pub mod scan;
pub mod visibility;
pub mod wall;

pub use scan::{GameWorld, PlayerSnapshot, SonarScan, TeamId, SCAN_RADIUS};
pub use visibility::{
    is_target_visible, VisibilityTarget, DEFAULT_EYE_HEIGHT, MIN_EYE_HEIGHT,
};
pub use wall::{
    blocked_by_wall, is_wall_class, wall_verdict, ClassLookupError, EntityClasses, Tracer,
    WALL_CLASS_PREFIXES, WALL_FRACTION_THRESHOLD,
};
