//! Multi-sample visibility between a world position and a target.
//!
//! A single ray is easily blocked by partial cover (a crouching target
//! behind a low wall), so the target is sampled at three body heights
//! and counts as visible as soon as any one sample has a clear line.

use glam::Vec3;
use sonar_trace::EntityHandle;

use crate::wall::{blocked_by_wall, EntityClasses, Tracer};

/// Eye height substituted when the reported one looks degenerate.
pub const DEFAULT_EYE_HEIGHT: f32 = 64.0;

/// Reported eye heights below this are considered degenerate.
pub const MIN_EYE_HEIGHT: f32 = 30.0;

/// Sample heights as fractions of eye height: head, chest, waist.
const SAMPLE_FACTORS: [f32; 3] = [1.0, 0.6, 0.35];

/// A target position paired with its reported eye height.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisibilityTarget {
    /// Foot-level world position of the target.
    pub origin: Vec3,
    /// Eye height above `origin` as reported by the target's pawn. May
    /// be degenerate; the sanity floor is applied when sampling.
    pub eye_height: f32,
}

fn effective_eye_height(reported: f32) -> f32 {
    if reported < MIN_EYE_HEIGHT {
        DEFAULT_EYE_HEIGHT
    } else {
        reported
    }
}

/// The three sampled points on the target: head, chest, waist.
pub fn sample_points(target: &VisibilityTarget) -> [Vec3; 3] {
    let eye = effective_eye_height(target.eye_height);
    SAMPLE_FACTORS.map(|factor| target.origin + Vec3::new(0.0, 0.0, eye * factor))
}

/// Whether any of the target's sample points has a wall-free line from
/// `from`.
///
/// Returns on the first clear sample; not visible only when all three
/// are blocked.
pub fn is_target_visible<T, C>(
    tracer: &mut T,
    classes: &C,
    from: Vec3,
    target: &VisibilityTarget,
    ignore: Option<EntityHandle>,
) -> bool
where
    T: Tracer + ?Sized,
    C: EntityClasses + ?Sized,
{
    sample_points(target)
        .into_iter()
        .any(|point| !blocked_by_wall(tracer, classes, from, point, ignore))
}
