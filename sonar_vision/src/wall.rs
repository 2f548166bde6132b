//! Single-ray wall classification.
//!
//! A wall check asks whether the segment between two points is blocked
//! by *real* world geometry. Players, triggers and other transparent
//! entities hit by the same mask are filtered out afterwards by class
//! name, which keeps the mask identical on both supported platforms.

use glam::Vec3;
use sonar_trace::{
    EntityHandle, InterfaceLocator, RayTraceBinding, TraceOptions, TraceResult,
};
use thiserror::Error;

/// Hits ending at or beyond this fraction count as a clean pass to the
/// endpoint. Absorbs floating-point slack near 1.0; tuned against the
/// native module, do not re-derive.
pub const WALL_FRACTION_THRESHOLD: f32 = 0.97;

/// Class-name prefixes of entities that count as walls.
pub const WALL_CLASS_PREFIXES: [&str; 5] = [
    "world",
    "func_wall",
    "func_brush",
    "func_breakable",
    "prop_static",
];

/// Failure to resolve a struck entity's class name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClassLookupError {
    /// The handle no longer refers to a live entity.
    #[error("entity handle is stale")]
    StaleEntity,
    /// The entity exists but its class name could not be read.
    #[error("class name unavailable: {0}")]
    Unavailable(String),
}

/// Issues wall-check traces.
///
/// Implemented for [`RayTraceBinding`]; tests substitute scripted
/// results. `None` means the trace could not be answered and is treated
/// as *unknown*, not as clear air.
pub trait Tracer {
    fn trace_wall(
        &mut self,
        from: Vec3,
        to: Vec3,
        ignore: Option<EntityHandle>,
    ) -> Option<TraceResult>;

    /// [`trace_wall`](Self::trace_wall) with the native debug beam
    /// enabled.
    fn trace_wall_debug(
        &mut self,
        from: Vec3,
        to: Vec3,
        ignore: Option<EntityHandle>,
    ) -> Option<TraceResult>;
}

impl<L> Tracer for RayTraceBinding<L>
where
    L: InterfaceLocator,
{
    fn trace_wall(
        &mut self,
        from: Vec3,
        to: Vec3,
        ignore: Option<EntityHandle>,
    ) -> Option<TraceResult> {
        self.trace_segment(from, to, ignore, &TraceOptions::wall_check())
    }

    fn trace_wall_debug(
        &mut self,
        from: Vec3,
        to: Vec3,
        ignore: Option<EntityHandle>,
    ) -> Option<TraceResult> {
        self.trace_segment(from, to, ignore, &TraceOptions::wall_check_debug())
    }
}

/// Resolves a struck entity's designer/class name.
pub trait EntityClasses {
    fn class_name(&self, entity: EntityHandle) -> Result<String, ClassLookupError>;
}

/// Whether `name` designates a wall-like entity.
///
/// Prefix match, case-insensitive. An empty name counts as a wall:
/// plain world brushes carry no designer name.
pub fn is_wall_class(name: &str) -> bool {
    if name.is_empty() {
        return true;
    }

    WALL_CLASS_PREFIXES.iter().any(|prefix| {
        name.as_bytes()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
    })
}

/// Classifies a completed trace as wall or not-wall.
///
/// Policy, in order: a degenerate (all-solid) result is inconclusive
/// and passes; a near-unity fraction passes; a hit with no entity
/// behind it is raw world geometry and blocks; otherwise the struck
/// entity's class name decides. An unresolvable entity identity is
/// never a wall.
pub fn wall_verdict<C>(result: &TraceResult, classes: &C) -> bool
where
    C: EntityClasses + ?Sized,
{
    if result.is_all_solid() {
        return false;
    }
    if result.fraction >= WALL_FRACTION_THRESHOLD {
        return false;
    }
    let Some(entity) = result.hit_entity() else {
        return true;
    };

    match classes.class_name(entity) {
        Ok(name) => is_wall_class(&name),
        Err(err) => {
            tracing::debug!(error = %err, "hit entity did not resolve, treating as non-wall");
            false
        }
    }
}

/// Whether the segment from `from` to `to` is blocked by a wall.
///
/// A failed trace (module unbound, native failure) reports `false`:
/// the answer is unknown and the check fails open.
pub fn blocked_by_wall<T, C>(
    tracer: &mut T,
    classes: &C,
    from: Vec3,
    to: Vec3,
    ignore: Option<EntityHandle>,
) -> bool
where
    T: Tracer + ?Sized,
    C: EntityClasses + ?Sized,
{
    match tracer.trace_wall(from, to, ignore) {
        Some(result) => wall_verdict(&result, classes),
        None => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use glam::Vec3;
    use sonar_trace::{EntityHandle, TraceResult};

    use super::{
        blocked_by_wall, is_wall_class, wall_verdict, ClassLookupError, EntityClasses, Tracer,
    };

    /// Hands out scripted trace results in order.
    pub(crate) struct ScriptedTracer {
        pub(crate) results: Vec<Option<TraceResult>>,
        pub(crate) calls: Vec<(Vec3, Vec3)>,
    }

    impl ScriptedTracer {
        pub(crate) fn new(results: impl IntoIterator<Item = Option<TraceResult>>) -> Self {
            Self {
                results: results.into_iter().collect(),
                calls: Vec::new(),
            }
        }
    }

    impl Tracer for ScriptedTracer {
        fn trace_wall(
            &mut self,
            from: Vec3,
            to: Vec3,
            _ignore: Option<EntityHandle>,
        ) -> Option<TraceResult> {
            self.calls.push((from, to));
            if self.results.is_empty() {
                None
            } else {
                self.results.remove(0)
            }
        }

        fn trace_wall_debug(
            &mut self,
            from: Vec3,
            to: Vec3,
            ignore: Option<EntityHandle>,
        ) -> Option<TraceResult> {
            self.trace_wall(from, to, ignore)
        }
    }

    /// Class names per raw handle; absent handles resolve with an
    /// error.
    #[derive(Default)]
    pub(crate) struct ClassMap {
        pub(crate) names: HashMap<usize, String>,
    }

    impl ClassMap {
        pub(crate) fn with(entries: &[(usize, &str)]) -> Self {
            Self {
                names: entries
                    .iter()
                    .map(|(raw, name)| (*raw, (*name).to_owned()))
                    .collect(),
            }
        }
    }

    impl EntityClasses for ClassMap {
        fn class_name(&self, entity: EntityHandle) -> Result<String, ClassLookupError> {
            self.names
                .get(&entity.as_raw())
                .cloned()
                .ok_or(ClassLookupError::StaleEntity)
        }
    }

    pub(crate) fn hit(raw_entity: usize, fraction: f32) -> TraceResult {
        TraceResult::new(
            Vec3::ZERO,
            EntityHandle::from_raw(raw_entity),
            fraction,
            false,
            Vec3::Z,
        )
    }

    #[test]
    fn wall_prefixes_match_case_insensitively() {
        assert!(is_wall_class("worldspawn"));
        assert!(is_wall_class("func_wall_101"));
        assert!(is_wall_class("FUNC_BRUSH"));
        assert!(is_wall_class("Func_Breakable_02"));
        assert!(is_wall_class("prop_static"));
        assert!(is_wall_class(""));

        assert!(!is_wall_class("player_pawn"));
        assert!(!is_wall_class("trigger_multiple"));
        assert!(!is_wall_class("prop_dynamic"));
        assert!(!is_wall_class("func_"));
    }

    #[test]
    fn fraction_threshold_decides_entityless_hits() {
        let classes = ClassMap::default();
        assert!(wall_verdict(&hit(0, 0.0), &classes));
        assert!(wall_verdict(&hit(0, 0.5), &classes));
        assert!(wall_verdict(&hit(0, 0.9699), &classes));
        assert!(!wall_verdict(&hit(0, 0.97), &classes));
        assert!(!wall_verdict(&hit(0, 1.0), &classes));
    }

    #[test]
    fn near_unity_fraction_passes_regardless_of_entity() {
        let classes = ClassMap::with(&[(7, "func_wall")]);
        assert!(!wall_verdict(&hit(7, 0.98), &classes));
    }

    #[test]
    fn all_solid_is_never_a_wall() {
        let classes = ClassMap::default();
        let degenerate = TraceResult::new(Vec3::ZERO, None, 0.0, true, Vec3::ZERO);
        assert!(!wall_verdict(&degenerate, &classes));

        let degenerate_with_entity =
            TraceResult::new(Vec3::ZERO, EntityHandle::from_raw(7), 0.5, true, Vec3::ZERO);
        let classes = ClassMap::with(&[(7, "func_wall")]);
        assert!(!wall_verdict(&degenerate_with_entity, &classes));
    }

    #[test]
    fn entity_class_decides_blocking() {
        let classes = ClassMap::with(&[(1, "func_wall_101"), (2, "player_pawn")]);
        assert!(wall_verdict(&hit(1, 0.5), &classes));
        assert!(!wall_verdict(&hit(2, 0.5), &classes));
    }

    #[test]
    fn unresolvable_entity_fails_open() {
        let classes = ClassMap::default();
        assert!(!wall_verdict(&hit(0xdead, 0.5), &classes));
    }

    #[test]
    fn failed_trace_is_not_blocked() {
        let mut tracer = ScriptedTracer::new([None]);
        let classes = ClassMap::default();
        assert!(!blocked_by_wall(
            &mut tracer,
            &classes,
            Vec3::ZERO,
            Vec3::X,
            None,
        ));
    }

    #[test]
    fn clean_miss_is_not_blocked() {
        let miss = TraceResult::new(Vec3::X, None, 1.0, false, Vec3::Z);
        let mut tracer = ScriptedTracer::new([Some(miss)]);
        let classes = ClassMap::default();
        assert!(!blocked_by_wall(
            &mut tracer,
            &classes,
            Vec3::ZERO,
            Vec3::X,
            None,
        ));
    }
}
