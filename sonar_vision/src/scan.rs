//! Sonar scan around a detonation point.
//!
//! Filters the player roster down to living enemies inside the scan
//! radius and runs the multi-sample visibility test against each. The
//! feedback side (sound cue, particle ring, killing the projectile) is
//! host glue and lives outside this crate.

use glam::Vec3;
use sonar_trace::EntityHandle;

use crate::visibility::{is_target_visible, VisibilityTarget};
use crate::wall::{EntityClasses, Tracer};

/// Default scan radius in world units.
pub const SCAN_RADIUS: f32 = 3000.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TeamId(pub u8);

/// Per-player state sampled at scan time.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Stable identifier of the player (engine slot or user id).
    pub id: u64,
    pub team: TeamId,
    /// Foot-level pawn position.
    pub origin: Vec3,
    /// Reported pawn eye height; may be degenerate.
    pub eye_height: f32,
    pub alive: bool,
}

/// Enumerates the current player roster.
pub trait GameWorld {
    fn players(&self) -> Vec<PlayerSnapshot>;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SonarScan {
    pub radius: f32,
}

impl Default for SonarScan {
    fn default() -> Self {
        Self {
            radius: SCAN_RADIUS,
        }
    }
}

impl SonarScan {
    /// Whether any living enemy of `scanning_team` inside the radius is
    /// visible from `origin`. Stops at the first detection.
    ///
    /// `projectile` is the detonating projectile's handle and is
    /// excluded from every trace.
    pub fn detects_any<T, C, W>(
        &self,
        tracer: &mut T,
        classes: &C,
        world: &W,
        origin: Vec3,
        scanning_team: TeamId,
        projectile: Option<EntityHandle>,
    ) -> bool
    where
        T: Tracer + ?Sized,
        C: EntityClasses + ?Sized,
        W: GameWorld + ?Sized,
    {
        for target in self.candidates(world, origin, scanning_team) {
            let visibility_target = VisibilityTarget {
                origin: target.origin,
                eye_height: target.eye_height,
            };
            if is_target_visible(tracer, classes, origin, &visibility_target, projectile) {
                tracing::debug!(player = target.id, "sonar detected a target");
                return true;
            }
        }

        false
    }

    /// All living enemies inside the radius that are visible from
    /// `origin`.
    pub fn detect<T, C, W>(
        &self,
        tracer: &mut T,
        classes: &C,
        world: &W,
        origin: Vec3,
        scanning_team: TeamId,
        projectile: Option<EntityHandle>,
    ) -> Vec<PlayerSnapshot>
    where
        T: Tracer + ?Sized,
        C: EntityClasses + ?Sized,
        W: GameWorld + ?Sized,
    {
        self.candidates(world, origin, scanning_team)
            .into_iter()
            .filter(|target| {
                let visibility_target = VisibilityTarget {
                    origin: target.origin,
                    eye_height: target.eye_height,
                };
                is_target_visible(tracer, classes, origin, &visibility_target, projectile)
            })
            .collect()
    }

    fn candidates<W>(
        &self,
        world: &W,
        origin: Vec3,
        scanning_team: TeamId,
    ) -> Vec<PlayerSnapshot>
    where
        W: GameWorld + ?Sized,
    {
        world
            .players()
            .into_iter()
            .filter(|player| {
                player.alive
                    && player.team != scanning_team
                    && origin.distance(player.origin) <= self.radius
            })
            .collect()
    }
}
