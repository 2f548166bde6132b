use bitflags::bitflags;

bitflags! {
    /// Interaction layers of the engine's collision system.
    ///
    /// A query ray carries three of these masks (see
    /// [`TraceOptions`](crate::record::TraceOptions)): the layers the ray
    /// itself belongs to, the layers it may hit and the layers excluded
    /// again from the latter. Any bit combination is legal; the native
    /// module alone interprets the values.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InteractionLayers: u64 {
        const SOLID = 0x1;
        const HITBOXES = 0x2;
        const TRIGGER = 0x4;
        const SKY = 0x8;
        const PLAYER_CLIP = 0x10;
        const NPC_CLIP = 0x20;
        const BLOCK_LOS = 0x40;
        const BLOCK_LIGHT = 0x80;
        const LADDER = 0x100;
        const PICKUP = 0x200;
        const BLOCK_SOUND = 0x400;
        const NO_DRAW = 0x800;
        const WINDOW = 0x1000;
        const PASS_BULLETS = 0x2000;
        const WORLD_GEOMETRY = 0x4000;
        const WATER = 0x8000;
        const SLIME = 0x10000;
        const TOUCH_ALL = 0x20000;
        const PLAYER = 0x40000;
        const NPC = 0x80000;
        const DEBRIS = 0x100000;
        const PHYSICS_PROP = 0x200000;
        const NAV_IGNORE = 0x400000;
        const NAV_LOCAL_IGNORE = 0x800000;
        const POST_PROCESSING_VOLUME = 0x1000000;
        const CARRIED_OBJECT = 0x4000000;
        const PUSH_AWAY = 0x8000000;
        const SERVER_ENTITY_ON_CLIENT = 0x10000000;
        const CARRIED_WEAPON = 0x20000000;
        const STATIC_LEVEL = 0x40000000;

        /// Everything a fired bullet collides with physically.
        const MASK_SHOT_PHYSICS = Self::SOLID.bits()
            | Self::PLAYER_CLIP.bits()
            | Self::WINDOW.bits()
            | Self::PASS_BULLETS.bits()
            | Self::PLAYER.bits()
            | Self::NPC.bits()
            | Self::PHYSICS_PROP.bits();
        /// Hitbox-level shot query.
        const MASK_SHOT_HITBOX = Self::HITBOXES.bits() | Self::PLAYER.bits() | Self::NPC.bits();
        /// Physics and hitbox shot queries combined.
        const MASK_SHOT_FULL = Self::MASK_SHOT_PHYSICS.bits() | Self::HITBOXES.bits();
        /// Static world geometry only.
        const MASK_WORLD_ONLY = Self::SOLID.bits() | Self::WINDOW.bits() | Self::PASS_BULLETS.bits();
        /// Brush geometry only.
        const MASK_BRUSH_ONLY = Self::SOLID.bits() | Self::WINDOW.bits();

        /// Mask used by wall checks. Players and entities that should be
        /// transparent to the check are filtered by class name afterwards,
        /// not via `interacts_exclude`, so the same mask works on both
        /// supported platforms.
        const MASK_WALL_CHECK = Self::MASK_SHOT_PHYSICS.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::InteractionLayers;

    #[test]
    fn shot_full_is_physics_plus_hitboxes() {
        assert_eq!(
            InteractionLayers::MASK_SHOT_FULL,
            InteractionLayers::MASK_SHOT_PHYSICS | InteractionLayers::HITBOXES,
        );
    }

    #[test]
    fn wall_check_matches_physics_shot() {
        assert_eq!(
            InteractionLayers::MASK_WALL_CHECK,
            InteractionLayers::MASK_SHOT_PHYSICS,
        );
    }

    #[test]
    fn physics_shot_composition() {
        let mask = InteractionLayers::MASK_SHOT_PHYSICS;
        assert!(mask.contains(InteractionLayers::SOLID));
        assert!(mask.contains(InteractionLayers::PLAYER));
        assert!(mask.contains(InteractionLayers::PHYSICS_PROP));
        assert!(!mask.contains(InteractionLayers::HITBOXES));
        assert!(!mask.contains(InteractionLayers::TRIGGER));
        assert_eq!(mask.bits(), 0x2c3011);
    }
}
