//! Fixed-layout records exchanged with the native module.
//!
//! Both records are passed across the foreign boundary by raw address.
//! Their size and field offsets are a hard contract with the native
//! side; a mismatch produces garbage results, not a detectable error.
//! The layout is therefore locked down with compile-time assertions.

use core::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::layers::InteractionLayers;

/// Opaque reference to an engine entity.
///
/// The raw value is a pointer into engine memory and is never
/// dereferenced by this crate; it is only compared and handed back to
/// the engine. Zero is reserved for "no entity" and is modelled as
/// `Option<EntityHandle>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityHandle(usize);

impl EntityHandle {
    pub fn from_raw(raw: usize) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_raw(self) -> usize {
        self.0
    }
}

/// Query parameters for a single trace, 32 bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
pub struct TraceOptions {
    /// Layers the imaginary ray itself belongs to. Zero for a pure query
    /// ray.
    pub interacts_as: u64,
    /// Layers the ray is allowed to hit.
    pub interacts_with: u64,
    /// Layers excluded even when present in `interacts_with`.
    pub interacts_exclude: u64,
    /// Non-zero asks the native module to render a debug beam for the
    /// query. Has no effect on the returned result.
    pub draw_beam: i32,
    _pad: [u8; 4],
}

impl TraceOptions {
    pub fn new(interacts_with: InteractionLayers) -> Self {
        Self {
            interacts_as: 0,
            interacts_with: interacts_with.bits(),
            interacts_exclude: 0,
            draw_beam: 0,
            _pad: [0; 4],
        }
    }

    /// Options for wall checks. Hits everything a bullet physically
    /// collides with; players and transparent entities are filtered by
    /// class name afterwards.
    pub fn wall_check() -> Self {
        Self::new(InteractionLayers::MASK_WALL_CHECK)
    }

    /// [`wall_check`](Self::wall_check) with the debug beam enabled.
    pub fn wall_check_debug() -> Self {
        Self {
            draw_beam: 1,
            ..Self::wall_check()
        }
    }

    /// Full bullet trace including hitboxes.
    pub fn shot_full() -> Self {
        Self::new(InteractionLayers::MASK_SHOT_FULL)
    }
}

/// Result buffer filled by the native module, 48 bytes.
#[derive(Copy, Clone, Debug, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct TraceResult {
    /// World coordinate where the ray stopped.
    pub end_pos: [f32; 3],
    _pad0: [u8; 4],
    /// Raw handle of the entity struck, zero if none.
    pub hit_entity: usize,
    /// Fraction of the requested distance travelled before stopping.
    /// 1.0 means no obstruction over the full segment.
    pub fraction: f32,
    /// Non-zero when the start point is embedded in solid geometry. The
    /// rest of the result is uninformative in that case.
    pub all_solid: i32,
    /// Surface normal at the hit point.
    pub normal: [f32; 3],
    _pad1: [u8; 4],
}

impl TraceResult {
    pub fn new(
        end_pos: Vec3,
        hit_entity: Option<EntityHandle>,
        fraction: f32,
        all_solid: bool,
        normal: Vec3,
    ) -> Self {
        Self {
            end_pos: end_pos.to_array(),
            _pad0: [0; 4],
            hit_entity: hit_entity.map_or(0, EntityHandle::as_raw),
            fraction,
            all_solid: all_solid.into(),
            normal: normal.to_array(),
            _pad1: [0; 4],
        }
    }

    pub fn did_hit(&self) -> bool {
        self.fraction < 1.0
    }

    pub fn is_all_solid(&self) -> bool {
        self.all_solid != 0
    }

    pub fn hit_entity(&self) -> Option<EntityHandle> {
        EntityHandle::from_raw(self.hit_entity)
    }

    pub fn end_pos(&self) -> Vec3 {
        Vec3::from_array(self.end_pos)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

// The native module exists only on 64-bit hosts; the handle field is
// pointer sized on both sides.
const _: () = {
    assert!(size_of::<usize>() == 8);

    assert!(size_of::<TraceOptions>() == 32);
    assert!(offset_of!(TraceOptions, interacts_as) == 0);
    assert!(offset_of!(TraceOptions, interacts_with) == 8);
    assert!(offset_of!(TraceOptions, interacts_exclude) == 16);
    assert!(offset_of!(TraceOptions, draw_beam) == 24);

    assert!(size_of::<TraceResult>() == 48);
    assert!(offset_of!(TraceResult, end_pos) == 0);
    assert!(offset_of!(TraceResult, hit_entity) == 16);
    assert!(offset_of!(TraceResult, fraction) == 24);
    assert!(offset_of!(TraceResult, all_solid) == 28);
    assert!(offset_of!(TraceResult, normal) == 32);
};
