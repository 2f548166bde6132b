//! Typed trace queries against the bound native module.
//!
//! Every query lazily attempts to bind first. `None` means the query
//! could not be answered (module absent or the native call reported
//! failure) and must be treated as *unknown*, never as "no
//! obstruction". Inputs are marshalled by raw address; the result
//! buffer is zeroed before the call and copied out afterwards.

use std::ffi::c_void;
use std::ptr;

use bytemuck::Zeroable;
use glam::Vec3;

use crate::binding::{InterfaceLocator, RayTraceBinding};
use crate::record::{EntityHandle, TraceOptions, TraceResult};

fn ignore_ptr(ignore: Option<EntityHandle>) -> *mut c_void {
    ignore.map_or(ptr::null_mut(), |handle| handle.as_raw() as *mut c_void)
}

impl<L> RayTraceBinding<L>
where
    L: InterfaceLocator,
{
    /// Traces a ray from `start` to `end`.
    pub fn trace_segment(
        &mut self,
        start: Vec3,
        end: Vec3,
        ignore: Option<EntityHandle>,
        options: &TraceOptions,
    ) -> Option<TraceResult> {
        let bound = self.ensure_bound()?;
        let mut result = TraceResult::zeroed();

        let ok = unsafe {
            (bound.trace_end_shape)(
                bound.handle,
                ptr::from_ref(&start),
                ptr::from_ref(&end),
                ignore_ptr(ignore),
                ptr::from_ref(options),
                ptr::from_mut(&mut result),
            )
        };

        ok.then_some(result)
    }

    /// Traces a ray from `origin` along `angles` (pitch/yaw/roll in
    /// degrees). The native module derives the forward vector and
    /// applies its own, effectively unlimited, maximum distance.
    pub fn trace_directional(
        &mut self,
        origin: Vec3,
        angles: Vec3,
        ignore: Option<EntityHandle>,
        options: &TraceOptions,
    ) -> Option<TraceResult> {
        let bound = self.ensure_bound()?;
        let mut result = TraceResult::zeroed();

        let ok = unsafe {
            (bound.trace_shape)(
                bound.handle,
                ptr::from_ref(&origin),
                ptr::from_ref(&angles),
                ignore_ptr(ignore),
                ptr::from_ref(options),
                ptr::from_mut(&mut result),
            )
        };

        ok.then_some(result)
    }

    /// Sweeps an axis-aligned hull with extents `mins`/`maxs` from
    /// `start` to `end`.
    pub fn trace_hull(
        &mut self,
        start: Vec3,
        end: Vec3,
        mins: Vec3,
        maxs: Vec3,
        ignore: Option<EntityHandle>,
        options: &TraceOptions,
    ) -> Option<TraceResult> {
        let bound = self.ensure_bound()?;
        let mut result = TraceResult::zeroed();

        let ok = unsafe {
            (bound.trace_hull_shape)(
                bound.handle,
                ptr::from_ref(&start),
                ptr::from_ref(&end),
                ptr::from_ref(&mins),
                ptr::from_ref(&maxs),
                ignore_ptr(ignore),
                ptr::from_ref(options),
                ptr::from_mut(&mut result),
            )
        };

        ok.then_some(result)
    }
}
