//! Lifecycle of the connection to the native ray-trace module.
//!
//! The module is loaded independently of us and may come up later, so a
//! failed lookup is not necessarily fatal: "not loaded yet" stays
//! retryable while structural failures (faulting lookup, zero handle)
//! park the binding permanently. Once bound or given up the state never
//! changes again.

use std::ffi::c_void;
use std::mem;

use glam::Vec3;
use thiserror::Error;

use crate::record::{TraceOptions, TraceResult};

/// Versioned name of the exported ray-trace interface.
pub const INTERFACE_NAME: &str = "CRayTraceInterface001";

/// Platforms the native module ships on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
}

pub const HOST_PLATFORM: Platform = if cfg!(target_os = "windows") {
    Platform::Windows
} else {
    Platform::Linux
};

/// Dispatch-table positions of the three trace entry points.
///
/// The C++ virtual-call ABI lays the table out differently per
/// platform, shifting every slot by one on Linux (Itanium ABI).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VtableSlots {
    pub trace_shape: usize,
    pub trace_end_shape: usize,
    pub trace_hull_shape: usize,
}

pub const fn vtable_slots(platform: Platform) -> VtableSlots {
    match platform {
        Platform::Windows => VtableSlots {
            trace_shape: 1,
            trace_end_shape: 2,
            trace_hull_shape: 3,
        },
        Platform::Linux => VtableSlots {
            trace_shape: 2,
            trace_end_shape: 3,
            trace_hull_shape: 4,
        },
    }
}

pub(crate) type TraceShapeFn = unsafe extern "C" fn(
    this: *mut c_void,
    origin: *const Vec3,
    angles: *const Vec3,
    ignore: *mut c_void,
    options: *const TraceOptions,
    result: *mut TraceResult,
) -> bool;

pub(crate) type TraceEndShapeFn = unsafe extern "C" fn(
    this: *mut c_void,
    origin: *const Vec3,
    end: *const Vec3,
    ignore: *mut c_void,
    options: *const TraceOptions,
    result: *mut TraceResult,
) -> bool;

pub(crate) type TraceHullShapeFn = unsafe extern "C" fn(
    this: *mut c_void,
    origin: *const Vec3,
    end: *const Vec3,
    mins: *const Vec3,
    maxs: *const Vec3,
    ignore: *mut c_void,
    options: *const TraceOptions,
    result: *mut TraceResult,
) -> bool;

/// Failure to locate the exported interface.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LocateError {
    /// The native module is not loaded yet. The lookup may be retried on
    /// a later tick.
    #[error("native module not loaded yet")]
    NotLoaded,
    /// The lookup itself faulted. Retrying cannot recover from this.
    #[error("interface lookup faulted: {0}")]
    Fault(String),
}

/// Resolves the native module's exported interface by name.
///
/// The production locator is [`ModuleLocator`](crate::ModuleLocator). A
/// successful lookup may still return a null handle; deciding what that
/// means is up to the binding manager, not the locator.
pub trait InterfaceLocator {
    fn locate(&mut self, interface: &str) -> Result<*mut c_void, LocateError>;
}

pub(crate) struct BoundInterface {
    pub(crate) handle: *mut c_void,
    pub(crate) trace_shape: TraceShapeFn,
    pub(crate) trace_end_shape: TraceEndShapeFn,
    pub(crate) trace_hull_shape: TraceHullShapeFn,
}

impl BoundInterface {
    /// Resolves the three trace slots out of the interface's dispatch
    /// table.
    ///
    /// # Safety
    /// `handle` must point to a live object of the versioned interface,
    /// whose first pointer-sized word is its dispatch table.
    unsafe fn resolve(handle: *mut c_void, slots: VtableSlots) -> Self {
        let table = unsafe { *handle.cast::<*const *const c_void>() };
        let entry = |slot: usize| unsafe { *table.add(slot) };

        Self {
            handle,
            trace_shape: unsafe {
                mem::transmute::<*const c_void, TraceShapeFn>(entry(slots.trace_shape))
            },
            trace_end_shape: unsafe {
                mem::transmute::<*const c_void, TraceEndShapeFn>(entry(slots.trace_end_shape))
            },
            trace_hull_shape: unsafe {
                mem::transmute::<*const c_void, TraceHullShapeFn>(entry(slots.trace_hull_shape))
            },
        }
    }
}

enum BindState {
    Uninitialized,
    Bound(BoundInterface),
    GaveUp,
}

/// Owns the connection to the native module.
///
/// There is exactly one writer: all state transitions happen through
/// `&mut self` on whatever single thread drives the host callbacks. The
/// handle and the resolved function pointers never leave this type.
pub struct RayTraceBinding<L> {
    locator: L,
    state: BindState,
    retries: u32,
    last_error: Option<String>,
}

impl<L> RayTraceBinding<L>
where
    L: InterfaceLocator,
{
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            state: BindState::Uninitialized,
            retries: 0,
            last_error: None,
        }
    }

    /// Attempts to bind to the native module.
    ///
    /// No-op when already bound or permanently given up. Called lazily
    /// by every query, so it must stay cheap in both terminal states.
    pub fn initialize(&mut self) {
        if !matches!(self.state, BindState::Uninitialized) {
            return;
        }

        self.retries += 1;

        let handle = match self.locator.locate(INTERFACE_NAME) {
            Ok(handle) => handle,
            Err(LocateError::NotLoaded) => {
                self.record_error(format!(
                    "{} not available yet (attempt {})",
                    INTERFACE_NAME, self.retries,
                ));
                tracing::debug!(
                    attempt = self.retries,
                    "native ray-trace module not loaded yet"
                );
                return;
            }
            Err(LocateError::Fault(msg)) => {
                self.give_up(format!("interface lookup faulted: {msg}"));
                return;
            }
        };

        if handle.is_null() {
            self.give_up(format!("{INTERFACE_NAME} handle is null"));
            return;
        }

        let slots = vtable_slots(HOST_PLATFORM);
        let bound = unsafe { BoundInterface::resolve(handle, slots) };
        self.state = BindState::Bound(bound);
        self.last_error = None;
        tracing::debug!(
            interface = INTERFACE_NAME,
            attempts = self.retries,
            "bound to native ray-trace module"
        );
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, BindState::Bound(_))
    }

    pub fn gave_up(&self) -> bool {
        matches!(self.state, BindState::GaveUp)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn retry_count(&self) -> u32 {
        self.retries
    }

    pub(crate) fn ensure_bound(&mut self) -> Option<&BoundInterface> {
        if !self.is_bound() {
            self.initialize();
        }
        match &self.state {
            BindState::Bound(bound) => Some(bound),
            _ => None,
        }
    }

    fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    fn give_up(&mut self, message: String) {
        tracing::error!(error = %message, "giving up on native ray-trace module");
        self.state = BindState::GaveUp;
        self.last_error = Some(message);
    }
}
