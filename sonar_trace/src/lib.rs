//! Interop layer for the native ray-trace engine module.
//!
//! The native module performs the actual geometric queries against the
//! live world. This crate owns the fragile part: locating the module's
//! exported interface, resolving its platform-dependent dispatch table
//! and exchanging fixed-layout binary records with it.

pub mod binding;
pub mod layers;
pub mod locator;
pub mod record;

mod query;

pub use binding::{
    vtable_slots, InterfaceLocator, LocateError, Platform, RayTraceBinding, VtableSlots,
    HOST_PLATFORM, INTERFACE_NAME,
};
pub use layers::InteractionLayers;
pub use locator::ModuleLocator;
pub use record::{EntityHandle, TraceOptions, TraceResult};
