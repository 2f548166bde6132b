//! Production interface locator backed by the module's own export.
//!
//! The native module exposes the engine-standard `CreateInterface`
//! factory. The locator opens the module library (which merely bumps
//! the refcount when the host already loaded it), resolves the factory
//! once and asks it for the versioned interface by name.

use std::ffi::{c_char, c_int, c_void, CString};
use std::path::PathBuf;
use std::ptr;

use libloading::Library;

use crate::binding::{InterfaceLocator, LocateError};

type CreateInterfaceFn = unsafe extern "C" fn(name: *const c_char, rc: *mut c_int) -> *mut c_void;

pub struct ModuleLocator {
    path: PathBuf,
    library: Option<Library>,
}

impl ModuleLocator {
    /// Locator for the native module at `path`.
    ///
    /// The library is opened lazily on the first lookup so that the
    /// locator can be constructed before the module file exists.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            library: None,
        }
    }

    fn library(&mut self) -> Result<&Library, LocateError> {
        if self.library.is_none() {
            if !self.path.exists() {
                return Err(LocateError::NotLoaded);
            }

            let library = unsafe { Library::new(&self.path) }
                .map_err(|err| LocateError::Fault(format!("failed to open module: {err}")))?;
            self.library = Some(library);
        }

        // Populated above.
        Ok(self.library.as_ref().unwrap())
    }
}

impl InterfaceLocator for ModuleLocator {
    fn locate(&mut self, interface: &str) -> Result<*mut c_void, LocateError> {
        let library = self.library()?;

        let create_interface = unsafe { library.get::<CreateInterfaceFn>(b"CreateInterface\0") }
            .map_err(|err| {
                LocateError::Fault(format!("module has no CreateInterface export: {err}"))
            })?;

        let name = CString::new(interface)
            .map_err(|_| LocateError::Fault("interface name contains a NUL byte".to_owned()))?;

        let mut rc: c_int = 0;
        let handle = unsafe { create_interface(name.as_ptr(), ptr::from_mut(&mut rc)) };
        // A loaded module that does not answer for its own interface
        // name is structurally broken; hand the null handle up and let
        // the binding manager park itself.
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::{InterfaceLocator, LocateError};

    use super::ModuleLocator;

    #[test]
    fn missing_module_file_is_retryable() {
        let mut locator = ModuleLocator::new("/nonexistent/raytrace_module.so");
        assert_eq!(
            locator.locate("CRayTraceInterface001"),
            Err(LocateError::NotLoaded),
        );
        // Still retryable on the next tick.
        assert_eq!(
            locator.locate("CRayTraceInterface001"),
            Err(LocateError::NotLoaded),
        );
    }
}
