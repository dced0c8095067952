//! Opaque extension data

use std::ffi::c_void;
use std::fmt;

/// Pointer-sized value owned by the extension that augmented an object
///
/// The stack never dereferences it; it is stored at construction and handed
/// back to every hook. An `OnCreate` action may replace it.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserData(*mut c_void);

// SAFETY: the pointer is only carried, never dereferenced, by this stack.
unsafe impl Send for UserData {}
unsafe impl Sync for UserData {}

impl UserData {
    /// No user data
    #[inline]
    pub const fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// Wrap a raw pointer
    #[inline]
    pub const fn from_ptr(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// Wrap a plain integer token (handy for ids that are not pointers)
    #[inline]
    pub fn from_token(token: usize) -> Self {
        Self(token as *mut c_void)
    }

    #[inline]
    pub const fn as_ptr(self) -> *mut c_void {
        self.0
    }

    #[inline]
    pub fn token(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Default for UserData {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserData({:p})", self.0)
    }
}
