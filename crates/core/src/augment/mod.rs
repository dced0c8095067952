//! Object augmentation
//!
//! An augmented object is an ordinary display object carrying an
//! [`AugmentationState`]: the shared method stream it was built from and the
//! extension's user data. Every interceptable operation on [`Scene`] checks
//! for that state and, when the stream has hooks for the operation, runs the
//! before / original / after protocol around the plain behavior.
//!
//! ```text
//! Scene::translate(id, dx, dy)
//!   ├── no augmentation, or no Translate hooks  -> base::translate
//!   └── hooks present
//!         ├── open HookContext (handle list, `this`)
//!         ├── before(ctx, dx, dy)
//!         ├── base::translate        (unless ignore_original)
//!         └── after(ctx, dx, dy)
//! ```
//!
//! [`Scene`]: crate::scene::Scene

mod args;
pub mod dispatch;
pub mod factory;

use std::sync::Arc;

use crate::stream::{find_params, HookPayload, MethodStream};
use stagehook_engine::RegistryRef;
use stagehook_sdk::{AugmentedMethod, UserData};

pub use factory::{
    build_method_stream, push_circle, push_container, push_embossed_text, push_emitter,
    push_group, push_image, push_image_rect, push_line, push_mesh, push_object, push_polygon,
    push_rect, push_rounded_rect, push_snapshot, push_sprite, push_text, release_object,
    FactoryError, StreamSource,
};

/// Hooks and user data attached to one object
#[derive(Debug, Clone)]
pub struct AugmentationState {
    stream: Arc<MethodStream>,
    user_data: UserData,
    /// Registry entry keeping a single-use stream reachable from the runtime
    reference: Option<RegistryRef>,
}

impl AugmentationState {
    pub fn new(stream: Arc<MethodStream>, user_data: UserData) -> Self {
        Self {
            stream,
            user_data,
            reference: None,
        }
    }

    #[inline]
    pub fn stream(&self) -> &Arc<MethodStream> {
        &self.stream
    }

    #[inline]
    pub fn user_data(&self) -> UserData {
        self.user_data
    }

    pub(crate) fn set_user_data(&mut self, user_data: UserData) {
        self.user_data = user_data;
    }

    #[inline]
    pub fn reference(&self) -> Option<RegistryRef> {
        self.reference
    }

    pub(crate) fn set_reference(&mut self, reference: Option<RegistryRef>) {
        self.reference = reference;
    }

    /// Parameters for `method`, zeroed when absent
    pub fn params<P: HookPayload>(&self, method: AugmentedMethod) -> P {
        find_params(Some(&self.stream), method)
    }

    pub fn intercepts(&self, method: AugmentedMethod) -> bool {
        self.stream.contains(method)
    }
}
