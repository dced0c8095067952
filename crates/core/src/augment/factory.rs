//! Construction surface for extensions
//!
//! An extension either builds a stream once and shares it across many
//! objects, or hands raw descriptors to every call:
//!
//! ```ignore
//! let shared = build_method_stream(state, &descriptors)?;
//!
//! // Stack: [parent group?, x, y, radius]
//! let id = push_circle(state, scene, UserData::from_token(7), StreamSource::Shared(shared))?;
//! // Stack: [proxy]
//! ```
//!
//! Stream and user data are passed straight to the constructor; nothing is
//! staged between calls.

use std::sync::Arc;

use paste::paste;
use thiserror::Error;

use super::args;
use crate::scene::{DisplayObject, ObjectId, Scene};
use crate::stream::{self, HookDescriptor, MethodStream, StreamError, STREAM_METATABLE};
use stagehook_engine::{RegistryRef, ScriptError, ScriptState, ScriptValue, Userdata};
use stagehook_sdk::{ObjectKind, UserData};

/// Errors from constructing an augmented object
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("invalid augmented object: {0}")]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("registry value is not a method stream")]
    NotAStream,

    #[error("{0} cannot be constructed by an extension")]
    NotPushable(ObjectKind),

    #[error("first argument is an object but not a group")]
    InvalidParent,
}

/// Where an object's hooks come from
#[derive(Debug, Clone, Copy)]
pub enum StreamSource<'a> {
    /// A stream built earlier with [`build_method_stream`]
    Shared(RegistryRef),
    /// Descriptors compiled for this object alone
    Descriptors(&'a [HookDescriptor]),
}

/// Build a stream and store it in the runtime registry
///
/// The returned reference can be shared by any number of objects.
pub fn build_method_stream(
    state: &mut dyn ScriptState,
    descriptors: &[HookDescriptor],
) -> Result<RegistryRef, StreamError> {
    let stream = stream::build_method_stream(descriptors).inspect_err(|e| {
        tracing::error!("Method stream rejected: {}", e);
    })?;
    let userdata = Userdata::new(STREAM_METATABLE, Arc::new(stream));
    Ok(state.reference(ScriptValue::Userdata(userdata)))
}

/// Stream for a registry reference, if it holds one
fn shared_stream(
    state: &dyn ScriptState,
    reference: RegistryRef,
) -> Result<(Arc<MethodStream>, Userdata), FactoryError> {
    match state.registry_get(reference) {
        Some(ScriptValue::Userdata(userdata)) => userdata
            .downcast::<MethodStream>(STREAM_METATABLE)
            .map(|stream| (stream, userdata.clone()))
            .ok_or(FactoryError::NotAStream),
        Some(_) => Err(FactoryError::NotAStream),
        None => Err(ScriptError::UnknownReference.into()),
    }
}

/// Optional leading parent group; returns it and the first constructor index
fn leading_parent(
    state: &dyn ScriptState,
    scene: &Scene,
) -> Result<(Option<ObjectId>, i32), FactoryError> {
    match state.get(1) {
        Some(ScriptValue::Proxy(proxy)) => {
            let parent = scene
                .resolve_proxy(*proxy)
                .filter(|&id| scene.get(id).is_some_and(|o| o.is_group()))
                .ok_or(FactoryError::InvalidParent)?;
            Ok((Some(parent), 2))
        }
        _ => Ok((None, 1)),
    }
}

fn construct(
    state: &mut dyn ScriptState,
    scene: &mut Scene,
    kind: ObjectKind,
    user_data: UserData,
    source: StreamSource<'_>,
) -> Result<ObjectId, FactoryError> {
    if !kind.is_pushable() {
        return Err(FactoryError::NotPushable(kind));
    }

    let (stream, shared) = match source {
        StreamSource::Shared(reference) => {
            let (stream, userdata) = shared_stream(state, reference)?;
            (stream, Some(userdata))
        }
        StreamSource::Descriptors(descriptors) => {
            (Arc::new(stream::build_method_stream(descriptors)?), None)
        }
    };

    let (parent, start) = leading_parent(state, scene)?;
    let built = args::read(state, scene, kind, start)?;

    // Keep the stream reachable from the runtime for as long as objects use it
    let reference = match shared {
        Some(userdata) => {
            if state.guard(userdata.identity(), ScriptValue::Userdata(userdata.clone())) {
                tracing::debug!("Guarding shared method stream {:#x}", userdata.identity());
            }
            None
        }
        None => {
            let userdata = Userdata::new(STREAM_METATABLE, stream.clone());
            Some(state.reference(ScriptValue::Userdata(userdata)))
        }
    };

    let id = scene.create_augmented(kind, built.data, stream, user_data);
    if let Some(object) = scene.get_mut(id) {
        object.transform.x = built.x;
        object.transform.y = built.y;
        if let Some(augmentation) = object.augmentation.as_mut() {
            augmentation.set_reference(reference);
        }
    }

    let parent = parent.unwrap_or(scene.stage());
    scene.insert(parent, None, id);

    Ok(id)
}

/// Construct an augmented object of `kind` from the arguments on the stack
///
/// On success the stack holds only the new object's proxy. On failure the
/// stack is cleared and nothing is created.
pub fn push_object(
    state: &mut dyn ScriptState,
    scene: &mut Scene,
    kind: ObjectKind,
    user_data: UserData,
    source: StreamSource<'_>,
) -> Result<ObjectId, FactoryError> {
    let result = construct(state, scene, kind, user_data, source);
    state.set_top(0);

    match result {
        Ok(id) => {
            state.push(ScriptValue::Proxy(scene.proxy_ref(id)));
            tracing::debug!("Pushed augmented {} {:?}", kind, id);
            Ok(id)
        }
        Err(e) => {
            tracing::error!("Failed to push {}: {}", kind, e);
            Err(e)
        }
    }
}

/// Finalize an object and drop the registry references its subtree held
pub fn release_object(state: &mut dyn ScriptState, scene: &mut Scene, id: ObjectId) {
    let mut pending = vec![id];
    let mut references = Vec::new();
    while let Some(node) = pending.pop() {
        if let Some(reference) = scene
            .get(node)
            .and_then(|o| o.augmentation())
            .and_then(|a| a.reference())
        {
            references.push(reference);
        }
        pending.extend_from_slice(scene.children(node));
        pending.extend(scene.get(node).and_then(DisplayObject::owned_group));
    }

    scene.remove_self(id);
    for reference in references {
        state.unreference(reference);
    }
}

macro_rules! push_kind_fns {
    ($($kind:ident),* $(,)?) => {
        paste! {
            $(
                #[doc = "Construct an augmented `" $kind "`; see [`push_object`]"]
                pub fn [<push_ $kind:snake>](
                    state: &mut dyn ScriptState,
                    scene: &mut Scene,
                    user_data: UserData,
                    source: StreamSource<'_>,
                ) -> Result<ObjectId, FactoryError> {
                    push_object(state, scene, ObjectKind::$kind, user_data, source)
                }
            )*
        }
    };
}

push_kind_fns!(
    Circle,
    Rect,
    RoundedRect,
    Polygon,
    Mesh,
    Line,
    Image,
    ImageRect,
    Group,
    Container,
    Snapshot,
    Sprite,
    Text,
    EmbossedText,
    Emitter,
);
