//! Method streams
//!
//! A method stream is the compact, immutable record of which methods an
//! augmented object intercepts and with which callbacks. It is built once from
//! a list of descriptors and then shared by every object created from it.
//!
//! # Layout
//!
//! ```text
//! +-------+-----+-----+-----+----------------+----------------+-----
//! | count | id0 | id1 | ... | params0 (24 B) | params1 (24 B) | ...
//! +-------+-----+-----+-----+----------------+----------------+-----
//! ```
//!
//! Ids are strictly increasing, so a lookup for id `n` never needs to look
//! at more than the first `n` entries.
//!
//! # Example
//!
//! ```ignore
//! let stream = build_method_stream(&[
//!     HookDescriptor::new(AugmentedMethod::Rotate, RotateParams { after: Some(on_rotate), ..Default::default() }),
//! ])?;
//!
//! let rotate: RotateParams = find_params(Some(&stream), AugmentedMethod::Rotate);
//! ```

pub mod codec;
pub mod params;

use std::fmt;

use stagehook_sdk::{AugmentedMethod, ParamsFamily, METHOD_COUNT};
use thiserror::Error;

pub use codec::{BlockReader, BlockWriter, PAYLOAD_WIDTH};
pub use params::*;

/// Metatable name of a stream stored as script userdata
pub const STREAM_METATABLE: &str = "stagehook.MethodStream";

/// Errors from building a method stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("method stream has no entries")]
    Empty,

    #[error("invalid method id {0}")]
    InvalidMethod(u8),

    #[error("method {0} declared more than once")]
    Duplicate(AugmentedMethod),

    #[error("method {method} takes {expected:?} parameters, got {found:?}")]
    ParamsMismatch {
        method: AugmentedMethod,
        expected: ParamsFamily,
        found: ParamsFamily,
    },
}

/// One hook declaration: a raw method id and its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HookDescriptor {
    /// Raw id so that malformed input can be represented and rejected
    pub method: u8,
    pub params: HookParams,
}

impl HookDescriptor {
    pub fn new(method: AugmentedMethod, params: impl Into<HookParams>) -> Self {
        Self {
            method: method.id(),
            params: params.into(),
        }
    }

    pub fn from_raw(method: u8, params: impl Into<HookParams>) -> Self {
        Self {
            method,
            params: params.into(),
        }
    }
}

/// An encoded, immutable method stream
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MethodStream {
    bytes: Box<[u8]>,
}

impl MethodStream {
    /// The encoded bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of methods in the stream
    #[inline]
    pub fn count(&self) -> usize {
        self.bytes.first().copied().unwrap_or(0) as usize
    }

    /// Method ids in ascending order
    pub fn methods(&self) -> impl Iterator<Item = AugmentedMethod> + '_ {
        self.ids().iter().filter_map(|&id| AugmentedMethod::from_id(id))
    }

    pub fn contains(&self, method: AugmentedMethod) -> bool {
        self.position(method).is_some()
    }

    /// Decode the parameters for `method`, if present with family `P`
    pub fn params<P: HookPayload>(&self, method: AugmentedMethod) -> Option<P> {
        if method.params_family() != Some(P::FAMILY) {
            return None;
        }
        let index = self.position(method)?;
        let start = 1 + self.count() + index * PAYLOAD_WIDTH;
        let block = self.bytes.get(start..start + PAYLOAD_WIDTH)?;
        Some(P::decode(&mut BlockReader::new(block)))
    }

    fn ids(&self) -> &[u8] {
        self.bytes.get(1..1 + self.count()).unwrap_or(&[])
    }

    fn position(&self, method: AugmentedMethod) -> Option<usize> {
        let id = method.id();
        if id == 0 {
            return None;
        }
        let ids = self.ids();
        let limit = ids.len().min(id as usize);
        ids[..limit].iter().position(|&m| m == id)
    }
}

impl fmt::Debug for MethodStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.methods()).finish()
    }
}

/// Build a stream from hook descriptors
///
/// Descriptors with id 0 are ignored; the rest are sorted by id, so the
/// result does not depend on input order.
pub fn build_method_stream(descriptors: &[HookDescriptor]) -> Result<MethodStream, StreamError> {
    let mut entries: Vec<&HookDescriptor> = descriptors.iter().filter(|d| d.method != 0).collect();

    if entries.is_empty() {
        return Err(StreamError::Empty);
    }

    entries.sort_by_key(|d| d.method);

    let mut last = 0u8;
    for entry in &entries {
        let method =
            AugmentedMethod::from_id(entry.method).ok_or(StreamError::InvalidMethod(entry.method))?;
        if entry.method == last {
            return Err(StreamError::Duplicate(method));
        }
        last = entry.method;

        let expected = method
            .params_family()
            .ok_or(StreamError::InvalidMethod(entry.method))?;
        let found = entry.params.family();
        if expected != found {
            return Err(StreamError::ParamsMismatch {
                method,
                expected,
                found,
            });
        }
    }

    // At most METHOD_COUNT - 1 distinct ids survive the checks above
    debug_assert!(entries.len() < METHOD_COUNT as usize);
    let count = entries.len();
    let mut bytes = vec![0u8; 1 + count + count * PAYLOAD_WIDTH];
    bytes[0] = count as u8;

    for (i, entry) in entries.iter().enumerate() {
        bytes[1 + i] = entry.method;
        let start = 1 + count + i * PAYLOAD_WIDTH;
        let mut block = BlockWriter::new(&mut bytes[start..start + PAYLOAD_WIDTH]);
        entry.params.encode(&mut block);
    }

    tracing::debug!("Built method stream with {} methods", count);

    Ok(MethodStream {
        bytes: bytes.into_boxed_slice(),
    })
}

/// Parameters for `method`, or the zero value
///
/// Returns `P::default()` when there is no stream, the method is absent, or
/// the method's family is not `P`.
pub fn find_params<P: HookPayload>(stream: Option<&MethodStream>, method: AugmentedMethod) -> P {
    stream
        .and_then(|s| s.params::<P>(method))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookContext;
    use crate::handles::Handle;
    use stagehook_engine::ScriptState;
    use stagehook_sdk::UserData;

    fn rotate_a(_: &mut HookContext<'_>, _: f32) {}
    fn rotate_b(_: &mut HookContext<'_>, _: f32) {}
    fn draw_a(_: &mut HookContext<'_>, _: Handle) {}
    fn hit(_: &mut HookContext<'_>, _: f32, _: f32, _: &mut bool) {}

    fn p1() -> RotateParams {
        RotateParams {
            before: Some(rotate_a),
            after: Some(rotate_b),
            ignore_original: false,
        }
    }

    fn p2() -> DrawParams {
        DrawParams {
            before: None,
            after: Some(draw_a),
            ignore_original: true,
        }
    }

    #[test]
    fn test_find_present_and_absent() {
        let stream = build_method_stream(&[
            HookDescriptor::new(AugmentedMethod::Rotate, p1()),
            HookDescriptor::new(AugmentedMethod::Draw, p2()),
        ])
        .unwrap();

        assert_eq!(stream.count(), 2);
        assert_eq!(find_params::<DrawParams>(Some(&stream), AugmentedMethod::Draw), p2());
        assert_eq!(find_params::<RotateParams>(Some(&stream), AugmentedMethod::Rotate), p1());
        assert_eq!(
            find_params::<TranslateParams>(Some(&stream), AugmentedMethod::Translate),
            TranslateParams::default()
        );
        assert_eq!(
            find_params::<RotateParams>(None, AugmentedMethod::Rotate),
            RotateParams::default()
        );
    }

    #[test]
    fn test_layout() {
        let stream = build_method_stream(&[
            HookDescriptor::new(AugmentedMethod::Rotate, p1()),
            HookDescriptor::new(AugmentedMethod::Draw, p2()),
        ])
        .unwrap();

        let bytes = stream.as_bytes();
        assert_eq!(bytes.len(), 1 + 2 + 2 * PAYLOAD_WIDTH);
        assert_eq!(&bytes[..3], &[2, AugmentedMethod::Draw.id(), AugmentedMethod::Rotate.id()]);
        assert_eq!(
            stream.methods().collect::<Vec<_>>(),
            vec![AugmentedMethod::Draw, AugmentedMethod::Rotate]
        );
    }

    #[test]
    fn test_order_independent() {
        let a = build_method_stream(&[
            HookDescriptor::new(AugmentedMethod::Rotate, p1()),
            HookDescriptor::new(AugmentedMethod::Draw, p2()),
        ])
        .unwrap();
        let b = build_method_stream(&[
            HookDescriptor::new(AugmentedMethod::Draw, p2()),
            HookDescriptor::from_raw(0, BasicParams::default()),
            HookDescriptor::new(AugmentedMethod::Rotate, p1()),
        ])
        .unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_family_mismatch_reads_default() {
        let stream = build_method_stream(&[HookDescriptor::new(AugmentedMethod::Rotate, p1())]).unwrap();
        assert_eq!(
            find_params::<ScaleParams>(Some(&stream), AugmentedMethod::Rotate),
            ScaleParams::default()
        );
    }

    #[test]
    fn test_build_errors() {
        assert_eq!(build_method_stream(&[]), Err(StreamError::Empty));
        assert_eq!(
            build_method_stream(&[HookDescriptor::from_raw(0, BasicParams::default())]),
            Err(StreamError::Empty)
        );
        assert_eq!(
            build_method_stream(&[HookDescriptor::from_raw(METHOD_COUNT, BasicParams::default())]),
            Err(StreamError::InvalidMethod(METHOD_COUNT))
        );
        assert_eq!(
            build_method_stream(&[
                HookDescriptor::new(AugmentedMethod::Rotate, p1()),
                HookDescriptor::new(AugmentedMethod::Rotate, p1()),
            ]),
            Err(StreamError::Duplicate(AugmentedMethod::Rotate))
        );
        assert_eq!(
            build_method_stream(&[HookDescriptor::new(AugmentedMethod::Draw, p1())]),
            Err(StreamError::ParamsMismatch {
                method: AugmentedMethod::Draw,
                expected: ParamsFamily::Draw,
                found: ParamsFamily::Rotate,
            })
        );
    }

    #[test]
    fn test_flags_survive() {
        let params = BooleanResultPointParams {
            before: Some(hit),
            after: None,
            ignore_original: true,
            early_out_if_non_zero: true,
        };
        let value = ValueParams {
            disallow_early_out: true,
            early_out_if_zero: true,
            ..Default::default()
        };
        let stream = build_method_stream(&[
            HookDescriptor::new(AugmentedMethod::HitTest, params),
            HookDescriptor::new(AugmentedMethod::Value, value),
        ])
        .unwrap();

        assert_eq!(stream.params::<BooleanResultPointParams>(AugmentedMethod::HitTest), Some(params));
        assert_eq!(stream.params::<ValueParams>(AugmentedMethod::Value), Some(value));
    }

    fn basic(_: &mut HookContext<'_>) {}
    fn parent(_: &mut HookContext<'_>, _: Handle) {}
    fn matrix(_: &mut HookContext<'_>, _: &mut [f32; 6]) {}
    fn rect(_: &mut HookContext<'_>, _: &mut f32, _: &mut f32, _: &mut f32, _: &mut f32) {}
    fn scale(_: &mut HookContext<'_>, _: f32, _: f32) {}
    fn translate(_: &mut HookContext<'_>, _: f32, _: f32) {}
    fn did_insert(_: &mut HookContext<'_>, _: bool) {}
    fn boolean(_: &mut HookContext<'_>, _: &mut bool) {}
    fn boolean_matrix(_: &mut HookContext<'_>, _: &[f32; 6], _: &mut bool) {}
    fn set_value(_: &mut HookContext<'_>, _: &mut dyn ScriptState, _: &str, _: i32, _: &mut bool) {}
    fn value(_: &mut HookContext<'_>, _: &mut dyn ScriptState, _: &str, _: &mut i32) {}
    fn on_create(_: &mut HookContext<'_>, _: &mut UserData) {}
    fn on_message(_: &mut HookContext<'_>, _: &str, _: &[u8]) {}

    #[test]
    fn test_one_method_per_family() {
        let basic_params = BasicParams {
            before: Some(basic),
            after: None,
            ignore_original: true,
        };
        let group_basic = GroupBasicParams {
            before: None,
            after: Some(basic),
            ignore_original: false,
        };
        let parent_params = ParentParams {
            before: Some(parent),
            after: Some(parent),
            ignore_original: false,
        };
        let matrix_params = MatrixParams {
            before: None,
            after: Some(matrix),
            ignore_original: true,
        };
        let rect_params = RectResultParams {
            before: Some(rect),
            after: None,
            ignore_original: false,
        };
        let scale_params = ScaleParams {
            before: Some(scale),
            after: Some(scale),
            ignore_original: true,
        };
        let translate_params = TranslateParams {
            before: None,
            after: Some(translate),
            ignore_original: false,
        };
        let did_insert_params = DidInsertParams {
            before: Some(did_insert),
            after: None,
            ignore_original: true,
        };
        let boolean_params = BooleanResultParams {
            before: Some(boolean),
            after: None,
            ignore_original: false,
            early_out_if_non_zero: true,
        };
        let point_params = BooleanResultPointParams {
            before: None,
            after: Some(hit),
            ignore_original: true,
            early_out_if_non_zero: false,
        };
        let boolean_matrix_params = BooleanResultMatrixParams {
            before: Some(boolean_matrix),
            after: Some(boolean_matrix),
            ignore_original: false,
            early_out_if_non_zero: true,
        };
        let set_value_params = SetValueParams {
            before: Some(set_value),
            after: None,
            ignore_original: false,
            disallow_early_out: true,
        };
        let value_params = ValueParams {
            before: None,
            after: Some(value),
            ignore_original: true,
            disallow_early_out: false,
            early_out_if_zero: true,
        };
        let on_create_params = OnCreateParams { action: Some(on_create) };
        let on_finalize_params = OnFinalizeParams { action: Some(basic) };
        let on_message_params = OnMessageParams { action: Some(on_message) };

        let stream = build_method_stream(&[
            HookDescriptor::new(AugmentedMethod::Prepare, basic_params),
            HookDescriptor::new(AugmentedMethod::DidRemove, group_basic),
            HookDescriptor::new(AugmentedMethod::AddedToParent, parent_params),
            HookDescriptor::new(AugmentedMethod::DidUpdateTransform, matrix_params),
            HookDescriptor::new(AugmentedMethod::Draw, p2()),
            HookDescriptor::new(AugmentedMethod::GetSelfBounds, rect_params),
            HookDescriptor::new(AugmentedMethod::Rotate, p1()),
            HookDescriptor::new(AugmentedMethod::Scale, scale_params),
            HookDescriptor::new(AugmentedMethod::Translate, translate_params),
            HookDescriptor::new(AugmentedMethod::DidInsert, did_insert_params),
            HookDescriptor::new(AugmentedMethod::CanCull, boolean_params),
            HookDescriptor::new(AugmentedMethod::HitTest, point_params),
            HookDescriptor::new(AugmentedMethod::UpdateTransform, boolean_matrix_params),
            HookDescriptor::new(AugmentedMethod::SetValue, set_value_params),
            HookDescriptor::new(AugmentedMethod::Value, value_params),
            HookDescriptor::new(AugmentedMethod::OnCreate, on_create_params),
            HookDescriptor::new(AugmentedMethod::OnFinalize, on_finalize_params),
            HookDescriptor::new(AugmentedMethod::OnMessage, on_message_params),
        ])
        .unwrap();

        assert_eq!(stream.count(), 18);
        let families: std::collections::HashSet<_> =
            stream.methods().filter_map(AugmentedMethod::params_family).collect();
        assert_eq!(families.len(), 18);

        let found = Some(&stream);
        assert_eq!(find_params::<BasicParams>(found, AugmentedMethod::Prepare), basic_params);
        assert_eq!(find_params::<GroupBasicParams>(found, AugmentedMethod::DidRemove), group_basic);
        assert_eq!(find_params::<ParentParams>(found, AugmentedMethod::AddedToParent), parent_params);
        assert_eq!(find_params::<MatrixParams>(found, AugmentedMethod::DidUpdateTransform), matrix_params);
        assert_eq!(find_params::<DrawParams>(found, AugmentedMethod::Draw), p2());
        assert_eq!(find_params::<RectResultParams>(found, AugmentedMethod::GetSelfBounds), rect_params);
        assert_eq!(find_params::<RotateParams>(found, AugmentedMethod::Rotate), p1());
        assert_eq!(find_params::<ScaleParams>(found, AugmentedMethod::Scale), scale_params);
        assert_eq!(find_params::<TranslateParams>(found, AugmentedMethod::Translate), translate_params);
        assert_eq!(find_params::<DidInsertParams>(found, AugmentedMethod::DidInsert), did_insert_params);
        assert_eq!(find_params::<BooleanResultParams>(found, AugmentedMethod::CanCull), boolean_params);
        assert_eq!(find_params::<BooleanResultPointParams>(found, AugmentedMethod::HitTest), point_params);
        assert_eq!(
            find_params::<BooleanResultMatrixParams>(found, AugmentedMethod::UpdateTransform),
            boolean_matrix_params
        );
        assert_eq!(find_params::<SetValueParams>(found, AugmentedMethod::SetValue), set_value_params);
        assert_eq!(find_params::<ValueParams>(found, AugmentedMethod::Value), value_params);
        assert_eq!(find_params::<OnCreateParams>(found, AugmentedMethod::OnCreate), on_create_params);
        assert_eq!(find_params::<OnFinalizeParams>(found, AugmentedMethod::OnFinalize), on_finalize_params);
        assert_eq!(find_params::<OnMessageParams>(found, AugmentedMethod::OnMessage), on_message_params);

        // Same-family siblings stay absent
        assert_eq!(
            find_params::<BooleanResultParams>(found, AugmentedMethod::CanHitTest),
            BooleanResultParams::default()
        );
    }

    #[test]
    fn test_every_family_fits_block() {
        let mut block = [0u8; PAYLOAD_WIDTH];
        let mut w = BlockWriter::new(&mut block);
        ValueParams::default().encode(&mut w);
        assert!(w.position() <= PAYLOAD_WIDTH);
    }
}
