//! Early-out policies
//!
//! Each parameter family decides how its flags map onto a policy; see the
//! `early_out` method on the boolean, set-value and value parameter blocks.

/// When to stop after the `before` hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarlyOut {
    /// Always continue
    #[default]
    Never,
    /// Stop when the result is zero / false
    IfZero,
    /// Stop when the result is non-zero / true
    IfNonZero,
}

/// A hook result whose truthiness can trigger an early-out
pub trait HookOutput: Copy {
    fn is_non_zero(&self) -> bool;
}

impl HookOutput for bool {
    #[inline]
    fn is_non_zero(&self) -> bool {
        *self
    }
}

impl HookOutput for i32 {
    #[inline]
    fn is_non_zero(&self) -> bool {
        *self != 0
    }
}

impl EarlyOut {
    /// Whether `result` stops the invocation
    #[inline]
    pub fn triggers<R: HookOutput>(self, result: &R) -> bool {
        match self {
            Self::Never => false,
            Self::IfZero => !result.is_non_zero(),
            Self::IfNonZero => result.is_non_zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{BooleanResultParams, SetValueParams, ValueParams};

    #[test]
    fn test_triggers() {
        assert!(!EarlyOut::Never.triggers(&true));
        assert!(EarlyOut::IfZero.triggers(&0i32));
        assert!(!EarlyOut::IfZero.triggers(&2i32));
        assert!(EarlyOut::IfNonZero.triggers(&true));
    }

    #[test]
    fn test_family_mappings() {
        let boolean = BooleanResultParams::default();
        assert_eq!(boolean.early_out(), EarlyOut::IfZero);

        let set = SetValueParams::default();
        assert_eq!(set.early_out(), EarlyOut::IfNonZero);
        let set = SetValueParams {
            disallow_early_out: true,
            ..Default::default()
        };
        assert_eq!(set.early_out(), EarlyOut::Never);

        let value = ValueParams {
            early_out_if_zero: true,
            ..Default::default()
        };
        assert_eq!(value.early_out(), EarlyOut::IfZero);
        let value = ValueParams {
            disallow_early_out: true,
            early_out_if_zero: true,
            ..Default::default()
        };
        assert_eq!(value.early_out(), EarlyOut::Never);
    }
}
