//! Argument wrappers for method invocation.
//!
//! An [`ArgValue`] pairs an input value with a transform that normalizes it
//! into the exact value a target method expects. The transform is applied
//! eagerly by [`map`](ArgValue::map), once per use, just before invocation.

use crate::{IntoValue, Value};

/// An immutable (value, transform) pair.
///
/// # Examples
///
/// ```
/// use specula_core::{ArgValue, Value};
///
/// let doubled = ArgValue::of(5i64, |x: i64| x * 2);
/// assert!(matches!(doubled.map(), Value::Int(10)));
///
/// let passed = ArgValue::pass("a");
/// assert!(matches!(passed.map(), Value::Str(s) if s == "a"));
/// ```
pub struct ArgValue {
    produce: Box<dyn FnOnce() -> Value + Send>,
}

impl ArgValue {
    /// Wrap a value with the identity transform.
    pub fn pass(value: impl IntoValue + Send + 'static) -> Self {
        ArgValue {
            produce: Box::new(move || value.into_value()),
        }
    }

    /// Wrap a value with an explicit transform.
    ///
    /// The transform runs on the typed input and its result is converted to
    /// a [`Value`] for the invocation.
    pub fn of<T, R>(value: T, mapper: impl FnOnce(T) -> R + Send + 'static) -> Self
    where
        T: Send + 'static,
        R: IntoValue,
    {
        ArgValue {
            produce: Box::new(move || mapper(value).into_value()),
        }
    }

    /// Apply the transform and materialize the invocation-ready value.
    pub fn map(self) -> Value {
        (self.produce)()
    }
}

impl std::fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgValue").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_applies_transform() {
        let arg = ArgValue::of(5i64, |x| x * 2);
        assert!(matches!(arg.map(), Value::Int(10)));
    }

    #[test]
    fn pass_through_is_identity() {
        let arg = ArgValue::pass("a");
        assert!(matches!(arg.map(), Value::Str(s) if s == "a"));
    }

    #[test]
    fn transform_can_change_type() {
        let arg = ArgValue::of(7i64, |x| format!("#{x}"));
        assert!(matches!(arg.map(), Value::Str(s) if s == "#7"));
    }
}
