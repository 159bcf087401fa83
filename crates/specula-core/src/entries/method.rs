//! Method member definitions.

use std::any::Any;
use std::sync::Arc;

use crate::{AccessError, FromValue, IntoValue, Member, Modifiers, TypeHash, Value};

use super::field::{convert_value, downcast_receiver_mut};

type Invoker = Arc<dyn Fn(&mut dyn Any, Vec<Value>) -> Result<Value, AccessError> + Send + Sync>;

/// A declared method of a registered type.
///
/// The value type of a method, for grouping and filtering purposes, is its
/// declared return type. The invoke thunk receives the type-erased receiver
/// and the already-materialized argument values.
#[derive(Clone)]
pub struct MethodDef {
    name: String,
    return_type: TypeHash,
    return_type_name: &'static str,
    params: Vec<TypeHash>,
    modifiers: Modifiers,
    invoker: Invoker,
}

impl MethodDef {
    /// Register a zero-argument method.
    pub fn nullary<O, R>(
        name: impl Into<String>,
        modifiers: Modifiers,
        f: impl Fn(&mut O) -> R + Send + Sync + 'static,
    ) -> Self
    where
        O: Any,
        R: IntoValue + 'static,
    {
        let invoker: Invoker = Arc::new(move |obj, args| {
            expect_arity(&args, 0)?;
            let obj = downcast_receiver_mut::<O>(obj)?;
            Ok(f(obj).into_value())
        });
        Self::from_parts(name, Vec::new(), modifiers, invoker, return_meta::<R>())
    }

    /// Register a one-argument method.
    pub fn unary<O, A, R>(
        name: impl Into<String>,
        modifiers: Modifiers,
        f: impl Fn(&mut O, A) -> R + Send + Sync + 'static,
    ) -> Self
    where
        O: Any,
        A: FromValue + 'static,
        R: IntoValue + 'static,
    {
        let invoker: Invoker = Arc::new(move |obj, args| {
            let [a] = take_args::<1>(args)?;
            let a = convert_value::<A>(a)?;
            let obj = downcast_receiver_mut::<O>(obj)?;
            Ok(f(obj, a).into_value())
        });
        Self::from_parts(
            name,
            vec![TypeHash::of::<A>()],
            modifiers,
            invoker,
            return_meta::<R>(),
        )
    }

    /// Register a two-argument method.
    pub fn binary<O, A, B, R>(
        name: impl Into<String>,
        modifiers: Modifiers,
        f: impl Fn(&mut O, A, B) -> R + Send + Sync + 'static,
    ) -> Self
    where
        O: Any,
        A: FromValue + 'static,
        B: FromValue + 'static,
        R: IntoValue + 'static,
    {
        let invoker: Invoker = Arc::new(move |obj, args| {
            let [a, b] = take_args::<2>(args)?;
            let a = convert_value::<A>(a)?;
            let b = convert_value::<B>(b)?;
            let obj = downcast_receiver_mut::<O>(obj)?;
            Ok(f(obj, a, b).into_value())
        });
        Self::from_parts(
            name,
            vec![TypeHash::of::<A>(), TypeHash::of::<B>()],
            modifiers,
            invoker,
            return_meta::<R>(),
        )
    }

    /// Register a fallible method. A target-side `Err` surfaces as
    /// [`AccessError::InvocationFailed`].
    pub fn fallible<O, R, E>(
        name: impl Into<String>,
        modifiers: Modifiers,
        f: impl Fn(&mut O, Vec<Value>) -> Result<R, E> + Send + Sync + 'static,
        params: Vec<TypeHash>,
    ) -> Self
    where
        O: Any,
        R: IntoValue + 'static,
        E: std::fmt::Display,
    {
        let expected = params.len();
        let invoker: Invoker = Arc::new(move |obj, args| {
            expect_arity(&args, expected)?;
            let obj = downcast_receiver_mut::<O>(obj)?;
            match f(obj, args) {
                Ok(r) => Ok(r.into_value()),
                Err(e) => Err(AccessError::InvocationFailed {
                    reason: e.to_string(),
                }),
            }
        });
        Self::from_parts(name, params, modifiers, invoker, return_meta::<R>())
    }

    fn from_parts(
        name: impl Into<String>,
        params: Vec<TypeHash>,
        modifiers: Modifiers,
        invoker: Invoker,
        (return_type, return_type_name): (TypeHash, &'static str),
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            return_type_name,
            params,
            modifiers,
            invoker,
        }
    }

    /// Invoke the method on a type-erased instance.
    pub fn call(&self, instance: &mut dyn Any, args: Vec<Value>) -> Result<Value, AccessError> {
        (self.invoker)(instance, args)
    }

    /// The method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared return type (the method's value type for grouping).
    pub fn return_type(&self) -> TypeHash {
        self.return_type
    }

    /// The declared return type name.
    pub fn return_type_name(&self) -> &'static str {
        self.return_type_name
    }

    /// The declared parameter type hashes, in order.
    pub fn params(&self) -> &[TypeHash] {
        &self.params
    }

    /// The method's modifier flags.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl Member for MethodDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn value_type(&self) -> TypeHash {
        self.return_type
    }
}

impl std::fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("return_type", &self.return_type_name)
            .field("arity", &self.params.len())
            .field("modifiers", &self.modifiers)
            .finish()
    }
}

fn return_meta<R: 'static>() -> (TypeHash, &'static str) {
    (TypeHash::of::<R>(), std::any::type_name::<R>())
}

fn expect_arity(args: &[Value], expected: usize) -> Result<(), AccessError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(AccessError::ArityMismatch {
            expected,
            found: args.len(),
        })
    }
}

fn take_args<const N: usize>(args: Vec<Value>) -> Result<[Value; N], AccessError> {
    let found = args.len();
    <[Value; N]>::try_from(args).map_err(|_| AccessError::ArityMismatch { expected: N, found })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        count: i64,
    }

    #[test]
    fn nullary_invocation() {
        let bump = MethodDef::nullary::<Counter, i64>("bump", Modifiers::PUBLIC, |c| {
            c.count += 1;
            c.count
        });
        let mut counter = Counter { count: 0 };

        assert!(matches!(bump.call(&mut counter, vec![]), Ok(Value::Int(1))));
        assert!(matches!(bump.call(&mut counter, vec![]), Ok(Value::Int(2))));
    }

    #[test]
    fn unary_converts_argument() {
        let add = MethodDef::unary::<Counter, i64, i64>("add", Modifiers::PUBLIC, |c, n| {
            c.count += n;
            c.count
        });
        let mut counter = Counter { count: 10 };

        assert!(matches!(
            add.call(&mut counter, vec![Value::Int(5)]),
            Ok(Value::Int(15))
        ));
        assert_eq!(add.params(), &[TypeHash::of::<i64>()]);
    }

    #[test]
    fn arity_is_checked() {
        let add = MethodDef::unary::<Counter, i64, i64>("add", Modifiers::PUBLIC, |c, n| {
            c.count += n;
            c.count
        });
        let mut counter = Counter { count: 0 };

        assert!(matches!(
            add.call(&mut counter, vec![]),
            Err(AccessError::ArityMismatch {
                expected: 1,
                found: 0
            })
        ));
    }

    #[test]
    fn return_type_is_the_value_type() {
        let describe =
            MethodDef::nullary::<Counter, String>("describe", Modifiers::PUBLIC, |c| {
                format!("count={}", c.count)
            });
        assert_eq!(Member::value_type(&describe), TypeHash::of::<String>());
    }

    #[test]
    fn fallible_surfaces_target_failure() {
        let halve = MethodDef::fallible::<Counter, i64, String>(
            "halve",
            Modifiers::PUBLIC,
            |c, _args| {
                if c.count % 2 == 0 {
                    c.count /= 2;
                    Ok(c.count)
                } else {
                    Err("odd count".to_owned())
                }
            },
            vec![],
        );
        let mut counter = Counter { count: 3 };

        let err = halve.call(&mut counter, vec![]).unwrap_err();
        assert!(matches!(err, AccessError::InvocationFailed { .. }));
        assert!(err.to_string().contains("odd count"));
    }
}
