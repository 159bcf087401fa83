//! Constructor definitions.

use std::any::Any;
use std::sync::Arc;

use crate::{AccessError, FromValue, TypeHash, Value};

use super::field::convert_value;

type Factory = Arc<dyn Fn(Vec<Value>) -> Result<Box<dyn Any>, AccessError> + Send + Sync>;

/// A registered constructor for a type.
///
/// Identified by its exact parameter-type signature; the instance factory
/// matches argument runtime types against `params` before invoking.
#[derive(Clone)]
pub struct CtorDef {
    params: Vec<TypeHash>,
    param_names: Vec<&'static str>,
    factory: Factory,
}

impl CtorDef {
    /// Register a zero-argument constructor.
    pub fn nullary<O>(f: impl Fn() -> O + Send + Sync + 'static) -> Self
    where
        O: Any,
    {
        let factory: Factory = Arc::new(move |args| {
            take_args::<0>(args)?;
            Ok(Box::new(f()))
        });
        Self {
            params: Vec::new(),
            param_names: Vec::new(),
            factory,
        }
    }

    /// Register a one-argument constructor.
    pub fn unary<O, A>(f: impl Fn(A) -> O + Send + Sync + 'static) -> Self
    where
        O: Any,
        A: FromValue + 'static,
    {
        let factory: Factory = Arc::new(move |args| {
            let [a] = take_args::<1>(args)?;
            Ok(Box::new(f(convert_value::<A>(a)?)))
        });
        Self {
            params: vec![TypeHash::of::<A>()],
            param_names: vec![std::any::type_name::<A>()],
            factory,
        }
    }

    /// Register a two-argument constructor.
    pub fn binary<O, A, B>(f: impl Fn(A, B) -> O + Send + Sync + 'static) -> Self
    where
        O: Any,
        A: FromValue + 'static,
        B: FromValue + 'static,
    {
        let factory: Factory = Arc::new(move |args| {
            let [a, b] = take_args::<2>(args)?;
            Ok(Box::new(f(convert_value::<A>(a)?, convert_value::<B>(b)?)))
        });
        Self {
            params: vec![TypeHash::of::<A>(), TypeHash::of::<B>()],
            param_names: vec![std::any::type_name::<A>(), std::any::type_name::<B>()],
            factory,
        }
    }

    /// Register a three-argument constructor.
    pub fn ternary<O, A, B, C>(f: impl Fn(A, B, C) -> O + Send + Sync + 'static) -> Self
    where
        O: Any,
        A: FromValue + 'static,
        B: FromValue + 'static,
        C: FromValue + 'static,
    {
        let factory: Factory = Arc::new(move |args| {
            let [a, b, c] = take_args::<3>(args)?;
            Ok(Box::new(f(
                convert_value::<A>(a)?,
                convert_value::<B>(b)?,
                convert_value::<C>(c)?,
            )))
        });
        Self {
            params: vec![
                TypeHash::of::<A>(),
                TypeHash::of::<B>(),
                TypeHash::of::<C>(),
            ],
            param_names: vec![
                std::any::type_name::<A>(),
                std::any::type_name::<B>(),
                std::any::type_name::<C>(),
            ],
            factory,
        }
    }

    /// Produce a new type-erased instance from the given arguments.
    pub fn instantiate(&self, args: Vec<Value>) -> Result<Box<dyn Any>, AccessError> {
        (self.factory)(args)
    }

    /// The exact parameter-type signature, in order.
    pub fn params(&self) -> &[TypeHash] {
        &self.params
    }

    /// The parameter type names, for diagnostics.
    pub fn param_names(&self) -> &[&'static str] {
        &self.param_names
    }

    /// Stable diagnostic identity of this constructor under its owner type.
    pub fn signature_hash(&self, owner: TypeHash) -> TypeHash {
        TypeHash::from_constructor(owner, &self.params)
    }
}

impl std::fmt::Debug for CtorDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CtorDef")
            .field("params", &self.param_names)
            .finish()
    }
}

fn take_args<const N: usize>(args: Vec<Value>) -> Result<[Value; N], AccessError> {
    let found = args.len();
    <[Value; N]>::try_from(args).map_err(|_| AccessError::ArityMismatch { expected: N, found })
}
