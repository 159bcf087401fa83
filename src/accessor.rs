//! Member accessors: typed get/set/invoke against a bound instance.
//!
//! Accessors pair a located member definition with the [`BoundInstance`] it
//! operates on. They are cheap to produce and carry no identity: filtering
//! twice for the same member yields two accessors over the same definition.
//!
//! Every operation returns a typed `Result`; failures are additionally
//! logged at `warn` level. Side effects are confined to the bound
//! instance's state.

use std::sync::Arc;

use specula_core::{AccessError, ArgValue, FieldDef, FromValue, IntoValue, MethodDef, Modifiers, TypeHash, Value};
use specula_registry::BoundInstance;
use tracing::warn;

/// Accessor for a located field on a bound instance.
pub struct FieldAccessor<'a> {
    field: Arc<FieldDef>,
    bound: &'a BoundInstance,
}

impl<'a> FieldAccessor<'a> {
    pub(crate) fn new(field: Arc<FieldDef>, bound: &'a BoundInstance) -> Self {
        Self { field, bound }
    }

    /// The underlying field definition.
    pub fn def(&self) -> &Arc<FieldDef> {
        &self.field
    }

    /// The field name.
    pub fn name(&self) -> &str {
        self.field.name()
    }

    /// The field's declared value type.
    pub fn value_type(&self) -> TypeHash {
        self.field.value_type()
    }

    /// The field's modifier flags.
    pub fn modifiers(&self) -> Modifiers {
        self.field.modifiers()
    }

    /// Read the field's current value.
    pub fn get(&self) -> Result<Value, AccessError> {
        let result = self
            .bound
            .read(|obj| self.field.read(obj))
            .and_then(|inner| inner);
        if let Err(error) = &result {
            warn!(field = self.field.name(), %error, "field read failed");
        }
        result
    }

    /// Read the field's current value and apply a transform to it.
    pub fn get_mapped<R>(&self, mapper: impl FnOnce(Value) -> R) -> Result<R, AccessError> {
        self.get().map(mapper)
    }

    /// Read the field's current value converted to a concrete type.
    pub fn get_as<T: FromValue + 'static>(&self) -> Result<T, AccessError> {
        let value = self.get()?;
        let found = value.type_label();
        T::from_value(value).ok_or_else(|| AccessError::ValueMismatch {
            expected: std::any::type_name::<T>(),
            found: found.to_owned(),
        })
    }

    /// Write a value into the field.
    ///
    /// [`Modifiers::FINAL`] does not gate the write; any field registered
    /// with a setter is writable. Only a field without a setter fails, with
    /// [`AccessError::NoSetter`].
    pub fn set(&self, value: impl IntoValue) -> Result<(), AccessError> {
        self.set_value(value.into_value())
    }

    /// Apply a transform to the given value, then write the result into the
    /// field.
    pub fn set_mapped(
        &self,
        value: impl IntoValue,
        mapper: impl FnOnce(Value) -> Value,
    ) -> Result<(), AccessError> {
        self.set_value(mapper(value.into_value()))
    }

    fn set_value(&self, value: Value) -> Result<(), AccessError> {
        let result = self
            .bound
            .write(|obj| self.field.write(obj, value))
            .and_then(|inner| inner);
        if let Err(error) = &result {
            warn!(field = self.field.name(), %error, "field write failed");
        }
        result
    }
}

impl std::fmt::Debug for FieldAccessor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("field", &self.field.name())
            .finish_non_exhaustive()
    }
}

/// Accessor for a located method on a bound instance.
pub struct MethodAccessor<'a> {
    method: Arc<MethodDef>,
    bound: &'a BoundInstance,
}

impl<'a> MethodAccessor<'a> {
    pub(crate) fn new(method: Arc<MethodDef>, bound: &'a BoundInstance) -> Self {
        Self { method, bound }
    }

    /// The underlying method definition.
    pub fn def(&self) -> &Arc<MethodDef> {
        &self.method
    }

    /// The method name.
    pub fn name(&self) -> &str {
        self.method.name()
    }

    /// The method's declared return type.
    pub fn return_type(&self) -> TypeHash {
        self.method.return_type()
    }

    /// The method's modifier flags.
    pub fn modifiers(&self) -> Modifiers {
        self.method.modifiers()
    }

    /// Invoke the method on the bound instance.
    ///
    /// Each [`ArgValue`] is materialized via `map()` just before the call.
    pub fn invoke(&self, args: impl IntoIterator<Item = ArgValue>) -> Result<Value, AccessError> {
        let args: Vec<Value> = args.into_iter().map(ArgValue::map).collect();
        let result = self
            .bound
            .write(|obj| self.method.call(obj, args))
            .and_then(|inner| inner);
        if let Err(error) = &result {
            warn!(method = self.method.name(), %error, "method invocation failed");
        }
        result
    }

    /// Invoke the method and apply a transform to the raw result.
    pub fn invoke_mapped<R>(
        &self,
        mapper: impl FnOnce(Value) -> R,
        args: impl IntoIterator<Item = ArgValue>,
    ) -> Result<R, AccessError> {
        self.invoke(args).map(mapper)
    }

    /// Invoke the method and convert the result to a concrete type.
    pub fn invoke_as<T: FromValue + 'static>(
        &self,
        args: impl IntoIterator<Item = ArgValue>,
    ) -> Result<T, AccessError> {
        let value = self.invoke(args)?;
        let found = value.type_label();
        T::from_value(value).ok_or_else(|| AccessError::ValueMismatch {
            expected: std::any::type_name::<T>(),
            found: found.to_owned(),
        })
    }
}

impl std::fmt::Debug for MethodAccessor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodAccessor")
            .field("method", &self.method.name())
            .finish_non_exhaustive()
    }
}
