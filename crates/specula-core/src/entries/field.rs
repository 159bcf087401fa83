//! Field member definitions.

use std::any::Any;
use std::sync::Arc;

use crate::{AccessError, FromValue, IntoValue, Member, Modifiers, TypeHash, Value};

type Getter = Arc<dyn Fn(&dyn Any) -> Result<Value, AccessError> + Send + Sync>;
type Setter = Arc<dyn Fn(&mut dyn Any, Value) -> Result<(), AccessError> + Send + Sync>;

/// A declared field of a registered type.
///
/// Carries the field's metadata (name, value type, modifiers) together with
/// type-erased read/write thunks closing over the concrete projection. A
/// field registered without a setter is structurally read-only; modifier
/// flags never gate writes (see [`Modifiers::FINAL`]).
#[derive(Clone)]
pub struct FieldDef {
    name: String,
    value_type: TypeHash,
    value_type_name: &'static str,
    modifiers: Modifiers,
    getter: Getter,
    setter: Option<Setter>,
}

impl FieldDef {
    /// Register a readable and writable field of a convertible value type.
    ///
    /// # Examples
    ///
    /// ```
    /// use specula_core::{FieldDef, Modifiers};
    ///
    /// struct Player { health: i64 }
    ///
    /// let health = FieldDef::accessor::<Player, i64>(
    ///     "health",
    ///     Modifiers::PUBLIC,
    ///     |p| p.health,
    ///     |p, v| p.health = v,
    /// );
    /// assert_eq!(health.name(), "health");
    /// ```
    pub fn accessor<O, T>(
        name: impl Into<String>,
        modifiers: Modifiers,
        get: impl Fn(&O) -> T + Send + Sync + 'static,
        set: impl Fn(&mut O, T) + Send + Sync + 'static,
    ) -> Self
    where
        O: Any,
        T: IntoValue + FromValue + 'static,
    {
        let getter: Getter = Arc::new(move |obj| {
            let obj = downcast_receiver::<O>(obj)?;
            Ok(get(obj).into_value())
        });
        let setter: Setter = Arc::new(move |obj, value| {
            let obj = downcast_receiver_mut::<O>(obj)?;
            set(obj, convert_value::<T>(value)?);
            Ok(())
        });
        Self {
            name: name.into(),
            value_type: TypeHash::of::<T>(),
            value_type_name: std::any::type_name::<T>(),
            modifiers,
            getter,
            setter: Some(setter),
        }
    }

    /// Register a field with no setter. Writes fail with
    /// [`AccessError::NoSetter`].
    pub fn read_only<O, T>(
        name: impl Into<String>,
        modifiers: Modifiers,
        get: impl Fn(&O) -> T + Send + Sync + 'static,
    ) -> Self
    where
        O: Any,
        T: IntoValue + 'static,
    {
        let getter: Getter = Arc::new(move |obj| {
            let obj = downcast_receiver::<O>(obj)?;
            Ok(get(obj).into_value())
        });
        Self {
            name: name.into(),
            value_type: TypeHash::of::<T>(),
            value_type_name: std::any::type_name::<T>(),
            modifiers,
            getter,
            setter: None,
        }
    }

    /// Register a field whose value travels boxed (object-typed fields).
    ///
    /// The getter clones the projected value into the box; the setter moves
    /// the boxed value into place.
    pub fn boxed<O, T>(
        name: impl Into<String>,
        modifiers: Modifiers,
        get: impl Fn(&O) -> T + Send + Sync + 'static,
        set: impl Fn(&mut O, T) + Send + Sync + 'static,
    ) -> Self
    where
        O: Any,
        T: Any + Send + Sync,
    {
        let getter: Getter = Arc::new(move |obj| {
            let obj = downcast_receiver::<O>(obj)?;
            Ok(Value::boxed(get(obj)))
        });
        let setter: Setter = Arc::new(move |obj, value| {
            let obj = downcast_receiver_mut::<O>(obj)?;
            let found = value.type_label();
            let Value::Boxed(boxed) = value else {
                return Err(mismatch::<T>(found));
            };
            match boxed.downcast::<T>() {
                Ok(v) => {
                    set(obj, v);
                    Ok(())
                }
                Err(b) => Err(mismatch::<T>(b.type_name())),
            }
        });
        Self {
            name: name.into(),
            value_type: TypeHash::of::<T>(),
            value_type_name: std::any::type_name::<T>(),
            modifiers,
            getter,
            setter: Some(setter),
        }
    }

    /// Read the field from a type-erased instance.
    pub fn read(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        (self.getter)(instance)
    }

    /// Write a value into the field on a type-erased instance.
    ///
    /// Writes proceed regardless of [`Modifiers::FINAL`]; only a field
    /// registered without a setter refuses.
    pub fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        match &self.setter {
            Some(setter) => setter(instance, value),
            None => Err(AccessError::NoSetter {
                field: self.name.clone(),
            }),
        }
    }

    /// Check if a setter was registered.
    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's declared value type.
    pub fn value_type(&self) -> TypeHash {
        self.value_type
    }

    /// The field's declared value type name.
    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    /// The field's modifier flags.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl Member for FieldDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn value_type(&self) -> TypeHash {
        self.value_type
    }
}

impl std::fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("value_type", &self.value_type_name)
            .field("modifiers", &self.modifiers)
            .field("writable", &self.setter.is_some())
            .finish()
    }
}

pub(crate) fn downcast_receiver<O: Any>(obj: &dyn Any) -> Result<&O, AccessError> {
    obj.downcast_ref::<O>().ok_or(AccessError::ReceiverMismatch {
        expected: std::any::type_name::<O>(),
    })
}

pub(crate) fn downcast_receiver_mut<O: Any>(obj: &mut dyn Any) -> Result<&mut O, AccessError> {
    obj.downcast_mut::<O>().ok_or(AccessError::ReceiverMismatch {
        expected: std::any::type_name::<O>(),
    })
}

pub(crate) fn convert_value<T: FromValue + 'static>(value: Value) -> Result<T, AccessError> {
    let found = value.type_label();
    T::from_value(value).ok_or_else(|| mismatch::<T>(found))
}

pub(crate) fn mismatch<T: 'static>(found: &str) -> AccessError {
    AccessError::ValueMismatch {
        expected: std::any::type_name::<T>(),
        found: found.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Player {
        health: i64,
        name: String,
    }

    fn health_field() -> FieldDef {
        FieldDef::accessor::<Player, i64>(
            "health",
            Modifiers::PUBLIC,
            |p| p.health,
            |p, v| p.health = v,
        )
    }

    #[test]
    fn read_and_write() {
        let field = health_field();
        let mut player = Player {
            health: 20,
            name: "steve".into(),
        };

        let value = field.read(&player).unwrap();
        assert!(matches!(value, Value::Int(20)));

        field.write(&mut player, Value::Int(5)).unwrap();
        assert_eq!(player.health, 5);
        assert_eq!(player.name, "steve");
    }

    #[test]
    fn wrong_receiver_is_reported() {
        let field = health_field();
        let not_a_player = 3i32;
        let err = field.read(&not_a_player).unwrap_err();
        assert!(matches!(err, AccessError::ReceiverMismatch { .. }));
    }

    #[test]
    fn wrong_value_type_is_reported() {
        let field = health_field();
        let mut player = Player {
            health: 0,
            name: String::new(),
        };
        let err = field.write(&mut player, Value::Str("full".into())).unwrap_err();
        assert!(matches!(err, AccessError::ValueMismatch { .. }));
    }

    #[test]
    fn read_only_field_refuses_writes() {
        let field = FieldDef::read_only::<Player, String>("name", Modifiers::PUBLIC, |p| {
            p.name.clone()
        });
        let mut player = Player {
            health: 0,
            name: "alex".into(),
        };
        assert!(matches!(
            field.write(&mut player, Value::Str("x".into())),
            Err(AccessError::NoSetter { .. })
        ));
    }

    #[test]
    fn boxed_field_round_trip() {
        #[derive(Clone, Debug, PartialEq)]
        struct Pos(f64, f64);
        struct Holder {
            pos: Pos,
        }

        let field = FieldDef::boxed::<Holder, Pos>(
            "pos",
            Modifiers::PUBLIC,
            |h| h.pos.clone(),
            |h, v| h.pos = v,
        );
        let mut holder = Holder { pos: Pos(0.0, 0.0) };

        field.write(&mut holder, Value::boxed(Pos(3.0, 4.0))).unwrap();
        assert_eq!(holder.pos, Pos(3.0, 4.0));
        assert_eq!(field.value_type(), TypeHash::of::<Pos>());
    }
}
