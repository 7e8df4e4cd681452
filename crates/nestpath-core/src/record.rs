//! Record and enumeration capabilities.
//!
//! Caller types opt into traversal by describing their fields explicitly
//! instead of relying on runtime reflection. The [`impl_record!`] and
//! [`impl_enumeration!`] macros generate the implementations together with
//! the `From<T> for Value` conversion.
//!
//! ```rust
//! use nestpath_core::{impl_enumeration, impl_record, Value};
//!
//! #[derive(Clone, Copy)]
//! enum FoodType { Wet, Dry }
//! impl_enumeration!(FoodType { Wet = 1, Dry = 2 });
//!
//! #[derive(Clone)]
//! struct BowlTarget { food_type: FoodType, full_weight: i64 }
//! impl_record!(BowlTarget { food_type, full_weight });
//!
//! let value = Value::from(BowlTarget { food_type: FoodType::Wet, full_weight: 0 });
//! assert_eq!(value.get("food_type").and_then(Value::enum_name), Some("Wet"));
//! ```

use crate::value::{EnumMember, Fields, Value};

/// A value with a fixed, named, ordered set of fields.
pub trait Record {
    /// Type name carried into [`Fields`]
    fn type_name(&self) -> &'static str;

    /// Field names in declaration order.
    fn field_names(&self) -> &'static [&'static str];

    /// Current value of a field, `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new(self.type_name());
        for name in self.field_names() {
            if let Some(value) = self.field(name) {
                fields.insert(*name, value);
            }
        }
        fields
    }

    fn to_value(&self) -> Value {
        Value::Record(self.to_fields())
    }
}

/// A member of a closed set of symbolic names.
pub trait Enumeration {
    fn type_name(&self) -> &'static str;

    fn variant_name(&self) -> &'static str;

    fn variant_value(&self) -> Option<Value> {
        None
    }

    fn to_member(&self) -> EnumMember {
        let member = EnumMember::new(self.type_name(), self.variant_name());
        match self.variant_value() {
            Some(value) => member.with_value(value),
            None => member,
        }
    }
}

/// Implement [`Record`] and `From<T> for Value` for a struct.
///
/// Every listed field must be `Clone` and convertible into [`Value`].
#[macro_export]
macro_rules! impl_record {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::record::Record for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn field_names(&self) -> &'static [&'static str] {
                &[$(stringify!($field)),*]
            }

            fn field(&self, name: &str) -> Option<$crate::value::Value> {
                match name {
                    $(stringify!($field) => Some($crate::value::Value::from(self.$field.clone())),)*
                    _ => None,
                }
            }
        }

        impl From<$ty> for $crate::value::Value {
            fn from(record: $ty) -> Self {
                $crate::record::Record::to_value(&record)
            }
        }

        impl From<&$ty> for $crate::value::Value {
            fn from(record: &$ty) -> Self {
                $crate::record::Record::to_value(record)
            }
        }
    };
}

/// Implement [`Enumeration`] and `From<T> for Value` for a fieldless enum.
///
/// Variants may carry an underlying value: `Color { Red = 1, Green = 2 }`.
#[macro_export]
macro_rules! impl_enumeration {
    ($ty:ident { $($variant:ident $(= $value:expr)?),* $(,)? }) => {
        impl $crate::record::Enumeration for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant),)*
                }
            }

            fn variant_value(&self) -> Option<$crate::value::Value> {
                match self {
                    $($ty::$variant => $crate::impl_enumeration!(@value $($value)?),)*
                }
            }
        }

        impl From<$ty> for $crate::value::Value {
            fn from(member: $ty) -> Self {
                $crate::value::Value::Enum($crate::record::Enumeration::to_member(&member))
            }
        }
    };
    (@value $value:expr) => {
        Some($crate::value::Value::from($value))
    };
    (@value) => {
        None
    };
}
