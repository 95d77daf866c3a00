//! Row field model.
//!
//! Every editable table holds rows of one concrete struct. Tables address
//! fields by their wire name (the camelCase JSON key, e.g. `viewRule`) so a
//! generic `update_field` can work across all row types while each row keeps
//! compile-checked fields. Implementations are normally generated with
//! [`row_fields!`](crate::row_fields).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TableError;

/// The primitive shapes a row field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Bool,
    Int,
    Str,
    List,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "bool",
            Self::Int => "integer",
            Self::Str => "string",
            Self::List => "list",
        };
        f.write_str(label)
    }
}

/// A single field value read from or written into a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Int(_) => FieldKind::Int,
            Self::Str(_) => FieldKind::Str,
            Self::List(_) => FieldKind::List,
        }
    }

    /// Parses user-entered text into a value of `kind`.
    ///
    /// Lists are comma separated; blank entries are dropped.
    pub fn parse_as(kind: FieldKind, input: &str) -> Result<Self, TableError> {
        let trimmed = input.trim();
        match kind {
            FieldKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(Self::Bool(true)),
                "false" | "off" | "no" | "0" => Ok(Self::Bool(false)),
                _ => Err(TableError::parse_value(kind, input)),
            },
            FieldKind::Int => trimmed
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|_parse| TableError::parse_value(kind, input)),
            FieldKind::Str => Ok(Self::Str(input.to_owned())),
            FieldKind::List => Ok(Self::List(
                trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_owned)
                    .collect(),
            )),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
            Self::List(values) => f.write_str(&values.join(", ")),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// A record held by an editable table.
pub trait Row: Clone {
    /// Wire names and kinds of every addressable field, in display order.
    fn fields() -> &'static [(&'static str, FieldKind)];

    /// The logical key of the row (usually its `name`).
    fn name(&self) -> &str;

    fn get_field(&self, key: &str) -> Option<FieldValue>;

    /// Writes a field without running [`Row::field_changed`].
    fn assign_field(&mut self, key: &str, value: FieldValue) -> Result<(), TableError>;

    /// Runs after a field was assigned through [`Row::set_field`].
    ///
    /// Rows whose fields are coupled (one switch forcing another) override this.
    fn field_changed(&mut self, _key: &str) {}

    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), TableError> {
        self.assign_field(key, value)?;
        self.field_changed(key);
        Ok(())
    }

    fn field_kind(key: &str) -> Option<FieldKind> {
        Self::fields()
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, kind)| *kind)
    }

    /// Parses text typed for `key` into a value of that field's kind.
    fn parse_field(key: &str, input: &str) -> Result<FieldValue, TableError> {
        let kind = Self::field_kind(key).ok_or_else(|| TableError::unknown_field(key))?;
        FieldValue::parse_as(kind, input)
    }
}

/// Implements [`Row`] for a struct from a table of `"wireName" => field: Kind`.
///
/// `Kind` is one of `Bool` (`bool`), `Int` (`i64`), `Str` (`String`) or
/// `List` (`Vec<String>`). An optional `changed = path` names a
/// `fn(&mut Self, &str)` used as [`Row::field_changed`].
///
/// ```ignore
/// row_fields!(MfaItem, key = name, {
///     "name" => name: Str,
///     "rule" => rule: Str,
/// });
/// ```
#[macro_export]
macro_rules! row_fields {
    ($ty:ty, key = $key:ident, { $($wire:literal => $field:ident : $kind:ident),+ $(,)? }) => {
        $crate::row_fields!(@impl $ty, $key, { $($wire => $field : $kind),+ }, {});
    };
    ($ty:ty, key = $key:ident, { $($wire:literal => $field:ident : $kind:ident),+ $(,)? }, changed = $hook:path) => {
        $crate::row_fields!(@impl $ty, $key, { $($wire => $field : $kind),+ }, {
            fn field_changed(&mut self, key: &str) {
                $hook(self, key);
            }
        });
    };
    (@impl $ty:ty, $key:ident, { $($wire:literal => $field:ident : $kind:ident),+ }, { $($extra:tt)* }) => {
        impl $crate::Row for $ty {
            fn fields() -> &'static [(&'static str, $crate::FieldKind)] {
                &[$(($wire, $crate::FieldKind::$kind)),+]
            }

            fn name(&self) -> &str {
                &self.$key
            }

            fn get_field(&self, key: &str) -> Option<$crate::FieldValue> {
                match key {
                    $($wire => Some($crate::FieldValue::$kind(self.$field.clone())),)+
                    _ => None,
                }
            }

            fn assign_field(
                &mut self,
                key: &str,
                value: $crate::FieldValue,
            ) -> Result<(), $crate::TableError> {
                match key {
                    $($wire => match value {
                        $crate::FieldValue::$kind(inner) => {
                            self.$field = inner;
                            Ok(())
                        }
                        other => Err($crate::TableError::field_type(
                            key,
                            $crate::FieldKind::$kind,
                            other.kind(),
                        )),
                    },)+
                    _ => Err($crate::TableError::unknown_field(key)),
                }
            }

            $($extra)*
        }
    };
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub(crate) struct Item {
        pub name: String,
        pub visible: bool,
        pub required: bool,
        pub weight: i64,
        pub options: Vec<String>,
    }

    impl Item {
        pub(crate) fn named(name: &str) -> Self {
            Self {
                name: name.to_owned(),
                ..Self::default()
            }
        }

        fn follow_visible(&mut self, key: &str) {
            if key == "visible" {
                self.required = self.visible;
            }
        }
    }

    crate::row_fields!(Item, key = name, {
        "name" => name: Str,
        "visible" => visible: Bool,
        "required" => required: Bool,
        "weight" => weight: Int,
        "options" => options: List,
    }, changed = Item::follow_visible);

    #[test]
    fn test_get_and_set_field() {
        let mut item = Item::named("Email");
        item.set_field("weight", FieldValue::Int(3)).unwrap();
        item.set_field("options", vec!["a".to_owned()].into()).unwrap();

        assert_eq!(item.get_field("weight"), Some(FieldValue::Int(3)));
        assert_eq!(
            item.get_field("options"),
            Some(FieldValue::List(vec!["a".to_owned()]))
        );
        assert_eq!(item.get_field("missing"), None);
    }

    #[test]
    fn test_set_field_rejects_wrong_kind() {
        let mut item = Item::named("Email");
        let err = item.set_field("visible", "yes".into()).unwrap_err();
        assert_eq!(
            err,
            TableError::field_type("visible", FieldKind::Bool, FieldKind::Str)
        );
        assert!(!item.visible);
    }

    #[test]
    fn test_set_field_rejects_unknown_key() {
        let mut item = Item::named("Email");
        let err = item.set_field("colour", "red".into()).unwrap_err();
        assert_eq!(err, TableError::unknown_field("colour"));
    }

    #[test]
    fn test_changed_hook_runs_after_set_but_not_assign() {
        let mut item = Item::named("Email");
        item.set_field("visible", true.into()).unwrap();
        assert!(item.required);

        item.assign_field("visible", false.into()).unwrap();
        assert!(item.required);
    }

    #[test]
    fn test_field_kind_lookup() {
        assert_eq!(Item::field_kind("weight"), Some(FieldKind::Int));
        assert_eq!(Item::field_kind("nope"), None);
        assert_eq!(Item::fields().len(), 5);
    }

    #[test]
    fn test_parse_field_uses_field_kind() {
        assert_eq!(Item::parse_field("weight", "7"), Ok(FieldValue::Int(7)));
        assert_eq!(Item::parse_field("visible", "off"), Ok(FieldValue::Bool(false)));
        assert_eq!(
            Item::parse_field("colour", "red"),
            Err(TableError::unknown_field("colour"))
        );
    }

    #[test]
    fn test_parse_as() {
        assert_eq!(
            FieldValue::parse_as(FieldKind::Bool, " Yes "),
            Ok(FieldValue::Bool(true))
        );
        assert_eq!(
            FieldValue::parse_as(FieldKind::Int, "42"),
            Ok(FieldValue::Int(42))
        );
        assert_eq!(
            FieldValue::parse_as(FieldKind::List, "a, b,,c "),
            Ok(FieldValue::List(vec![
                "a".to_owned(),
                "b".to_owned(),
                "c".to_owned()
            ]))
        );
        assert_eq!(
            FieldValue::parse_as(FieldKind::Str, " keep spaces "),
            Ok(FieldValue::Str(" keep spaces ".to_owned()))
        );
        assert!(FieldValue::parse_as(FieldKind::Int, "four").is_err());
        assert!(FieldValue::parse_as(FieldKind::Bool, "maybe").is_err());
    }

    #[test]
    fn test_field_value_json_is_untagged() {
        let json = serde_json::to_string(&FieldValue::List(vec!["x".to_owned()])).unwrap();
        assert_eq!(json, r#"["x"]"#);
        let parsed: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, FieldValue::Bool(true));
    }
}
