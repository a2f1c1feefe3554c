//! Record metadata: the capability interface a type implements to become
//! scannable.
//!
//! There is no runtime reflection here. A record type declares an ordered
//! list of column bindings (column tag, optional tag namespaces, a read
//! accessor and a bind accessor) once, usually through the [`record!`]
//! macro. Everything else (descriptors, scanning, projection lists) is
//! derived from that list.

use rusqlite::types::Value;
use rusqlite::Row;

/// One field binding of a record type.
///
/// `read` writes result column `idx` of `row` into the field; `bind`
/// extracts the field as an owned SQL value for statement generation.
pub struct Column<T> {
    /// Column tag (the physical column name, or its alias in the default
    /// result set).
    pub name: &'static str,
    /// Tag namespaces this binding belongs to. A binding with no tags is
    /// only part of the full (empty-namespace) list.
    pub tags: &'static [&'static str],
    pub read: fn(&mut T, &Row<'_>, usize) -> rusqlite::Result<()>,
    pub bind: fn(&T) -> Value,
}

/// A composite type with declared column bindings.
///
/// `Default` supplies the fresh instance allocated per scanned row.
/// Implement via [`record!`] or by hand for unusual layouts.
pub trait Record: Default + Sized + 'static {
    /// Ordered column bindings. Order here is the positional scan order
    /// and the projection order of generated selects.
    fn columns() -> &'static [Column<Self>];
}

/// Bind helper used by [`record!`]: clone a field out as an owned SQL value.
pub fn to_sql_value<T>(field: &T) -> Value
where
    T: Clone + Into<Value>,
{
    field.clone().into()
}

/// Declare the column bindings of a record type.
///
/// ```
/// #[derive(Debug, Clone, Default)]
/// struct Customer {
///     uin: i64,
///     user_name: String,
/// }
///
/// rowbind::record! {
///     Customer {
///         uin => "uin" @ ["brief"],
///         user_name => "userName",
///     }
/// }
/// ```
///
/// Each line binds one field to one column tag; the optional `@ [..]` list
/// names the tag namespaces the binding also belongs to. Fields left out of
/// the declaration are never scanned into.
#[macro_export]
macro_rules! record {
    ($ty:ty { $( $field:ident => $col:literal $( @ [ $($tag:literal),* $(,)? ] )? ),+ $(,)? }) => {
        impl $crate::Record for $ty {
            fn columns() -> &'static [$crate::Column<Self>] {
                const COLUMNS: &[$crate::Column<$ty>] = &[
                    $(
                        $crate::Column {
                            name: $col,
                            tags: &[ $( $( $tag ),* )? ],
                            read: {
                                fn read(
                                    rec: &mut $ty,
                                    row: &$crate::rusqlite::Row<'_>,
                                    idx: usize,
                                ) -> $crate::rusqlite::Result<()> {
                                    rec.$field = row.get(idx)?;
                                    Ok(())
                                }
                                read
                            },
                            bind: {
                                fn bind(rec: &$ty) -> $crate::rusqlite::types::Value {
                                    $crate::record::to_sql_value(&rec.$field)
                                }
                                bind
                            },
                        }
                    ),+
                ];
                COLUMNS
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Probe {
        id: i64,
        label: String,
    }

    crate::record! {
        Probe {
            id => "id" @ ["key"],
            label => "label",
        }
    }

    #[test]
    fn declared_order_and_tags() {
        let cols = Probe::columns();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].name, "id");
        assert_eq!(cols[0].tags, ["key"]);
        assert_eq!(cols[1].name, "label");
        assert!(cols[1].tags.is_empty());
    }

    #[test]
    fn bind_accessor_extracts_field() {
        let probe = Probe {
            id: 42,
            label: "x".to_string(),
        };
        assert_eq!((Probe::columns()[0].bind)(&probe), Value::Integer(42));
        assert_eq!(
            (Probe::columns()[1].bind)(&probe),
            Value::Text("x".to_string())
        );
    }
}
