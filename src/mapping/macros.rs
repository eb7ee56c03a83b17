/// Implement [`Record`](crate::mapping::Record) for a struct with named fields.
///
/// List the fields in declaration order; `=> "alias"` binds a field to a differently
/// named column. The struct must implement `Default` and `Clone`, and every listed
/// field's type must implement [`FromRowValue`](crate::mapping::FromRowValue).
///
/// ```rust
/// use sql_rowmap::impl_record;
///
/// #[derive(Debug, Default, Clone)]
/// struct User {
///     id: i64,
///     name: String,
///     email: Option<String>,
/// }
///
/// impl_record!(User {
///     id,
///     name => "user_name",
///     email,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ident { $($field:ident $(=> $alias:literal)?),* $(,)? }) => {
        impl $crate::mapping::Record for $ty {
            fn descriptor() -> &'static $crate::mapping::RecordDescriptor {
                static DESCRIPTOR: ::std::sync::LazyLock<$crate::mapping::RecordDescriptor> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::mapping::RecordDescriptor::new(
                            stringify!($ty),
                            &[$((stringify!($field), $crate::impl_record!(@alias $($alias)?))),*],
                        )
                    });
                &DESCRIPTOR
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn write_field(
                &mut self,
                ordinal: usize,
                value: $crate::RowValues,
            ) -> ::std::result::Result<(), ::std::string::String> {
                let mut slot = 0usize;
                $(
                    if ordinal == slot {
                        self.$field = $crate::mapping::FromRowValue::from_row_value(value)?;
                        return Ok(());
                    }
                    slot += 1;
                )*
                Err(format!("{} has no field at position {}", stringify!($ty), ordinal))
            }
        }
    };
    (@alias) => {
        None
    };
    (@alias $alias:literal) => {
        Some($alias)
    };
}
