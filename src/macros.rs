//! Declarative macros for reducing boilerplate in asset record definitions.
//!
//! The `zakat_asset!` macro generates the identity fields shared by every
//! asset record and the [`AssetRecord`](crate::traits::AssetRecord) impl.

/// Macro for generating asset record structs with common fields and methods.
///
/// This macro generates:
/// - The struct definition with the common fields (`id`, `name`, `notes`)
///   followed by the user-defined fields
/// - A `new(name)` constructor assigning a fresh UUID v4 id
/// - Standard setters: `with_id()`, `notes()`
/// - Implementation of [`AssetRecord`](crate::traits::AssetRecord) for the given category
///
/// # Usage
///
/// ```rust,ignore
/// zakat_asset! {
///     category = Cash;
///     /// Documentation for the struct
///     #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
///     #[serde(default, rename_all = "camelCase")]
///     pub struct MyAsset {
///         #[serde(with = "crate::wire::amount")]
///         pub amount: Decimal,
///     }
/// }
/// ```
///
/// The struct must implement `Default`. The valuation rule is still written by
/// hand in a [`ValuateAsset`](crate::traits::ValuateAsset) impl.
#[macro_export]
macro_rules! zakat_asset {
    (
        category = $category:ident;
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            // === Common Fields (auto-generated) ===
            /// Stable identifier, unique within a portfolio.
            #[serde(deserialize_with = "crate::wire::text")]
            pub id: String,
            /// Display name.
            #[serde(deserialize_with = "crate::wire::text")]
            pub name: String,
            /// Free-text notes.
            #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "crate::wire::or_default")]
            pub notes: Option<String>,
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $name {
            /// Creates a new record with a freshly generated id and default values.
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    id: $crate::assets::new_asset_id(),
                    name: name.into(),
                    ..Self::default()
                }
            }

            /// Overrides the generated identifier.
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.id = id.into();
                self
            }

            /// Attaches free-text notes.
            pub fn notes(mut self, notes: impl Into<String>) -> Self {
                self.notes = Some(notes.into());
                self
            }
        }

        impl $crate::traits::AssetRecord for $name {
            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn category(&self) -> $crate::types::AssetCategory {
                $crate::types::AssetCategory::$category
            }
        }
    };
}
