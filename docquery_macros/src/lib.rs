mod model;

use proc_macro::TokenStream;

/// Derive macro implementing `docquery::Model` for a serde struct.
///
/// The struct must implement `Serialize` and `Deserialize`. Records are
/// decoded from and merged onto the struct's serde representation.
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Model)]
/// #[model(collection = "Widget")]
/// struct Widget {
///     #[model(id)]
///     #[serde(default, skip_serializing)]
///     id: Option<String>,
///     name: String,
/// }
/// ```
///
/// Attributes:
/// - `#[model(collection = "...")]` sets the backend collection name.
///   If omitted, defaults to the struct name as written.
/// - `#[model(id)]` marks an `Option<String>` field that mirrors the record's
///   backend id. It is filled in on read and written as the record id on save.
///   Its serialized key is dropped from the field map, honoring the field's
///   `#[serde(rename)]` and the struct's `#[serde(rename_all)]`.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
