mod model;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Model)] derive macro
// ============================================================================

/// Derive macro for the `Model` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Debug, Model)]
/// #[model(table = "PEOPLE")]
/// struct User {
///     id: Option<i64>,
///     name: Option<String>,
///     age: Option<i64>,
///     #[model(lifecycle)]
///     state: Lifecycle,
/// }
/// ```
///
/// - Every `Option<T>` field is an attribute, in declaration order.
/// - `#[model(id)]` marks the identifier attribute, which must be
///   `Option<i64>`. If omitted, defaults to a field named `id`.
/// - `#[model(lifecycle)]` marks the field holding the `Lifecycle`.
///   If omitted, defaults to a field named `lifecycle`.
/// - `#[model(table = "...")]` sets the table name.
///   If omitted, defaults to SCREAMING_SNAKE_CASE struct name + "S".
///
/// Besides the trait implementation, each attribute gets a getter
/// `fn name(&self) -> Option<T>` and a setter `fn set_name(&mut self, value)`,
/// and the struct gets a `Display` impl rendering `<User id: 1, name: "Alice">`.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
