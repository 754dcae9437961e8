mod choice;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(ChoiceEnum)] derive macro
// ============================================================================

/// Derive macro for the `ChoiceEnum` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, ChoiceEnum)]
/// enum Status {
///     Active,
///     #[choice(value = "on-hold")]
///     OnHold,
/// }
/// ```
///
/// - Only fieldless variants are supported.
/// - `#[choice(value = "...")]` sets the stored value of a variant.
///   If omitted, defaults to the snake_case variant name.
/// - The key of a variant is its name.
#[proc_macro_derive(ChoiceEnum, attributes(choice))]
pub fn derive_choice_enum(input: TokenStream) -> TokenStream {
    choice::derive_choice_enum(input)
}
