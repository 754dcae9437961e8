//! Choices - enums and lists rendered as `(value, label)` pairs for forms.
//!
//! ```
//! use restkit::choices::{ChoiceEnum, Gender};
//! use restkit::i18n::Catalog;
//!
//! let catalog = Catalog::new().with("gender.female", "Žena");
//! assert_eq!(
//!     Gender::choices(&catalog, Some("gender"), &[]),
//!     vec![
//!         ("female".to_string(), "Žena".to_string()),
//!         ("male".to_string(), "gender.male".to_string()),
//!     ]
//! );
//! assert_eq!(Gender::from_value("male"), Some(Gender::Male));
//! ```

use std::fmt;

use crate::i18n::Catalog;
use restkit_macros::ChoiceEnum;

/// An enum whose variants are offered as choices.
///
/// Derive it with `#[derive(ChoiceEnum)]`.
pub trait ChoiceEnum: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// The stored value.
    fn value(&self) -> &'static str;

    /// The variant name.
    fn key(&self) -> &'static str;

    /// `(value, label)` pairs, skipping values listed in `exclude`. With a
    /// `prefix` the label is the translation of `prefix.value`, otherwise the
    /// value itself.
    fn choices(catalog: &Catalog, prefix: Option<&str>, exclude: &[&str]) -> Vec<(String, String)> {
        Self::VARIANTS
            .iter()
            .map(|variant| variant.value())
            .filter(|value| !exclude.contains(value))
            .map(|value| (value.to_string(), label(catalog, prefix, value)))
            .collect()
    }

    fn values() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.value()).collect()
    }

    fn has_value(value: &str) -> bool {
        Self::VARIANTS.iter().any(|v| v.value() == value)
    }

    fn has_key(key: &str) -> bool {
        Self::VARIANTS.iter().any(|v| v.key() == key)
    }

    fn from_value(value: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.value() == value)
    }
}

fn label(catalog: &Catalog, prefix: Option<&str>, value: &str) -> String {
    match prefix {
        Some(prefix) => catalog.translate(&format!("{}.{}", prefix, value)),
        None => value.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ChoiceEnum)]
pub enum Gender {
    Female,
    Male,
}

/// Yes/no choices labelled `general.yes` / `general.no`.
pub fn bool_choices(catalog: &Catalog) -> Vec<(bool, String)> {
    vec![
        (true, catalog.translate("general.yes")),
        (false, catalog.translate("general.no")),
    ]
}

/// `(item, label)` pairs for a list of values, labelled like
/// [`ChoiceEnum::choices`].
pub fn list_to_choices<T>(items: &[T], catalog: &Catalog, prefix: Option<&str>) -> Vec<(T, String)>
where
    T: Clone + fmt::Display,
{
    items
        .iter()
        .map(|item| (item.clone(), label(catalog, prefix, &item.to_string())))
        .collect()
}
