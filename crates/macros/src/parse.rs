//! Attribute parsing for the PropertyKeys derive macro

use darling::{FromDeriveInput, FromVariant};
use syn::{DeriveInput, Ident};

/// Parsed #[keys(...)] attributes on the enum
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(keys), supports(enum_unit))]
pub struct PropertyKeysArgs {
    /// Enum identifier
    pub ident: Ident,

    /// Enum variants
    pub data: darling::ast::Data<KeyVariantArgs, ()>,

    /// First prime-table entry to try
    #[darling(default)]
    pub table_start: u32,

    /// Minimum number of characters to hash
    #[darling(default)]
    pub hash_chars: u32,
}

/// Parsed #[key(...)] attributes on a variant
#[derive(Debug, FromVariant)]
#[darling(attributes(key))]
pub struct KeyVariantArgs {
    /// Variant identifier
    pub ident: Ident,

    /// Script-facing property name (e.g., "contentBounds")
    pub name: String,

    /// Still resolves, but hidden from enumeration
    #[darling(default)]
    pub deprecated: bool,
}

/// Parse a DeriveInput into PropertyKeysArgs
pub fn parse_property_keys(input: &DeriveInput) -> darling::Result<PropertyKeysArgs> {
    PropertyKeysArgs::from_derive_input(input)
}
