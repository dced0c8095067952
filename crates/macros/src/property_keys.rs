//! PropertyKeys derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::parse::{parse_property_keys, KeyVariantArgs};

/// Seed values, one per table start (compile-time copy of the runtime table)
const PRIMES: [u32; 34] = [
    17, 5381, 27541, 29191, 29611, 31321, 34429, 36739, 40099, 40591, 42589, 46691, 50821, 54251,
    56897, 57793, 65213, 65599, 68111, 72073, 76147, 84631, 89041, 93563, 28813, 37633, 43201,
    47629, 60493, 63949, 65713, 69313, 73009, 76801,
];

/// Largest table the runtime slot array may hold
const MAX_TABLE_SIZE: u32 = 255;

/// Byte at `index`, treating the end of the key as a NUL terminator
fn byte_at(key: &[u8], index: usize) -> u8 {
    key.get(index).copied().unwrap_or(0)
}

/// Same function as the runtime `key_hash`
fn key_hash(key: &[u8], hash_chars: u32, table_start: u32, first_char: u32) -> u32 {
    let mut hash = PRIMES[table_start as usize];
    let mut index = 0usize;

    for _ in 0..first_char {
        if byte_at(key, index) == 0 {
            index = 0;
        }
        index += 1;
    }

    for _ in 0..hash_chars {
        if byte_at(key, index) == 0 {
            index = 0;
        }
        let c = byte_at(key, index) as u32;
        hash = (hash ^ c).wrapping_add((hash << 26).wrapping_add(hash >> 6));
        index += 1;
    }

    hash
}

/// Longest prefix shared by any two keys
fn min_prefix_length(keys: &[&[u8]]) -> u32 {
    let mut prefix = 0;
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            let shared = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count() as u32;
            prefix = prefix.max(shared);
        }
    }
    prefix
}

/// A collision-free parameter set
struct Solution {
    table_start: u32,
    hash_chars: u32,
    first_char: u32,
    slots: Vec<i16>,
}

/// Search for collision-free parameters, starting from the hints
fn solve(keys: &[&[u8]], start_hint: u32, chars_hint: u32) -> Option<Solution> {
    if keys.len() == 1 {
        return Some(Solution {
            table_start: 0,
            hash_chars: 1,
            first_char: 0,
            slots: vec![0],
        });
    }

    let first_char = min_prefix_length(keys);
    let max_len = keys.iter().map(|k| k.len() as u32).max().unwrap_or(0);
    let key_count = keys.len() as u32;
    let start_hint = start_hint.min(PRIMES.len() as u32 - 1);

    for hash_chars in chars_hint.max(1)..=max_len {
        let mut table_size = key_count + 7;
        while table_size < MAX_TABLE_SIZE {
            for table_start in start_hint..PRIMES.len() as u32 {
                let hashes: Vec<u32> = keys
                    .iter()
                    .map(|k| key_hash(k, hash_chars, table_start, first_char) % table_size)
                    .collect();

                let collides = hashes
                    .iter()
                    .enumerate()
                    .any(|(i, h)| hashes[i + 1..].contains(h));
                if collides {
                    continue;
                }

                let mut slots = vec![-1i16; table_size as usize];
                for (i, h) in hashes.iter().enumerate() {
                    slots[*h as usize] = i as i16;
                }
                return Some(Solution {
                    table_start,
                    hash_chars,
                    first_char,
                    slots,
                });
            }
            table_size += 11;
        }
    }

    None
}

/// Generate the PropertyKeys implementation
pub fn derive_property_keys(input: DeriveInput) -> TokenStream {
    match parse_property_keys(&input) {
        Ok(args) => generate_impl(args),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: crate::parse::PropertyKeysArgs) -> TokenStream {
    let enum_name = &args.ident;

    let variants: Vec<KeyVariantArgs> = match args.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(enum_name, "PropertyKeys can only be derived for enums")
                .to_compile_error()
        }
    };

    if variants.is_empty() {
        return syn::Error::new_spanned(enum_name, "PropertyKeys needs at least one key")
            .to_compile_error();
    }

    // Duplicate names would make every later lookup ambiguous
    for (i, v) in variants.iter().enumerate() {
        if let Some(dup) = variants[i + 1..].iter().find(|o| o.name == v.name) {
            return syn::Error::new_spanned(
                &dup.ident,
                format!("property name `{}` is declared twice", v.name),
            )
            .to_compile_error();
        }
    }

    let names: Vec<&[u8]> = variants.iter().map(|v| v.name.as_bytes()).collect();
    let Some(solution) = solve(&names, args.table_start, args.hash_chars) else {
        return syn::Error::new_spanned(
            enum_name,
            "no collision-free hash table found for these property names",
        )
        .to_compile_error();
    };

    let key_entries = variants.iter().map(|v| {
        let name = &v.name;
        let deprecated = v.deprecated;
        quote! {
            ::stagehook_core::proxy::hash::PropertyKey { name: #name, deprecated: #deprecated }
        }
    });

    let from_arms = variants.iter().enumerate().map(|(i, v)| {
        let ident = &v.ident;
        quote! { #i => ::core::option::Option::Some(Self::#ident), }
    });

    let index_arms = variants.iter().enumerate().map(|(i, v)| {
        let ident = &v.ident;
        quote! { Self::#ident => #i, }
    });

    let table_start = solution.table_start;
    let hash_chars = solution.hash_chars;
    let first_char = solution.first_char;
    let slots = &solution.slots;

    quote! {
        impl ::stagehook_core::proxy::hash::PropertyKeys for #enum_name {
            const TABLE: ::stagehook_core::proxy::hash::PerfectHash =
                ::stagehook_core::proxy::hash::PerfectHash {
                    keys: &[#(#key_entries),*],
                    table_start: #table_start,
                    hash_chars: #hash_chars,
                    first_char: #first_char,
                    slots: &[#(#slots),*],
                };

            fn from_index(index: usize) -> ::core::option::Option<Self> {
                match index {
                    #(#from_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn index(self) -> usize {
                match self {
                    #(#index_arms)*
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_length() {
        let keys: Vec<&[u8]> = vec![b"maskX", b"maskY", b"x"];
        assert_eq!(min_prefix_length(&keys), 4);
    }

    #[test]
    fn test_single_key_table() {
        let keys: Vec<&[u8]> = vec![b"setFocus"];
        let solution = solve(&keys, 0, 0).unwrap();
        assert_eq!(solution.slots, vec![0]);
    }

    #[test]
    fn test_solution_is_collision_free() {
        let keys: Vec<&[u8]> = vec![b"insert", b"remove", b"numChildren", b"anchorChildren"];
        let solution = solve(&keys, 0, 0).unwrap();
        let size = solution.slots.len() as u32;
        for (i, key) in keys.iter().enumerate() {
            let h = key_hash(key, solution.hash_chars, solution.table_start, solution.first_char);
            assert_eq!(solution.slots[(h % size) as usize], i as i16);
        }
    }
}
