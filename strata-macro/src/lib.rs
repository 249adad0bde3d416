//! Procedural macros for the strata histogram library.
//!
//! This crate provides the `#[metrics]` attribute macro and the `#[derive(Tags)]`
//! macro.
//!
//! ## Identifier Validation
//!
//! `#[metrics]` checks every histogram identifier (prefix included) against the
//! metric identifier grammar while expanding, so a malformed name is a compile
//! error instead of a startup failure:
//!
//! ```text
//! error: invalid metric identifier: invalid identifier "request latency"
//! ```
//!
//! Bucket expressions are ordinary Rust expressions and are only checked when
//! the generated `new()` runs.
//!
//! See the main `strata` crate documentation for usage examples.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod metrics_macro;
mod tags_derive;

#[proc_macro_derive(Tags)]
pub fn derive_tags(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    tags_derive::expand_tags_derive(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[proc_macro_attribute]
pub fn metrics(args: TokenStream, input: TokenStream) -> TokenStream {
    metrics_macro::expand_metrics_macro(args.into(), input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
