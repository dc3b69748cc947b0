//! Pluggable rewrite rules for method calls and member accesses.
//!
//! ## Architecture
//!
//! ```text
//! rebuilt call/member → TranslatorProvider → first matching translator → SQL node
//!                                          ↘ no match → caller keeps the generic node
//! ```
//!
//! Translators are consulted in list order and the first match wins.
//! [`TranslatorProvider::add_translators`] prepends, so rules registered by a
//! dialect are asked before the generic ones.

mod equals;
mod registry;
mod traits;

pub use equals::EqualsTranslator;
pub use registry::*;
pub use traits::*;
