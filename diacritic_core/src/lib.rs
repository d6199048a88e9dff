//! `diacritic_core` builds diacritic-aware regular expressions and fills
//! text placeholders with values from a diacritic record store.
//!
//! ## Pipeline
//!
//! ```text
//! Text
//!   → Regex synthesizer (one fragment per user-perceived character, using the
//!     raw equivalents of every diacritic)
//!   → Placeholder resolver (template match → `filter=code;path` → path schema
//!     validation → store query → path walk → substitution)
//!   → DiacriticStore (read-only lookups, optionally memoized by CachedStore)
//! ```
//!
//! ## Modules
//!
//! - [`store`]: The store contract, the JSON-backed [`MemoryStore`] and the
//!   write-once [`CachedStore`].
//! - [`schema`]: The static table of path nodes.
//! - [`path`]: Validation of dotted, bracket-selected path expressions.
//! - [`placeholder`]: Extraction, resolution and substitution of
//!   placeholders.
//! - [`regexp`]: Regular expression synthesis.
//! - [`transliterate`]: Replacing diacritics with their base or decomposed
//!   mapping.
//! - [`config`]: Loading defaults from `diacritic.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use diacritic_core::MemoryStore;
//! use diacritic_core::PlaceholderOptions;
//! use diacritic_core::RegexOptions;
//! use diacritic_core::create_regexp;
//! use diacritic_core::replace_placeholder;
//! use std::path::Path;
//!
//! let store = MemoryStore::load(Path::new("diacritics.json")).unwrap();
//!
//! let pattern = create_regexp("Tést", &store, &RegexOptions::default()).unwrap();
//! assert!(pattern.is_match("Te\u{301}st"));
//!
//! let text = replace_placeholder(
//! 	"u = <% diacritics: base=u;equivalents.raw %>",
//! 	&store,
//! 	&PlaceholderOptions::default(),
//! )
//! .unwrap();
//! println!("{text}");
//! ```

pub use config::*;
pub use error::*;
pub use path::*;
pub use placeholder::*;
pub use record::*;
pub use regexp::*;
pub use schema::*;
pub use store::*;
pub use transliterate::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod path;
pub mod placeholder;
mod record;
pub mod regexp;
pub mod schema;
pub mod store;
pub mod text;
pub mod transliterate;

#[cfg(test)]
mod __fixtures;
