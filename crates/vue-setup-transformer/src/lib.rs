//! Vue Options-API to Composition-API rewriting.
//!
//! This crate rewrites a component script written with the Options API
//! (`export default { data, computed, methods, ... }`) or as a decorated
//! class (`@Component class Foo extends Vue`) into a `defineComponent` call
//! whose state and behavior live in `setup()`:
//! - `data` entries become `ref`s, getters become `computed`s
//! - methods become functions, watchers become `watch` calls
//! - lifecycle options become `onMounted`-style hook registrations
//! - `this.x` references are rewritten to `x.value`, `props.x` or `x`
//!
//! Everything outside the component definition is kept verbatim.
//!
//! # Example
//!
//! ```
//! use vue_setup_transformer::{transform_script, TransformOptions};
//!
//! let source = r#"
//! export default {
//!   data() {
//!     return { count: 0 }
//!   },
//!   methods: {
//!     inc() {
//!       this.count++
//!     },
//!   },
//! }
//! "#;
//!
//! let result = transform_script(source, &TransformOptions::default()).unwrap();
//! assert!(result.code.contains("const count = ref(0);"));
//! assert!(result.code.contains("count.value++"));
//! ```

mod assemble;
mod classify;
mod component;
mod convert;
mod emit;
mod error;
mod imports;
mod member;
mod printer;
mod rewrite;
mod script;
mod sfc;
mod statement;
mod transform;

pub use error::{TransformError, TransformErrorKind, TransformWarning, WarningKind};
pub use rewrite::REFS_MARKER;
pub use sfc::{transform_sfc, SfcTransformResult};
pub use statement::{ConvertedStatement, PackageTag, ReactivePrimitive};
pub use text_size::{TextRange, TextSize};
pub use transform::{transform_script, ScriptTransformResult, TransformOptions};
pub use vue_sfc_parser::ScriptLang;
