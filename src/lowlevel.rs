//! Building blocks for custom pipelines.
//!
//! Most users should go through `TemplateStore`, `Matcher` and `Pipeline`;
//! these re-exports expose the raw scans for callers that manage their own
//! template slices.

pub use crate::kernel::scalar::nearest_scalar;
#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::nearest_par;
