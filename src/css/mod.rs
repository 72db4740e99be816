//! CSS processing.
//!
//! - `flatten`: nested CSS to flat CSS (lightningcss)
//! - `error`: `MalformedStylesheetError`

mod error;
mod flatten;

pub use error::{MalformedStylesheetError, SourcePos};
pub use flatten::{Flattener, flatten};
