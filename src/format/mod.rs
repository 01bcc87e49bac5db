//! Record formatters.
//!
//! - `markup` - inline `*bold*` / `_italic_` emphasis
//! - `console` - human-readable console lines
//! - `json` - one JSON object per line for files

pub mod console;
pub mod json;
pub mod markup;

pub use console::*;
pub use json::*;
pub use markup::*;
