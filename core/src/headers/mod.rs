//! headers/mod.rs
//! Fixed-width text header at the start of every `.rm` file.
//!
//! Layout (43 bytes, ASCII):
//!
//! ```text
//! reMarkable .lines file, version=6
//! ^ format text                   ^ digits  ^ space padding
//! ```

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
