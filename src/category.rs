//! Abstract categorical structure shared by the concrete representations in this crate.
mod traits;
pub use traits::*;
