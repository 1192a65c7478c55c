//! Re-exports of `alloc` and `core` items used throughout the crate, so that
//! modules can `use crate::prelude::*` and stay `no_std`-compatible.

pub use alloc::borrow::ToOwned;
pub use alloc::format;
pub use alloc::boxed::Box;
pub use alloc::string::{String, ToString};
pub use alloc::vec;
pub use alloc::vec::Vec;
pub use core::prelude::v1::*;
