//! Commonly used utilities like handles and pools.

#[macro_use]
pub mod handle;
pub mod pool;

pub use self::handle::{Handle, HandleIndex, HandleLike};
pub use self::pool::ObjectPool;
