pub mod fm;
pub mod sa;
pub mod store;
pub mod tables;

pub use fm::{FmIndex, SENTINEL};
pub use store::StoreError;
