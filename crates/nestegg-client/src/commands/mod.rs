pub mod common;
pub mod opportunities;
pub mod vault;
pub mod withdrawal;
