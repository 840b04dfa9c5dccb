//! Data models

pub mod packet;
pub mod response;
pub mod verdict;

pub use packet::*;
pub use response::*;
pub use verdict::*;
