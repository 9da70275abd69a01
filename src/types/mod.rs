//! Type definitions

pub mod constraints;
pub mod schedule;
pub mod work_item;

pub use constraints::*;
pub use schedule::*;
pub use work_item::*;
