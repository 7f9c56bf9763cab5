//! The badge data model: format discrimination, OB2 and OB3 views, and shared plumbing.

pub mod guards;
pub mod ob2;
pub mod ob3;
pub mod object;
pub mod util;
