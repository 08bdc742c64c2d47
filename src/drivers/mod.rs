//! Output stage and operator key drivers over `embedded-hal` traits.

pub mod key;
pub mod transformer;
