mod asn;
mod check;
mod registry;
mod summary;

pub use asn::*;
pub use check::*;
pub use registry::*;
pub use summary::*;
