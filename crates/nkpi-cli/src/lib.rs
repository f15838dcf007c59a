//! Library side of the `nkpi` binary.

pub mod input;
pub mod logging;
pub mod output;
