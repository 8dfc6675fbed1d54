mod cleanup;
mod health_check;

pub use cleanup::*;
pub use health_check::*;
