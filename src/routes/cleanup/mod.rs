mod duplicates;
mod routes;

pub use duplicates::*;
pub use routes::*;
