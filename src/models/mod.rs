pub mod session;
pub mod sql;
pub mod validation;

pub use session::*;
pub use sql::*;
pub use validation::*;
