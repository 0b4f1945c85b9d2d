pub mod converter;
pub mod session_registry;
pub mod sql_service;
pub mod transport;

pub use converter::*;
pub use session_registry::*;
pub use sql_service::*;
pub use transport::{HttpResponse, ReqwestTransport, VvpTransport};
