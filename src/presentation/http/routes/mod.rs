pub mod document_routes;
pub mod health_routes;
pub mod record_routes;
pub mod search_routes;
pub mod tool_routes;

pub use document_routes::*;
pub use health_routes::*;
pub use record_routes::*;
pub use search_routes::*;
pub use tool_routes::*;
