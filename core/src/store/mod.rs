pub mod http;
pub mod traits;

pub use http::HttpTaskStore;
pub use traits::RemoteTaskStore;
