//! Provider adapters: concrete implementations of the `ModelInvoker`
//! port, one per provider protocol, plus the routing layer that picks
//! the right one per model profile.

pub mod http;
pub mod local;
pub mod routing;

pub use http::OpenAiCompatInvoker;
pub use local::OllamaInvoker;
pub use routing::RoutingInvoker;
