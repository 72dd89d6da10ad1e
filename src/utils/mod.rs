pub mod http_client;
pub mod request_key;

pub use request_key::derive_request_key;
