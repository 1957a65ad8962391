pub mod http;

pub use http::HttpCrossEncoder;
