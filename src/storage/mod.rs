pub mod cache;

pub use cache::UrlCache;
