pub mod fetcher;
pub mod traits;

pub use fetcher::HttpCouponFetcher;
pub use traits::CouponFetcher;
