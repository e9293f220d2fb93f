use crate::model::{CouponMeta, FetchError};

#[async_trait::async_trait]
pub trait CouponFetcher: Send + Sync {
    /// `Ok(None)` means the URL is outside the voucher domain and no request
    /// was made; `Err` means a request was attempted and failed.
    async fn fetch(&self, url: &str) -> Result<Option<CouponMeta>, FetchError>;
}
