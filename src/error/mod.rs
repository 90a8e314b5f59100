mod fetch;
mod recount;

pub use fetch::FetchError;
pub use recount::RecountError;

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
