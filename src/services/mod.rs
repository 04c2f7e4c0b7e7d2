pub mod fetcher;
pub mod poller;

pub use fetcher::*;
pub use poller::*;
