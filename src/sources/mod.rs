pub mod primary;
pub mod secondary;

pub use primary::FplApi;
pub use secondary::AnalyticsSite;
