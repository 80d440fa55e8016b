pub mod channel;
pub mod prices;
pub mod table;

pub use channel::{ReportChannel, StdoutChannel};
