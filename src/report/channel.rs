//! Report publication boundary. The engine formats tables and hands them
//! over; where they end up (reddit, stdout, a file) is the channel's
//! business.

use tracing::info;

pub trait ReportChannel {
    fn publish(&self, title: &str, body: &str);
}

pub struct StdoutChannel;

impl ReportChannel for StdoutChannel {
    fn publish(&self, title: &str, body: &str) {
        info!("Publishing report: {title}");
        println!("# {title}\n\n{body}");
    }
}
