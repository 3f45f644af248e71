/// Background jobs
pub mod scheduled_publisher;

pub use scheduled_publisher::start_scheduled_publisher;
