/// Business logic layer
///
/// Services own validation and transaction boundaries; handlers stay thin.
pub mod accounts;
pub mod categories;
pub mod posts;
pub mod publisher;

pub use accounts::AccountService;
pub use categories::CategoryService;
pub use posts::PostService;
pub use publisher::{scheduled_overview, sweep_due_posts, ScheduledOverview, SweepReport};
