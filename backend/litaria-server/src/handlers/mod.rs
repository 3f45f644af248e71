/// HTTP handlers for litaria-server
///
/// Handlers stay thin: parse and validate the request, call a service,
/// shape the response. Business rules live in `services`.
pub mod auth;
pub mod categories;
pub mod health;
pub mod posts;
pub mod subcategories;
pub mod upload;

pub use auth::{login, register};
pub use categories::{
    create_category, create_subcategory, delete_category, get_category, list_categories,
    list_subcategories, rename_category,
};
pub use health::{health_summary, liveness_check, readiness_summary};
pub use posts::{
    clear_lead, create_post, delete_post, get_lead, get_post, list_posts, publish_scheduled,
    scheduled_status, search_posts, set_lead, update_post,
};
pub use subcategories::{delete_subcategory, rename_subcategory};
pub use upload::upload_image;
