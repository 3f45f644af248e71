/// Ownership checks for author-owned resources
use crate::error::{AppError, Result};
use crate::models::Post;
use uuid::Uuid;

/// Check if a user owns a post
pub fn check_post_ownership(user_id: Uuid, post: &Post) -> Result<()> {
    if post.author_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You don't have permission to modify this post".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostStatus;
    use chrono::Utc;

    fn post_owned_by(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "t".into(),
            content: "c".into(),
            language: "en".into(),
            image_url: None,
            video_url: None,
            is_lead: false,
            status: PostStatus::Published,
            scheduled_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author_id,
            category_id: Uuid::new_v4(),
            subcategory_id: None,
        }
    }

    #[test]
    fn owner_passes_stranger_fails() {
        let owner = Uuid::new_v4();
        let post = post_owned_by(owner);
        assert!(check_post_ownership(owner, &post).is_ok());
        assert!(matches!(
            check_post_ownership(Uuid::new_v4(), &post),
            Err(AppError::Forbidden(_))
        ));
    }
}
