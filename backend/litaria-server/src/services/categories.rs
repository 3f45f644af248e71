/// Category and subcategory management
///
/// Uniqueness and reference-count guards live here; the storage layer backs
/// them up with unique indexes and RESTRICT foreign keys.
use crate::db::{category_repo, post_repo, subcategory_repo};
use crate::error::{AppError, Result};
use crate::models::{Category, CategoryWithCount, Subcategory, SubcategoryWithCount};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, language: &str) -> Result<Vec<CategoryWithCount>> {
        Ok(category_repo::list_by_language(&self.pool, language).await?)
    }

    pub async fn get(&self, category_id: Uuid) -> Result<CategoryWithCount> {
        category_repo::find_with_count(&self.pool, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The requested category does not exist".into()))
    }

    /// Create a category; (name, language) must be unique.
    pub async fn create(&self, name: &str, language: &str) -> Result<Category> {
        if category_repo::find_duplicate(&self.pool, name, language, None)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A category with this name already exists for this language".into(),
            ));
        }

        let category = category_repo::insert(&self.pool, name, language).await?;
        tracing::info!(category_id = %category.id, language = %language, "category created");
        Ok(category)
    }

    /// Rename a category; uniqueness is re-checked within its language.
    pub async fn rename(&self, category_id: Uuid, name: &str) -> Result<Category> {
        let existing = category_repo::find_by_id(&self.pool, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The requested category does not exist".into()))?;

        if category_repo::find_duplicate(&self.pool, name, &existing.language, Some(category_id))
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A category with this name already exists".into(),
            ));
        }

        Ok(category_repo::rename(&self.pool, category_id, name).await?)
    }

    /// Delete a category; rejected while posts still reference it.
    pub async fn delete(&self, category_id: Uuid) -> Result<()> {
        category_repo::find_by_id(&self.pool, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The requested category does not exist".into()))?;

        let attached = post_repo::count_by_category(&self.pool, category_id).await?;
        if attached > 0 {
            return Err(AppError::Conflict(
                "Cannot delete category that has posts assigned to it".into(),
            ));
        }

        category_repo::delete(&self.pool, category_id).await?;
        tracing::info!(category_id = %category_id, "category deleted");
        Ok(())
    }

    pub async fn list_subcategories(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<SubcategoryWithCount>> {
        category_repo::find_by_id(&self.pool, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The requested category does not exist".into()))?;

        Ok(subcategory_repo::list_by_category(&self.pool, category_id).await?)
    }

    /// Create a subcategory; (name, category) must be unique.
    pub async fn create_subcategory(&self, category_id: Uuid, name: &str) -> Result<Subcategory> {
        category_repo::find_by_id(&self.pool, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The specified category does not exist".into()))?;

        if subcategory_repo::find_duplicate(&self.pool, name, category_id, None)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A subcategory with this name already exists in this category".into(),
            ));
        }

        let subcategory = subcategory_repo::insert(&self.pool, name, category_id).await?;
        tracing::info!(subcategory_id = %subcategory.id, category_id = %category_id, "subcategory created");
        Ok(subcategory)
    }

    /// Rename a subcategory; uniqueness re-checked within its category.
    pub async fn rename_subcategory(&self, subcategory_id: Uuid, name: &str) -> Result<Subcategory> {
        let existing = subcategory_repo::find_by_id(&self.pool, subcategory_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("The requested subcategory does not exist".into())
            })?;

        if subcategory_repo::find_duplicate(
            &self.pool,
            name,
            existing.category_id,
            Some(subcategory_id),
        )
        .await?
        .is_some()
        {
            return Err(AppError::Conflict(
                "A subcategory with this name already exists in this category".into(),
            ));
        }

        Ok(subcategory_repo::rename(&self.pool, subcategory_id, name).await?)
    }

    /// Delete a subcategory; rejected while posts still reference it.
    pub async fn delete_subcategory(&self, subcategory_id: Uuid) -> Result<()> {
        subcategory_repo::find_by_id(&self.pool, subcategory_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("The requested subcategory does not exist".into())
            })?;

        let attached = post_repo::count_by_subcategory(&self.pool, subcategory_id).await?;
        if attached > 0 {
            return Err(AppError::Conflict(
                "Cannot delete subcategory that has posts assigned to it".into(),
            ));
        }

        subcategory_repo::delete(&self.pool, subcategory_id).await?;
        Ok(())
    }
}
