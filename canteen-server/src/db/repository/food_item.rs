//! Food Item Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{FoodItem, FoodItemCreate, FoodItemUpdate};
use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "food_item";

#[derive(Clone)]
pub struct FoodItemRepository {
    base: BaseRepository,
}

impl FoodItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active food items ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<FoodItem>> {
        let items: Vec<FoodItem> = self
            .base
            .db()
            .query("SELECT * FROM food_item WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find all active items of a category
    pub async fn find_by_category(&self, category_id: &str) -> RepoResult<Vec<FoodItem>> {
        let thing = parse_record_id(category_id)?;
        let items: Vec<FoodItem> = self
            .base
            .db()
            .query(
                "SELECT * FROM food_item WHERE category = $cat AND is_active = true ORDER BY name",
            )
            .bind(("cat", thing))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find food item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<FoodItem>> {
        let thing = parse_record_id(id)?;
        let item: Option<FoodItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// Create a new food item
    pub async fn create(&self, data: FoodItemCreate) -> RepoResult<FoodItem> {
        let category = parse_record_id(&data.category)?;

        // Parent category must exist
        let parent: Option<crate::db::models::Category> =
            self.base.db().select(category.clone()).await?;
        if parent.is_none() {
            return Err(RepoError::NotFound(format!(
                "Category {} not found",
                data.category
            )));
        }

        let menu = match data.menu.as_deref() {
            Some(id) => Some(parse_record_id(id)?),
            None => None,
        };

        let item = FoodItem {
            id: None,
            name: data.name,
            description: data.description,
            price: data.price,
            category,
            menu,
            is_available: data.is_available.unwrap_or(true),
            is_active: true,
        };

        let created: Option<FoodItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create food item".to_string()))
    }

    /// Update a food item
    pub async fn update(&self, id: &str, data: FoodItemUpdate) -> RepoResult<FoodItem> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Food item {} not found", id)))?;

        let category = match data.category.as_deref() {
            Some(cat_id) => Some(parse_record_id(cat_id)?),
            None => None,
        };
        let menu = match data.menu.as_deref() {
            Some(menu_id) => Some(parse_record_id(menu_id)?),
            None => None,
        };

        #[derive(Serialize)]
        struct FoodItemUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<rust_decimal::Decimal>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<RecordId>,
            #[serde(skip_serializing_if = "Option::is_none")]
            menu: Option<RecordId>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_available: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = FoodItemUpdateDb {
            name: data.name,
            description: data.description,
            price: data.price,
            category,
            menu,
            is_available: data.is_available,
            is_active: data.is_active,
        };

        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Food item {} not found", id)))
    }

    /// Soft-delete a food item (kept for order history)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Food item {} not found", id)))?;

        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET is_active = false, is_available = false")
            .bind(("thing", thing))
            .await?;

        Ok(true)
    }
}
