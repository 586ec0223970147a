//! Menu Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Menu, MenuCreate, MenuUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu";

#[derive(Clone)]
pub struct MenuRepository {
    base: BaseRepository,
}

impl MenuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active menus ordered by sort_order
    pub async fn find_all(&self) -> RepoResult<Vec<Menu>> {
        let menus: Vec<Menu> = self
            .base
            .db()
            .query("SELECT * FROM menu WHERE is_active = true ORDER BY sort_order")
            .await?
            .take(0)?;
        Ok(menus)
    }

    /// Find menu by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Menu>> {
        let thing = parse_record_id(id)?;
        let menu: Option<Menu> = self.base.db().select(thing).await?;
        Ok(menu)
    }

    /// Find menu by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Menu>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let menus: Vec<Menu> = result.take(0)?;
        Ok(menus.into_iter().next())
    }

    /// Create a new menu
    pub async fn create(&self, data: MenuCreate) -> RepoResult<Menu> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Menu '{}' already exists",
                data.name
            )));
        }

        let menu = Menu {
            id: None,
            name: data.name,
            description: data.description,
            sort_order: data.sort_order.unwrap_or(0),
            is_active: true,
        };

        let created: Option<Menu> = self.base.db().create(TABLE).content(menu).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu".to_string()))
    }

    /// Update a menu
    pub async fn update(&self, id: &str, data: MenuUpdate) -> RepoResult<Menu> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", id)))?;

        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Menu '{}' already exists",
                new_name
            )));
        }

        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", id)))
    }

    /// Delete a menu (items keep existing, their menu reference is cleared)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;

        self.base
            .db()
            .query("UPDATE food_item SET menu = NONE WHERE menu = $menu")
            .bind(("menu", thing.clone()))
            .await?;

        self.base
            .db()
            .query("DELETE order_timeframe WHERE applicable_id = $menu")
            .bind(("menu", thing.clone()))
            .await?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;

        Ok(true)
    }
}
