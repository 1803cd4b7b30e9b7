//! Category management for one authenticated user.

use tally_core::entities::Category;

use crate::errors::{StoreError, StoreResult};
use crate::gateway::StoreGateway;
use crate::queries;

pub struct CategoryService<'g> {
    gateway: &'g StoreGateway,
    owner_user_id: i64,
}

impl<'g> CategoryService<'g> {
    pub fn new(gateway: &'g StoreGateway, owner_user_id: i64) -> Self {
        Self { gateway, owner_user_id }
    }

    /// The owner's categories, ordered by name.
    pub fn list(&self) -> StoreResult<Vec<Category>> {
        let conn = self.gateway.open()?;
        queries::categories::list_for_owner(&conn, self.owner_user_id)
    }

    /// Add a category. The name is trimmed; if the owner already has a
    /// category with that name, the existing one is returned.
    pub fn add(&self, name: &str) -> StoreResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput(
                "category name cannot be empty".to_string(),
            ));
        }

        let conn = self.gateway.open()?;
        if let Some(existing) =
            queries::categories::find_by_name(&conn, self.owner_user_id, name)?
        {
            return Ok(existing);
        }
        queries::categories::insert(&conn, self.owner_user_id, name)
    }

    pub fn by_id(&self, id: i64) -> StoreResult<Option<Category>> {
        let conn = self.gateway.open()?;
        queries::categories::find_by_id(&conn, id)
    }

    pub fn by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let conn = self.gateway.open()?;
        queries::categories::find_by_name(&conn, self.owner_user_id, name)
    }

    /// Remove a category. Transactions that referenced it keep their data
    /// but lose the category link (SET NULL on the foreign key).
    pub fn remove(&self, id: i64) -> StoreResult<bool> {
        let conn = self.gateway.open()?;
        Ok(queries::categories::delete(&conn, id)? > 0)
    }
}
