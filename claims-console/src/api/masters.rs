//! CRUD for the master-data collections, generic over [`MasterEntity`].

use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::MasterEntity;

impl ApiClient {
    pub async fn list_masters<E: MasterEntity>(&self) -> Result<Vec<E>> {
        let items: Vec<E> = self.get_list(E::COLLECTION).await?;
        info!(collection = E::COLLECTION, count = items.len(), "Fetched master data");
        Ok(items)
    }

    pub async fn create_master<E: MasterEntity>(&self, draft: &E::Draft) -> Result<E> {
        let created: E = self.post_json(E::COLLECTION, draft).await?;
        info!(collection = E::COLLECTION, id = created.id(), "{} created", E::LABEL);
        Ok(created)
    }

    /// Full replacement of the record's editable fields.
    pub async fn update_master<E: MasterEntity>(&self, id: &str, draft: &E::Draft) -> Result<E> {
        let updated: E = self
            .put_json(&format!("{}/{id}", E::COLLECTION), draft)
            .await?;
        info!(collection = E::COLLECTION, id, "{} updated", E::LABEL);
        Ok(updated)
    }

    pub async fn delete_master<E: MasterEntity>(&self, id: &str) -> Result<()> {
        self.delete(&format!("{}/{id}", E::COLLECTION)).await?;
        info!(collection = E::COLLECTION, id, "{} deleted", E::LABEL);
        Ok(())
    }
}
