use tracing::debug;

use super::{decode_entity, LegitmarkClient};
use crate::constants::{endpoints, response_keys};
use crate::error::Result;
use crate::models::Category;

impl LegitmarkClient {
    /// Fetch the category → type → brand tree
    ///
    /// GET /api/v2/categories/tree
    pub async fn get_taxonomy_tree(&self, active_only: bool) -> Result<Vec<Category>> {
        let query = vec![("active_only".to_string(), active_only.to_string())];

        let body = self
            .read(|| self.transport.get(endpoints::TAXONOMY_TREE, &query))
            .await?;
        let categories: Vec<Category> =
            decode_entity(body, response_keys::DATA, endpoints::TAXONOMY_TREE)?;

        debug!(categories = categories.len(), active_only, "Fetched taxonomy tree");
        Ok(categories)
    }
}
