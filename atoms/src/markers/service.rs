use tracing::{debug, info};

use super::model::{HistoricalImages, LocationMarker};
use crate::error::{MarkerError, Result};
use crate::table::conversions::{item_to_marker, marker_to_item};
use crate::table::{PutCondition, TableBackend};

/// Data access layer over the markers table (pure domain logic, no HTTP)
///
/// Holds no state besides the backend; every call is a fresh round trip.
pub struct DataService<B> {
    backend: B,
}

impl<B: TableBackend> DataService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load every marker, following scan continuation until the table is exhausted
    pub async fn list_markers(&self) -> Result<Vec<LocationMarker>> {
        let mut markers = Vec::new();
        let mut start_key = None;
        let mut pages = 0usize;

        loop {
            let page = self.backend.scan_page(start_key.take()).await?;
            pages += 1;
            for item in &page.items {
                markers.push(item_to_marker(item)?);
            }
            match page.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(count = markers.len(), pages, "scanned markers table");
        Ok(markers)
    }

    /// Get a specific marker
    pub async fn get_marker(&self, marker_id: &str) -> Result<LocationMarker> {
        match self.backend.get_item(marker_id).await? {
            Some(item) => item_to_marker(&item),
            None => Err(MarkerError::NotFound(marker_id.to_string())),
        }
    }

    /// Store a new marker under a freshly generated id.
    ///
    /// Any id the caller supplied is replaced.
    pub async fn add_marker(&self, mut marker: LocationMarker) -> Result<LocationMarker> {
        let marker_id = uuid::Uuid::new_v4().to_string();
        if let Some(supplied) = marker.marker_id() {
            debug!(supplied, assigned = %marker_id, "discarding client supplied marker id");
        }
        marker.set_marker_id(marker_id);

        self.backend
            .put_item(marker_to_item(&marker)?, PutCondition::Always)
            .await?;

        info!(marker_id = marker.marker_id(), "marker created");
        Ok(marker)
    }

    /// Replace an existing marker, keeping its original creation time
    pub async fn update_marker(&self, mut marker: LocationMarker) -> Result<LocationMarker> {
        let marker_id = match marker.marker_id() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(MarkerError::Validation("markerId is required".to_string())),
        };

        let original = self.get_marker(&marker_id).await?;
        marker.date_created = original.date_created;

        // Conditional replace: a row deleted since the read surfaces as NotFound
        self.backend
            .put_item(marker_to_item(&marker)?, PutCondition::MustExist)
            .await?;

        info!(marker_id = %marker_id, "marker updated");
        Ok(marker)
    }

    /// Delete a marker. Missing ids are not an error.
    pub async fn delete_marker(&self, marker_id: &str) -> Result<()> {
        self.backend.delete_item(marker_id).await?;
        info!(marker_id, "marker deleted");
        Ok(())
    }

    /// Historical images of a marker; empty when it has none
    pub async fn historical_images(&self, marker_id: &str) -> Result<HistoricalImages> {
        let marker = self.get_marker(marker_id).await?;
        Ok(HistoricalImages {
            marker_id: marker
                .marker_id
                .unwrap_or_else(|| marker_id.to_string()),
            historical_images: marker.historical_images,
        })
    }
}
