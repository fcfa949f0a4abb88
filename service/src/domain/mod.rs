use std::future::Future;

use site_common::{FlatContent, SiteId};

use crate::domain::{error::StoreError, site_management::SiteManagementService};

pub mod error;
pub mod site_management;

/// Reads and writes the flat content record of a site.
///
/// `write` is a compare-and-swap: `record.row_version` must equal the row
/// version currently stored (zero when nothing is stored yet), otherwise the
/// write fails with `StoreError::Conflict`. A successful write returns the
/// stored record with the bumped row version.
pub trait ContentStore: Clone + Send + Sync + 'static {
    fn read(
        &self,
        site: &SiteId,
    ) -> impl Future<Output = Result<Option<FlatContent>, StoreError>> + Send;

    fn write(
        &self,
        site: &SiteId,
        record: FlatContent,
    ) -> impl Future<Output = Result<FlatContent, StoreError>> + Send;
}

//// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type S: ContentStore;
    fn site_management(&self) -> &SiteManagementService<Self::S>;
    /// Site served by the routes that carry no site id.
    fn default_site(&self) -> &SiteId;
}
