//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct, a `Paged<T>` response envelope and
//! `fetch_page` to run a SeaORM select page by page.

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Build from optional query values, falling back to defaults.
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Self {
        let d = Self::default();
        Self { page: page.unwrap_or(d.page), per_page: per_page.unwrap_or(d.per_page) }
    }

    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of results plus the total row count.
#[derive(Clone, Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Paged<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged { items: self.items.into_iter().map(f).collect(), total: self.total, page: self.page, per_page: self.per_page }
    }
}

/// Run `select` for the requested page.
pub async fn fetch_page<'db, C, E>(db: &'db C, select: Select<E>, opts: Pagination) -> Result<Paged<E::Model>, ServiceError>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync + 'db,
{
    let (page_idx, per_page) = opts.normalize();
    // SeaORM's paginate uses 0-based page index internally via fetch_page
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Paged { items, total, page: page_idx + 1, per_page })
}
