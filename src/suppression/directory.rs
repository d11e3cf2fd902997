//! Seam between the cache and the provider that owns the suppression list.

use thiserror::Error;

/// Errors raised by a remote suppression directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to list suppressed destinations: {0}")]
    List(String),
    #[error("{0}")]
    Delete(String),
}

/// One page of suppressed addresses as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryPage {
    pub addresses: Vec<String>,
    /// Opaque cursor for the next page; `None` or empty when the listing is exhausted.
    pub next_cursor: Option<String>,
}

impl DirectoryPage {
    pub fn has_more(&self) -> bool {
        self.next_cursor
            .as_deref()
            .map(|cursor| !cursor.is_empty())
            .unwrap_or(false)
    }
}

/// Remote store of suppressed email addresses.
///
/// Implementations only need paginated listing and single-address deletion;
/// there is no bulk delete.
#[rocket::async_trait]
pub trait SuppressionDirectory: Send + Sync {
    /// Fetch one page, starting from `cursor` (`None` for the first page).
    async fn list_page(
        &self,
        cursor: Option<&str>,
        page_size: i32,
    ) -> Result<DirectoryPage, DirectoryError>;

    /// Delete exactly `address` from the remote list.
    async fn delete_one(&self, address: &str) -> Result<(), DirectoryError>;
}
