//! Suppression list mirror: remote directory seam, SES client, cache, and
//! removal input parsing.

pub mod cache;
pub mod directory;
pub mod input;
pub mod ses;

pub use cache::{CacheStatus, MAX_PAGE_SIZE, RemovalOutcome, SuppressionCache};
pub use directory::{DirectoryError, DirectoryPage, SuppressionDirectory};
pub use input::parse_addresses;
pub use ses::{SesDirectory, SesSettings};
