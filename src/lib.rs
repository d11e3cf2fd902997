#[macro_use]
extern crate rocket;

pub mod config;
pub mod error;
pub mod request_logger;
pub mod routes;
pub mod suppression;

use crate::config::AppConfig;
use crate::request_logger::RequestLogger;
use crate::suppression::{SesDirectory, SuppressionCache};
use env_logger::Env;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket, Route};
use std::sync::{Arc, Once};

static LOGGER: Once = Once::new();

pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(
            Env::default().default_filter_or("info,rocket::server=warn,rocket::request=warn"),
        )
        .init();
    });
}

/// All application routes, mounted at `/`.
pub fn app_routes() -> Vec<Route> {
    let mut mounted = routes![
        routes::index::index,
        routes::health::health_check,
        routes::suppressions::list,
        routes::suppressions::update,
        routes::suppressions::remove,
    ];
    mounted.extend(routes::suppressions::post_only_routes(&["/update", "/remove"]));
    mounted
}

pub fn rocket() -> Rocket<Build> {
    build_rocket(AppConfig::from_env())
}

pub fn build_rocket(config: AppConfig) -> Rocket<Build> {
    init_logger();

    let figment = rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port));

    log::info!("binding to {}:{}", config.address, config.port);

    rocket::custom(figment)
        .attach(RequestLogger)
        // Build the SES-backed cache and attempt the initial refresh
        .attach(AdHoc::on_ignite("Suppression Cache", move |rocket| async move {
            let directory = SesDirectory::connect(&config.ses).await;
            let cache = SuppressionCache::new(Arc::new(directory), config.page_size);
            if config.refresh_on_start {
                cache.warm().await;
            } else {
                log::info!("startup refresh disabled; cache starts empty");
            }
            rocket.manage(cache)
        }))
        .mount("/", app_routes())
}

#[cfg_attr(not(test), allow(dead_code))]
pub mod test_support {
    use crate::suppression::{DirectoryError, DirectoryPage, SuppressionCache, SuppressionDirectory};
    use parking_lot::Mutex;
    use rocket::config::LogLevel;
    use rocket::figment::Figment;
    use rocket::local::asynchronous::Client as AsyncClient;
    use rocket::local::blocking::Client;
    use rocket::{Build, Rocket};
    use std::collections::HashSet;
    use std::sync::Arc;

    #[derive(Default)]
    struct StaticDirectoryState {
        pages: Vec<Vec<String>>,
        fail_listing_at: Option<usize>,
        failing_deletes: HashSet<String>,
        deleted: Vec<String>,
        list_calls: Vec<(Option<String>, i32)>,
    }

    /// Scripted in-memory directory standing in for SES.
    ///
    /// Page `n` is served for cursor `page-n` (the first page for no cursor);
    /// every page but the last advertises the next cursor. Clones share state.
    #[derive(Clone, Default)]
    pub struct StaticDirectory {
        inner: Arc<Mutex<StaticDirectoryState>>,
    }

    impl StaticDirectory {
        pub fn with_pages(pages: Vec<Vec<&str>>) -> Self {
            let directory = Self::default();
            directory.set_pages(pages);
            directory
        }

        /// Replace the remote contents served by subsequent listings.
        pub fn set_pages(&self, pages: Vec<Vec<&str>>) {
            self.inner.lock().pages = pages
                .into_iter()
                .map(|page| page.into_iter().map(str::to_string).collect())
                .collect();
        }

        /// Fail the listing request for page `page` (zero-based).
        pub fn fail_listing_at(&self, page: usize) {
            self.inner.lock().fail_listing_at = Some(page);
        }

        /// Fail remote deletion of exactly `address`.
        pub fn fail_delete_for(&self, address: &str) {
            self.inner.lock().failing_deletes.insert(address.to_string());
        }

        pub fn clear_failures(&self) {
            let mut state = self.inner.lock();
            state.fail_listing_at = None;
            state.failing_deletes.clear();
        }

        /// Addresses deleted so far, in call order.
        pub fn deleted(&self) -> Vec<String> {
            self.inner.lock().deleted.clone()
        }

        /// `(cursor, page_size)` for every listing request, in call order.
        pub fn list_calls(&self) -> Vec<(Option<String>, i32)> {
            self.inner.lock().list_calls.clone()
        }
    }

    #[rocket::async_trait]
    impl SuppressionDirectory for StaticDirectory {
        async fn list_page(
            &self,
            cursor: Option<&str>,
            page_size: i32,
        ) -> Result<DirectoryPage, DirectoryError> {
            let mut state = self.inner.lock();
            state
                .list_calls
                .push((cursor.map(str::to_string), page_size));

            let page = match cursor {
                None => 0,
                Some(cursor) => cursor
                    .strip_prefix("page-")
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or_else(|| DirectoryError::List(format!("unknown cursor {cursor}")))?,
            };

            if state.fail_listing_at == Some(page) {
                return Err(DirectoryError::List(format!(
                    "simulated outage on page {page}"
                )));
            }

            let next_cursor = (page + 1 < state.pages.len()).then(|| format!("page-{}", page + 1));
            Ok(DirectoryPage {
                addresses: state.pages.get(page).cloned().unwrap_or_default(),
                next_cursor,
            })
        }

        async fn delete_one(&self, address: &str) -> Result<(), DirectoryError> {
            let mut state = self.inner.lock();
            if state.failing_deletes.contains(address) {
                return Err(DirectoryError::Delete(format!(
                    "simulated delete failure for {address}"
                )));
            }
            for page in state.pages.iter_mut() {
                page.retain(|entry| entry != address);
            }
            state.deleted.push(address.to_string());
            Ok(())
        }
    }

    /// Builder for constructing Rocket instances tailored for integration tests.
    pub struct TestRocketBuilder {
        figment: Figment,
        cache: Option<SuppressionCache>,
    }

    impl Default for TestRocketBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestRocketBuilder {
        /// Start a builder with sensible defaults: random port, logging disabled.
        pub fn new() -> Self {
            let figment = rocket::Config::figment()
                .merge(("port", 0))
                .merge(("log_level", LogLevel::Off))
                .merge(("cli_colors", false));

            Self {
                figment,
                cache: None,
            }
        }

        /// Manage a cache over the given directory without refreshing it.
        pub fn with_directory(self, directory: StaticDirectory) -> Self {
            self.manage_cache(SuppressionCache::new(
                Arc::new(directory),
                crate::suppression::MAX_PAGE_SIZE,
            ))
        }

        /// Manage a prepared cache, for tests that refresh it up front.
        pub fn manage_cache(mut self, cache: SuppressionCache) -> Self {
            self.cache = Some(cache);
            self
        }

        /// Finish building the Rocket instance with every application route mounted.
        pub fn build(self) -> Rocket<Build> {
            let cache = self.cache.unwrap_or_else(|| {
                SuppressionCache::new(
                    Arc::new(StaticDirectory::default()),
                    crate::suppression::MAX_PAGE_SIZE,
                )
            });

            rocket::custom(self.figment)
                .manage(cache)
                .mount("/", crate::app_routes())
        }

        /// Convenience helper to produce a blocking local client.
        pub fn blocking_client(self) -> Client {
            Client::tracked(self.build()).expect("valid Rocket instance")
        }

        /// Convenience helper to produce an asynchronous local client.
        pub async fn async_client(self) -> AsyncClient {
            AsyncClient::tracked(self.build())
                .await
                .expect("valid Rocket instance")
        }
    }
}
