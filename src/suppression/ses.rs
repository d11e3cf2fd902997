//! AWS SES v2 account-level suppression list.
//!
//! Uses the default AWS credential chain unless a named profile is
//! configured.

use aws_config::BehaviorVersion;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::error::DisplayErrorContext;

use super::directory::{DirectoryError, DirectoryPage, SuppressionDirectory};

/// Connection settings for the SES client.
#[derive(Debug, Clone, Default)]
pub struct SesSettings {
    /// AWS region; `None` defers to the SDK's region provider chain.
    pub region: Option<String>,
    /// Named profile; `None` uses the default credential chain.
    pub profile: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SesDirectory {
    client: SesClient,
}

impl SesDirectory {
    /// Load AWS configuration and build the SES v2 client.
    pub async fn connect(settings: &SesSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        log::info!(
            "SES client configured (region: {})",
            config
                .region()
                .map(|region| region.as_ref())
                .unwrap_or("unset")
        );

        Self {
            client: SesClient::new(&config),
        }
    }
}

#[rocket::async_trait]
impl SuppressionDirectory for SesDirectory {
    async fn list_page(
        &self,
        cursor: Option<&str>,
        page_size: i32,
    ) -> Result<DirectoryPage, DirectoryError> {
        let output = self
            .client
            .list_suppressed_destinations()
            .set_next_token(cursor.map(str::to_string))
            .page_size(page_size)
            .send()
            .await
            .map_err(|e| DirectoryError::List(DisplayErrorContext(&e).to_string()))?;

        let addresses = output
            .suppressed_destination_summaries()
            .iter()
            .map(|summary| summary.email_address().to_string())
            .collect();

        Ok(DirectoryPage {
            addresses,
            next_cursor: output.next_token().map(str::to_string),
        })
    }

    async fn delete_one(&self, address: &str) -> Result<(), DirectoryError> {
        self.client
            .delete_suppressed_destination()
            .email_address(address)
            .send()
            .await
            .map_err(|e| DirectoryError::Delete(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
