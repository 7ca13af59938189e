//! Channel listing.

use serde::Deserialize;

use crate::{ArchiveClient, FetchError};

/// A channel served by an archive instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArchiveChannel {
    /// Channel login name.
    pub name: String,
    /// Numeric channel id.
    #[serde(rename = "userID", default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct ChannelList {
    channels: Vec<ArchiveChannel>,
}

impl ArchiveClient {
    /// Lists the channels logged by the instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a channel list.
    pub async fn channels(&self, base_url: &str) -> Result<Vec<ArchiveChannel>, FetchError> {
        let url = format!("{}/channels", base_url.trim_end_matches('/'));
        tracing::debug!(%url, "listing channels");
        let list: ChannelList = self.get(&url).await?.json().await?;
        Ok(list.channels)
    }
}
