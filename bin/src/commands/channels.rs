//! The channels command.

use crate::instance::{InstanceArgs, fetch_channels, redact};
use anyhow::Result;
use chatgrep_lib::prelude::*;

/// List the channels logged by every candidate instance.
pub(crate) async fn list_channels(instance: &InstanceArgs) -> Result<()> {
    let client = ArchiveClient::with_defaults()?;

    for base_url in instance.candidates() {
        let mut channels = fetch_channels(&client, &base_url).await?;
        channels.sort_by(|a, b| a.name.cmp(&b.name));

        println!("{} ({} channels)", redact(&base_url), channels.len());
        println!("{}", "=".repeat(40));
        for channel in &channels {
            println!("  {:<28} {}", channel.name, channel.user_id);
        }
        println!();
    }

    Ok(())
}
