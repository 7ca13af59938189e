//! The search command.

use crate::display::{HumanReporter, JsonReporter, QuietReporter};
use crate::instance::{InstanceArgs, fetch_channels, redact, select_instance};
use anyhow::{Result, bail};
use chatgrep_lib::prelude::*;
use clap::Args;
use std::io::BufWriter;
use std::time::Duration;

/// Arguments of `chatgrep search`.
#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Channels to search (comma-separated)
    #[arg(short, long, value_delimiter = ',', required_unless_present = "recursive")]
    channel: Vec<String>,

    /// Search every channel the instance logs
    #[arg(short, long, conflicts_with = "channel")]
    recursive: bool,

    /// Only lines from this user
    #[arg(short, long)]
    user: Option<String>,

    /// Only lines from the user with this numeric id
    #[arg(long, conflicts_with_all = ["user", "uregex"])]
    user_id: Option<String>,

    /// Skip lines from this user
    #[arg(long)]
    notuser: Option<String>,

    /// Treat --user and --notuser as regular expressions
    #[arg(long)]
    uregex: bool,

    /// Pattern the message text must match
    #[arg(long, default_value = "")]
    regex: String,

    /// Message types to keep, e.g. PRIVMSG,USERNOTICE (comma-separated)
    #[arg(long, value_delimiter = ',')]
    msg_types: Vec<String>,

    /// Deprecated: same as --msg-types PRIVMSG
    #[arg(long)]
    msg_only: bool,

    /// Window start (e.g. 2024-01-01 or "2024-01-01 12:00:00")
    #[arg(short, long)]
    start: String,

    /// Window end, exclusive (defaults to now)
    #[arg(short, long)]
    end: Option<String>,

    /// Stop after this many matches (0 for unlimited)
    #[arg(long, default_value_t = 0)]
    max: u64,

    /// Show a progress bar and a summary on stderr
    #[arg(short, long, conflicts_with = "progress_json")]
    verbose: bool,

    /// Emit progress events as JSON lines on stderr
    #[arg(long)]
    progress_json: bool,

    /// Whole-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[command(flatten)]
    instance: InstanceArgs,
}

impl SearchArgs {
    fn window(&self) -> Result<TimeWindow, ConfigError> {
        let start = parse_timestamp("start", &self.start)?;
        match &self.end {
            Some(end) => TimeWindow::new(start, parse_timestamp("end", end)?),
            None => TimeWindow::until_now(start),
        }
    }

    fn message_types(&self) -> Vec<String> {
        let mut types = self.msg_types.clone();
        if self.msg_only {
            tracing::warn!("--msg-only is deprecated, use --msg-types PRIVMSG");
            types.push("PRIVMSG".to_string());
        }
        types
    }

    /// The archive-side user selection, if any.
    fn user_ref(&self) -> Option<UserRef> {
        if self.uregex {
            return None;
        }
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        non_empty(&self.user)
            .map(UserRef::Name)
            .or_else(|| non_empty(&self.user_id).map(UserRef::Id))
    }

    /// Builds the filter configuration and the per-user paging choice.
    pub(crate) fn match_config(&self) -> Result<(MatchConfig, Option<UserRef>), ConfigError> {
        if self.user_id.is_some() && self.uregex {
            return Err(ConfigError::Conflict(
                "--user-id cannot be combined with --uregex".into(),
            ));
        }

        let user_ref = self.user_ref();
        let notuser = self.notuser.as_deref().unwrap_or_default();

        let (user, not_user) = if self.uregex {
            (
                UserMatch::regex("user", self.user.as_deref().unwrap_or_default())?,
                UserMatch::regex("notuser", notuser)?,
            )
        } else {
            // The archive filters by user already when paging per user.
            (UserMatch::Disabled, UserMatch::exact(notuser))
        };

        let config = MatchConfig::new(self.window()?, &self.regex)?
            .with_message_types(self.message_types())
            .with_user(user)
            .with_not_user(not_user)
            .with_max_results(self.max);

        Ok((config, user_ref))
    }

    /// Requested channel names, normalized.
    fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self
            .channel
            .iter()
            .map(|c| c.trim().trim_start_matches('#').to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        channels.dedup();
        channels
    }
}

/// Run a search and stream matching lines to stdout.
pub(crate) async fn search(args: SearchArgs) -> Result<()> {
    let (config, user) = args.match_config()?;

    let client = ArchiveClient::new(ClientConfig {
        timeout: args.timeout.map(Duration::from_secs),
        ..ClientConfig::default()
    })?;

    let candidates = args.instance.candidates();
    let (base_url, channels) = if args.recursive {
        let [instance] = candidates.as_slice() else {
            let listed: Vec<String> = candidates.iter().map(|c| redact(c)).collect();
            bail!(
                "--recursive needs exactly one instance, got: {}",
                listed.join(", ")
            );
        };
        let names = fetch_channels(&client, instance)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        (instance.clone(), names)
    } else {
        let channels = args.channels();
        if channels.is_empty() {
            bail!("no channel given");
        }
        let instance = select_instance(&client, &candidates, &channels).await?;
        (instance, channels)
    };

    tracing::info!(
        instance = %redact(&base_url),
        channels = channels.len(),
        window = %config.window,
        "Starting search"
    );

    let plan = SearchPlan {
        base_url,
        channels,
        user,
    };
    let searcher = Searcher::new(client, config, SearchOptions::default());

    let shutdown = searcher.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current line");
            shutdown.cancel();
        }
    });

    let mut reporter: Box<dyn Reporter> = if args.progress_json {
        Box::new(JsonReporter::new(std::io::stderr()))
    } else if args.verbose {
        Box::new(HumanReporter::new())
    } else {
        Box::new(QuietReporter)
    };

    let stdout = std::io::stdout();
    let mut sink = WriterSink::new(BufWriter::new(stdout.lock()));
    let summary = searcher.run(&plan, reporter.as_mut(), &mut sink).await?;

    let failed = summary.failed_channels();
    if failed > 0 {
        tracing::warn!(failed, "Some channels were cut short by fetch errors");
    }

    Ok(())
}
