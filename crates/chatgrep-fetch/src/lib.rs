//! HTTP client, pagination and line streaming for chatgrep.
//!
//! This crate provides the fetch side of the search pipeline:
//!
//! - [`ArchiveApi`] - Page URL construction and backward paging
//! - [`ArchiveClient`] - HTTP client for archive instances
//! - [`PageStream`] - Streams one page body as records into a queue
//! - [`ArchiveClient::channels`] - Lists the channels an instance serves

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chatgrep/chatgrep/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod channels;
mod client;
mod pager;
mod stream;

pub use channels::ArchiveChannel;
pub use client::{ArchiveClient, ClientConfig, FetchError};
pub use pager::{ArchiveApi, PageDescriptor, UserRef};
pub use stream::{PageStream, PumpSummary};
