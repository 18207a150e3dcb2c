//! Repository Fetcher
//!
//! Talks to the GitHub REST API. Identifiers are parsed by
//! [`RepoIdentifier`](crate::types::RepoIdentifier); this module only
//! performs requests.

mod client;

pub use client::GitHubClient;
