//! Shared utilities for the identity console workspace.
//!
//! Currently only build metadata, used by the API client's `User-Agent`
//! and the CLI's `--version` output.

pub mod version_info;
