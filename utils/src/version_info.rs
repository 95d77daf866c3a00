//! Version information for the console, populated at build time.

/// Get the build date in RFC3339 format
pub fn build_date() -> &'static str {
    env!("BUILD_DATE")
}

/// Get the git commit hash (short)
pub fn build_commit() -> &'static str {
    env!("BUILD_COMMIT")
}

/// Get the package version
pub fn build_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// `{version} ({commit}, {date})`, with the date cut to `YYYY-MM-DD`.
pub fn long_version() -> String {
    let date = build_date();
    let day = if date.len() >= 10 && date.is_ascii() {
        &date[..10]
    } else {
        date
    };
    format!("{} ({}, {day})", build_version(), build_commit())
}

/// Value sent as `User-Agent` by the console's HTTP client.
pub fn user_agent() -> String {
    format!("iam-console/{} ({})", build_version(), build_commit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_date_not_empty() {
        assert!(!build_date().is_empty());
    }

    #[test]
    fn test_build_commit_not_empty() {
        assert!(!build_commit().is_empty());
    }

    #[test]
    fn test_long_version_contains_parts() {
        let version = long_version();
        assert!(version.starts_with(build_version()));
        assert!(version.contains(build_commit()));
    }

    #[test]
    fn test_user_agent_format() {
        let agent = user_agent();
        assert!(agent.starts_with("iam-console/"));
        assert!(agent.ends_with(')'));
    }
}
