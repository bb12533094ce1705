// ABOUTME: Loader for feed profiles from embedded JSON data or JSON files on disk.
// ABOUTME: Provides load_builtin_profile() for the default feed and load_profile_file() for overrides.

use std::fs;
use std::path::Path;

use crate::error::HarvestError;
use crate::profile::FeedProfile;

/// Embedded JSON for the default feed profile.
const BUILTIN_PROFILE_JSON: &str = include_str!("../../data/youtube_home.json");

/// Loads the builtin feed profile from embedded JSON.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed or cannot be deserialized.
pub fn load_builtin_profile() -> FeedProfile {
    serde_json::from_str(BUILTIN_PROFILE_JSON).expect("failed to parse builtin profile")
}

/// Parses and validates a profile from a JSON string.
pub fn parse_profile(json: &str) -> Result<FeedProfile, HarvestError> {
    let profile: FeedProfile = serde_json::from_str(json)
        .map_err(|e| HarvestError::config("ParseProfile", Some(e.into())))?;
    profile.validate()?;
    Ok(profile)
}

/// Reads, parses and validates a profile file.
pub fn load_profile_file(path: impl AsRef<Path>) -> Result<FeedProfile, HarvestError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| {
        HarvestError::config(
            "LoadProfile",
            Some(anyhow::anyhow!("reading {}: {}", path.display(), e)),
        )
    })?;
    parse_profile(&json)
}
