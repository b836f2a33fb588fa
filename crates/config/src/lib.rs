//! Configuration for sift result lists.
//!
//! Configuration is written in TOML. Every field is optional; missing fields
//! fall back to the defaults below.
//!
//! ```toml
//! debounce_ms = 250
//! batch_size = 4
//! scroll_threshold = 16
//! frame_interval_ms = 16
//!
//! [translations]
//! "search.result.other" = "# documents found"
//! ```
//!
//! Translation entries are merged over the built-in English table, so a file
//! only needs to name the keys it overrides. In `search.result.other` the `#`
//! marker is replaced with the rounded result count.

pub mod error;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub use error::{ConfigError, Result};
use serde::Deserialize;

/// Quiet period after the latest query before a fetch is issued.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Number of items appended between scroll checks.
pub const DEFAULT_BATCH_SIZE: usize = 4;

/// Slack, in scroll units, under which the surface counts as scrolled to the bottom.
pub const DEFAULT_SCROLL_THRESHOLD: u32 = 16;

/// Frame interval used to align deliveries with paint cycles.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Translation key shown before any query was issued.
pub const KEY_PLACEHOLDER: &str = "search.result.placeholder";
/// Translation key shown when a query matched nothing.
pub const KEY_NONE: &str = "search.result.none";
/// Translation key shown when a query matched exactly one result.
pub const KEY_ONE: &str = "search.result.one";
/// Translation key shown when a query matched several results; `#` is the count.
pub const KEY_OTHER: &str = "search.result.other";

/// Built-in English translation table.
pub fn default_translations() -> BTreeMap<String, String> {
	[
		(KEY_PLACEHOLDER, "Type to start searching"),
		(KEY_NONE, "No matching documents"),
		(KEY_ONE, "1 matching document"),
		(KEY_OTHER, "# matching documents"),
	]
	.into_iter()
	.map(|(key, value)| (key.to_string(), value.to_string()))
	.collect()
}

/// Runtime settings for the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsConfig {
	/// Debounce window in milliseconds.
	pub debounce_ms: u64,
	/// Items rendered per batch before waiting for the viewer to scroll.
	pub batch_size: usize,
	/// Near-bottom slack in scroll units.
	pub scroll_threshold: u32,
	/// Frame interval in milliseconds; zero delivers on the next scheduler turn.
	pub frame_interval_ms: u64,
	/// Status strings keyed by translation key.
	pub translations: BTreeMap<String, String>,
}

impl Default for ResultsConfig {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			batch_size: DEFAULT_BATCH_SIZE,
			scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
			frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
			translations: default_translations(),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
	debounce_ms: Option<u64>,
	batch_size: Option<usize>,
	scroll_threshold: Option<u32>,
	frame_interval_ms: Option<u64>,
	#[serde(default)]
	translations: BTreeMap<String, String>,
}

impl ResultsConfig {
	/// Parses a TOML string, applying defaults and validating the result.
	pub fn parse(input: &str) -> Result<Self> {
		let raw: RawConfig = toml::from_str(input)?;
		let defaults = Self::default();
		let mut translations = defaults.translations;
		translations.extend(raw.translations);

		let config = Self {
			debounce_ms: raw.debounce_ms.unwrap_or(defaults.debounce_ms),
			batch_size: raw.batch_size.unwrap_or(defaults.batch_size),
			scroll_threshold: raw.scroll_threshold.unwrap_or(defaults.scroll_threshold),
			frame_interval_ms: raw.frame_interval_ms.unwrap_or(defaults.frame_interval_ms),
			translations,
		};
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&input)
	}

	/// Checks value ranges.
	pub fn validate(&self) -> Result<()> {
		if self.batch_size == 0 {
			return Err(ConfigError::Invalid("batch_size must be at least 1".to_string()));
		}
		Ok(())
	}

	/// Debounce window as a [`Duration`].
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Frame interval as a [`Duration`].
	pub fn frame_interval(&self) -> Duration {
		Duration::from_millis(self.frame_interval_ms)
	}
}
