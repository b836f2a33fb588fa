//! Status line text for a result count.

use std::collections::BTreeMap;
use std::sync::Arc;

use num_format::{Locale, ToFormattedString};
use sift_config::{KEY_NONE, KEY_ONE, KEY_OTHER, KEY_PLACEHOLDER, ResultsConfig};

/// Translation keys used by the status region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKey {
	/// No query has been issued.
	Placeholder,
	/// A query was issued and matched nothing.
	None,
	/// Exactly one match.
	One,
	/// Several matches; takes the rounded count as argument.
	Other,
}

impl StatusKey {
	/// Translation table key.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Placeholder => KEY_PLACEHOLDER,
			Self::None => KEY_NONE,
			Self::One => KEY_ONE,
			Self::Other => KEY_OTHER,
		}
	}
}

/// String lookup for status keys.
pub trait Translate: Send + Sync + 'static {
	/// Returns the text for `key`, with `count` substituted when given.
	fn translate(&self, key: StatusKey, count: Option<&str>) -> String;
}

/// Translation table where `#` marks the count placeholder.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
	entries: BTreeMap<String, String>,
}

impl Catalog {
	/// Creates a catalog over `entries`.
	pub fn new(entries: BTreeMap<String, String>) -> Self {
		Self { entries }
	}

	/// Creates a catalog from the configured translation table.
	pub fn from_config(config: &ResultsConfig) -> Self {
		Self::new(config.translations.clone())
	}
}

impl Translate for Catalog {
	fn translate(&self, key: StatusKey, count: Option<&str>) -> String {
		let Some(template) = self.entries.get(key.as_str()) else {
			tracing::warn!(key = key.as_str(), "missing translation");
			return key.as_str().to_string();
		};
		match count {
			Some(count) => template.replace('#', count),
			None => template.clone(),
		}
	}
}

/// Human-readable count: exact below one thousand, otherwise rounded to the
/// nearest hundred with thousands separators.
pub fn round_count(count: usize) -> String {
	if count < 1000 {
		return count.to_string();
	}
	let rounded = count.saturating_add(50) / 100 * 100;
	rounded.to_formatted_string(&Locale::en)
}

/// Maps a result count to status text.
#[derive(Debug)]
pub struct StatusPresenter<T> {
	translations: Arc<T>,
}

impl<T: Translate> StatusPresenter<T> {
	/// Creates a presenter over a translation source.
	pub fn new(translations: Arc<T>) -> Self {
		Self { translations }
	}

	/// Status text for `count`; `None` means no query was issued.
	pub fn status_text(&self, count: Option<usize>) -> String {
		match count {
			None => self.translations.translate(StatusKey::Placeholder, None),
			Some(0) => self.translations.translate(StatusKey::None, None),
			Some(1) => self.translations.translate(StatusKey::One, None),
			Some(count) => self.translations.translate(StatusKey::Other, Some(&round_count(count))),
		}
	}
}
