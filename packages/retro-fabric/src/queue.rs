use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// Logical label for a class of work.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueName(String);
impl QueueName {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl fmt::Display for QueueName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
impl From<&str> for QueueName {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

/// Queue names a worker was launched to serve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueSet(BTreeSet<QueueName>);
impl QueueSet {
	/// Parses a comma-separated list. Blank entries are skipped.
	pub fn parse(raw: &str) -> Self {
		raw.split(',')
			.map(str::trim)
			.filter(|name| !name.is_empty())
			.map(QueueName::new)
			.collect()
	}

	pub fn contains(&self, queue: &QueueName) -> bool {
		self.0.contains(queue)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &QueueName> {
		self.0.iter()
	}
}
impl FromIterator<QueueName> for QueueSet {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = QueueName>,
	{
		Self(iter.into_iter().collect())
	}
}
impl fmt::Display for QueueSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names: Vec<&str> = self.0.iter().map(QueueName::as_str).collect();

		f.write_str(&names.join(","))
	}
}
