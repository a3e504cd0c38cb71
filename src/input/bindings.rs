use serde::ser::{Serialize, SerializeMap, Serializer};

/// Arguments captured by a successful match, in the order they were bound.
///
/// Keys are value parameter names (`<x>` binds `x`), flag keys (`--x` binds `x`,
/// valueless flags bind `None`) and `unnamed_<n>` for a literal matched at
/// positional token `n`. A key bound more than once keeps every value, [`Bindings::get`]
/// returns the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
	entries: Vec<(String, Option<String>)>,
}

impl Bindings {
	pub fn new() -> Self {
		Self::default()
	}

	/// First value bound to `key`; `None` when unbound or bound to a bare flag.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(k, _)| k == key)
			.and_then(|(_, v)| v.as_deref())
	}

	/// Every value bound to `key`, skipping bare flags.
	pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.entries
			.iter()
			.filter(move |(k, _)| k == key)
			.filter_map(|(_, v)| v.as_deref())
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.iter().any(|(k, _)| k == key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub(crate) fn push(&mut self, key: String, value: Option<String>) {
		self.entries.push((key, value));
	}

	pub(crate) fn truncate(&mut self, len: usize) {
		self.entries.truncate(len);
	}

	fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<&str> = Vec::new();
		for (key, _) in &self.entries {
			if !keys.contains(&key.as_str()) {
				keys.push(key);
			}
		}
		keys
	}
}

impl Serialize for Bindings {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let keys = self.keys();
		let mut map = serializer.serialize_map(Some(keys.len()))?;

		for key in keys {
			let values: Vec<Option<&str>> = self
				.entries
				.iter()
				.filter(|(k, _)| k == key)
				.map(|(_, v)| v.as_deref())
				.collect();

			match values.as_slice() {
				[single] => map.serialize_entry(key, single)?,
				_ => map.serialize_entry(key, &values)?,
			}
		}

		map.end()
	}
}

impl<'a> IntoIterator for &'a Bindings {
	type Item = (&'a str, Option<&'a str>);
	type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

	fn into_iter(self) -> Self::IntoIter {
		Box::new(self.iter())
	}
}
