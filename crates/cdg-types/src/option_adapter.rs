//! Adapter that persists settings buckets.
//!
//! A bucket is a single named structured value (a JSON object for settings)
//! that is always read and written in full. There is no per-key update and no
//! locking: the last write to a bucket wins.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::prelude::*;

pub trait OptionAdapter: Debug + Send + Sync {
	/// Reads a bucket. Returns `None` if the bucket was never written.
	fn read_bucket(&self, name: &str) -> CdgResult<Option<serde_json::Value>>;

	/// Replaces the whole content of a bucket
	fn write_bucket(&self, name: &str, value: &serde_json::Value) -> CdgResult<()>;

	/// Deletes a bucket, returns whether it existed
	fn delete_bucket(&self, name: &str) -> CdgResult<bool>;
}

/// Process-local bucket storage.
///
/// Used for tests and for hosts that hand over their own option storage per
/// request. `reject_writes` simulates a storage layer refusing a write.
#[derive(Debug, Default)]
pub struct MemoryOptionAdapter {
	buckets: RwLock<HashMap<String, serde_json::Value>>,
	reject_writes: RwLock<bool>,
}

impl MemoryOptionAdapter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an adapter with one bucket already populated
	pub fn with_bucket(name: impl Into<String>, value: serde_json::Value) -> Self {
		let adapter = Self::new();
		adapter.buckets.write().insert(name.into(), value);
		adapter
	}

	pub fn set_reject_writes(&self, reject: bool) {
		*self.reject_writes.write() = reject;
	}
}

impl OptionAdapter for MemoryOptionAdapter {
	fn read_bucket(&self, name: &str) -> CdgResult<Option<serde_json::Value>> {
		Ok(self.buckets.read().get(name).cloned())
	}

	fn write_bucket(&self, name: &str, value: &serde_json::Value) -> CdgResult<()> {
		if *self.reject_writes.read() {
			return Err(Error::StorageError(format!("bucket '{}' is read-only", name)));
		}
		self.buckets.write().insert(name.to_string(), value.clone());
		Ok(())
	}

	fn delete_bucket(&self, name: &str) -> CdgResult<bool> {
		Ok(self.buckets.write().remove(name).is_some())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_memory_roundtrip() {
		let adapter = MemoryOptionAdapter::new();
		assert!(adapter.read_bucket("cdg_core_settings").unwrap().is_none());

		adapter.write_bucket("cdg_core_settings", &json!({ "disable_xmlrpc": false })).unwrap();
		let stored = adapter.read_bucket("cdg_core_settings").unwrap();
		assert_eq!(stored, Some(json!({ "disable_xmlrpc": false })));

		assert!(adapter.delete_bucket("cdg_core_settings").unwrap());
		assert!(!adapter.delete_bucket("cdg_core_settings").unwrap());
	}

	#[test]
	fn test_memory_reject_writes() {
		let adapter = MemoryOptionAdapter::with_bucket("b", json!({ "a": 1 }));
		adapter.set_reject_writes(true);

		let res = adapter.write_bucket("b", &json!({ "a": 2 }));
		assert!(matches!(res, Err(Error::StorageError(_))));
		assert_eq!(adapter.read_bucket("b").unwrap(), Some(json!({ "a": 1 })));
	}
}

// vim: ts=4
