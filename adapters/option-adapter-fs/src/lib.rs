//! Option adapter storing each bucket as `<base_dir>/<bucket>.json`.
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the bucket file, so readers see either the old or the new bucket.

#![forbid(unsafe_code)]

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use cdg_types::option_adapter::OptionAdapter;
use cdg_types::prelude::{CdgResult, Error};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
enum FsError {
	InvalidBucket(String),
	Io { action: &'static str, path: PathBuf, source: std::io::Error },
}

impl From<FsError> for Error {
	fn from(err: FsError) -> Self {
		match err {
			FsError::InvalidBucket(name) => {
				Error::ValidationError(format!("Invalid bucket name: {:?}", name))
			}
			FsError::Io { action, path, source } => {
				Error::StorageError(format!("{} {}: {}", action, path.display(), source))
			}
		}
	}
}

fn io_error<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(std::io::Error) -> FsError + 'a {
	move |source| FsError::Io { action, path: path.to_path_buf(), source }
}

/// Bucket names become file names: `[A-Za-z0-9_-]`, 1 to 64 characters
fn validate_bucket(name: &str) -> Result<(), FsError> {
	let valid = !name.is_empty()
		&& name.len() <= 64
		&& name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
	if valid { Ok(()) } else { Err(FsError::InvalidBucket(name.to_string())) }
}

#[derive(Debug)]
pub struct OptionAdapterFs {
	base_dir: Box<Path>,
}

impl OptionAdapterFs {
	pub fn new(base_dir: impl Into<PathBuf>) -> CdgResult<Self> {
		let base_dir = base_dir.into();
		fs::create_dir_all(&base_dir).map_err(io_error("create", &base_dir))?;
		info!("Option buckets stored in {}", base_dir.display());
		Ok(Self { base_dir: base_dir.into_boxed_path() })
	}

	fn bucket_path(&self, name: &str) -> CdgResult<PathBuf> {
		validate_bucket(name)?;
		Ok(self.base_dir.join(format!("{}.json", name)))
	}

	fn tmp_path(&self, name: &str) -> PathBuf {
		let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
		self.base_dir.join(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
	}
}

impl OptionAdapter for OptionAdapterFs {
	fn read_bucket(&self, name: &str) -> CdgResult<Option<serde_json::Value>> {
		let path = self.bucket_path(name)?;
		let data = match fs::read(&path) {
			Ok(data) => data,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(io_error("read", &path)(err).into()),
		};
		let value = serde_json::from_slice(&data)?;
		debug!("Read bucket {} ({} bytes)", name, data.len());
		Ok(Some(value))
	}

	fn write_bucket(&self, name: &str, value: &serde_json::Value) -> CdgResult<()> {
		let path = self.bucket_path(name)?;
		let data = serde_json::to_vec_pretty(value)?;
		let tmp = self.tmp_path(name);

		let res = (|| {
			let mut file = fs::File::create(&tmp)?;
			file.write_all(&data)?;
			file.sync_all()?;
			fs::rename(&tmp, &path)
		})();
		if let Err(err) = res {
			warn!("Writing bucket {} failed, removing {}", name, tmp.display());
			if let Err(rm_err) = fs::remove_file(&tmp) {
				debug!("Temp file cleanup: {}", rm_err);
			}
			return Err(io_error("write", &path)(err).into());
		}
		debug!("Wrote bucket {} ({} bytes)", name, data.len());
		Ok(())
	}

	fn delete_bucket(&self, name: &str) -> CdgResult<bool> {
		let path = self.bucket_path(name)?;
		match fs::remove_file(&path) {
			Ok(()) => Ok(true),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
			Err(err) => Err(io_error("delete", &path)(err).into()),
		}
	}
}


// vim: ts=4
