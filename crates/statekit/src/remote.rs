//! Remote (S3) mirror configuration and copy commands.

use std::path::Path;

use execkit::ProcessSpec;

/// Bucket holding the remote state copy. Remote sync is off when unset.
pub const ENV_BUCKET: &str = "S3_STATE_BUCKET";

/// Object key of the remote state copy
pub const ENV_KEY: &str = "S3_STATE_KEY";

/// Region for the state bucket
pub const ENV_REGION: &str = "S3_STATE_REGION";

/// Generic AWS region, used when [`ENV_REGION`] is unset
pub const ENV_AWS_REGION: &str = "AWS_REGION";

/// Object key used when [`ENV_KEY`] is unset
pub const DEFAULT_KEY: &str = "state/created_resources.json";

/// Region used when neither region variable is set
pub const DEFAULT_REGION: &str = "us-east-1";

/// CLI used for object copies
pub const AWS_CLI: &str = "aws";

/// Where the remote copy of the state file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStateConfig {
    pub bucket: String,
    pub key: String,
    pub region: String,
}

impl RemoteStateConfig {
    /// Build from the process environment.
    ///
    /// Returns `None` when no bucket is configured, which disables remote sync.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bucket = get(ENV_BUCKET)?;
        let key = get(ENV_KEY).unwrap_or_else(|| DEFAULT_KEY.to_string());
        let region = get(ENV_REGION)
            .or_else(|| get(ENV_AWS_REGION))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Some(Self {
            bucket,
            key,
            region,
        })
    }

    /// `s3://{bucket}/{key}`
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }

    /// Copy the remote object to `dest`.
    pub fn download_spec(&self, dest: &Path) -> ProcessSpec {
        ProcessSpec::new(AWS_CLI)
            .args(["s3", "cp"])
            .arg(self.uri())
            .path_arg(dest)
            .args(["--region", self.region.as_str()])
            .capture()
    }

    /// Copy `src` to the remote object.
    pub fn upload_spec(&self, src: &Path) -> ProcessSpec {
        ProcessSpec::new(AWS_CLI)
            .args(["s3", "cp"])
            .path_arg(src)
            .arg(self.uri())
            .args(["--region", self.region.as_str()])
            .capture()
    }
}
