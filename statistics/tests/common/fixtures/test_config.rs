//! Test configuration builder for writing config files to a temp directory

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestConfigBuilder {
    temp_dir: TempDir,
    seconds_per_slot: u64,
    slots_per_epoch: u64,
    database_path: Option<String>,
    poll_interval_seconds: Option<u64>,
    pools_interval_seconds: Option<u64>,
    webhook_url: Option<String>,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
            seconds_per_slot: 12,
            slots_per_epoch: 32,
            database_path: None,
            poll_interval_seconds: None,
            pools_interval_seconds: None,
            webhook_url: None,
        }
    }

    pub fn chain(mut self, seconds_per_slot: u64, slots_per_epoch: u64) -> Self {
        self.seconds_per_slot = seconds_per_slot;
        self.slots_per_epoch = slots_per_epoch;
        self
    }

    pub fn database_path(mut self, path: &str) -> Self {
        self.database_path = Some(path.to_string());
        self
    }

    pub fn poll_interval(mut self, seconds: u64) -> Self {
        self.poll_interval_seconds = Some(seconds);
        self
    }

    pub fn pools_interval(mut self, seconds: u64) -> Self {
        self.pools_interval_seconds = Some(seconds);
        self
    }

    pub fn webhook_url(mut self, url: &str) -> Self {
        self.webhook_url = Some(url.to_string());
        self
    }

    pub fn to_toml(&self) -> String {
        let database_path = self.database_path.clone().unwrap_or_else(|| {
            self.temp_dir
                .path()
                .join("data/explorer.db")
                .to_string_lossy()
                .into_owned()
        });

        let mut toml = format!(
            r#"[chain]
seconds_per_slot = {}
slots_per_epoch = {}

[database]
path = "{}"
"#,
            self.seconds_per_slot, self.slots_per_epoch, database_path
        );

        if self.poll_interval_seconds.is_some() || self.pools_interval_seconds.is_some() {
            toml.push_str("\n[statistics]\n");
            if let Some(seconds) = self.poll_interval_seconds {
                toml.push_str(&format!("poll_interval_seconds = {}\n", seconds));
            }
            if let Some(seconds) = self.pools_interval_seconds {
                toml.push_str(&format!("pools_interval_seconds = {}\n", seconds));
            }
        }

        if let Some(url) = &self.webhook_url {
            toml.push_str(&format!("\n[status]\nwebhook_url = \"{}\"\n", url));
        }

        toml
    }

    /// Write the config file and keep the temp dir alive with it
    pub fn build(self) -> TestConfig {
        let path = self.temp_dir.path().join("statistics.toml");
        fs::write(&path, self.to_toml()).expect("Failed to write config");
        TestConfig {
            _temp_dir: self.temp_dir,
            path,
        }
    }
}

pub struct TestConfig {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TestConfig {
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}
