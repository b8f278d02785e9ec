//! Common utilities for integration tests

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated working directory with an empty config file.
pub struct TestContext {
    pub temp: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.yaml"), "workers: 2\n").unwrap();
        Self { temp }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write the project list and return its path.
    pub fn write_input(&self, content: &str) -> PathBuf {
        let path = self.path().join("projects.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    /// `osslist` running in the context directory with its config file.
    pub fn osslist(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("osslist").unwrap();
        cmd.current_dir(self.path())
            .arg("--config")
            .arg(self.path().join("config.yaml"))
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Projects on hosts no adapter serves, so reconciliation stays offline.
pub const OFFLINE_PROJECTS: &str = r#"
Other:
  - name: misc
    repository: https://code.example.invalid/misc/misc
    description: Miscellaneous; odds and ends
Tools:
  - name: tool10
    repository: https://code.example.invalid/tools/tool10
    description: Tenth tool
    license: MIT
    languages: [Rust, C]
    tags: cli
  - name: Tool2
    repository: https://code.example.invalid/tools/tool2
    description: Second tool
    homepage: https://tool2.example.invalid
    first_release: 2019-04-01
Apps:
  - name: app
    repository: https://code.example.invalid/apps/app
    description: An <app>
"#;
