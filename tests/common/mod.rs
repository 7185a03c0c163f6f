use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

pub fn run_carechunk(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    work: TempDir,
    api_key: Option<String>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            work: tempfile::tempdir().expect("create temporary working dir"),
            api_key: None,
        }
    }

    #[allow(dead_code)]
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_carechunk"));
        command
            .args(args)
            .current_dir(self.work.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env_remove("OPENAI_API_KEY")
            .env_remove("RUST_LOG");

        if let Some(key) = &self.api_key {
            command.env("OPENAI_API_KEY", key);
        }

        command.output().expect("failed to execute carechunk binary")
    }

    /// Write a transcripts file into the working directory and return its path.
    #[allow(dead_code)]
    pub fn write_transcripts(&self, transcripts: &[&str]) -> PathBuf {
        let path = self.work.path().join("transcripts.json");
        let body = serde_json::json!({ "transcripts": transcripts });
        std::fs::write(&path, body.to_string()).expect("write transcripts file");
        path
    }

    #[allow(dead_code)]
    pub fn work_path(&self) -> PathBuf {
        self.work.path().to_path_buf()
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }

    #[allow(dead_code)]
    pub fn write_config(&self, contents: &str) {
        let config_path = self.config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).expect("create config parent directory");
        }
        std::fs::write(&config_path, contents).expect("write config file");
    }
}
