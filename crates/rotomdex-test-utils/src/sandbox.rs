//! Hermetic runner for the `rotomdex` binary.
//!
//! - Private `HOME` under an `assert_fs::TempDir`, cleaned up on drop
//! - Color disabled (`NO_COLOR=1`) so output is stable
//! - Only `PATH` leaks in from the parent environment
//!
//! ```no_run
//! use rotomdex_test_utils::sandbox::Sandbox;
//!
//! let sb = Sandbox::new();
//! let out = sb.run("rotomdex", ["list", "--limit", "3"]).unwrap();
//! println!("{out}");
//! ```

use assert_fs::fixture::PathChild;
use assert_fs::TempDir;
use duct::Expression;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub struct Sandbox {
    root: TempDir,
    pub home: PathBuf,
    env: HashMap<String, String>,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create sandbox TempDir");
        let home = root.child("home").to_path_buf();
        fs::create_dir_all(&home).expect("create home dir");

        Self {
            root,
            home,
            env: HashMap::new(),
        }
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Extra environment variable for every command run from this sandbox
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Write/overwrite a file relative to the sandbox root; returns its absolute path
    pub fn write<P: AsRef<Path>, S: AsRef<[u8]>>(&self, rel: P, contents: S) -> PathBuf {
        let p = self.root_path().join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&p, contents).expect("write file");
        p
    }

    fn command<I>(&self, program: &str, args: I) -> Expression
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let bin = assert_cmd::cargo::cargo_bin(program);
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned())
            .collect();
        let expr = duct::cmd(bin, args).dir(self.root_path());
        self.inject_env(expr)
    }

    /// Run a cargo binary and return stdout. Errors if it exits non-zero.
    pub fn run<I>(&self, program: &str, args: I) -> Result<String, String>
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        self.command(program, args)
            .read()
            .map_err(|e| format!("command failed: {e}"))
    }

    /// Run a cargo binary, capturing both streams regardless of exit status
    pub fn run_output<I>(&self, program: &str, args: I) -> RunOutput
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let output = self
            .command(program, args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .expect("spawn command");

        RunOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn inject_env(&self, expr: Expression) -> Expression {
        let mut env_map: HashMap<String, String> = HashMap::new();
        if let Ok(path) = std::env::var("PATH") {
            env_map.insert("PATH".into(), path);
        }
        env_map.insert("HOME".into(), self.home.to_string_lossy().into_owned());
        env_map.insert("NO_COLOR".into(), "1".into());
        env_map.extend(self.env.clone());

        expr.full_env(&env_map)
    }
}
