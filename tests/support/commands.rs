//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Environment variables the binary reads; cleared so the host can't leak in.
const ENV_VARS: &[&str] = &[
    "GITHUB_TOKEN",
    "GITHUB_API_URL",
    "MIRRORER_ORG",
    "MIRRORER_COORDINATOR",
    "MIRRORER_LOG",
];

impl Test {
    /// Create a mirrorer command running in the test directory.
    ///
    /// Returns a Command configured with:
    /// - Current directory set to the test directory
    /// - Mirrorer-related environment variables removed
    /// - NO_COLOR set for stable output
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("mirrorer").expect("failed to find mirrorer binary");
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `mirrorer matrix`.
    pub fn matrix(&self) -> Output {
        self.cmd()
            .arg("matrix")
            .output()
            .expect("failed to run mirrorer matrix")
    }

    /// `mirrorer setup` with a token and extra arguments.
    pub fn setup_cmd(&self, token: &str, args: &[&str]) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("setup").args(args).env("GITHUB_TOKEN", token);
        cmd
    }

    /// `mirrorer setup` against a mock API server.
    pub fn setup_against(&self, api_url: &str) -> Command {
        self.setup_cmd(TEST_TOKEN, &["--api-url", api_url])
    }
}

/// Token used for setup runs.
pub const TEST_TOKEN: &str = "ghp_test_token";
