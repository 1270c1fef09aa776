//! Constants used throughout mirrorer.
//!
//! Centralizes magic strings and default configuration values.

/// Repository list file name (repos.json).
pub const REPOS_FILE: &str = "repos.json";

/// Default hosting-service API base URL.
pub const API_URL: &str = "https://api.github.com";

/// Organization that owns the mirror repositories.
pub const ORGANIZATION: &str = "dune-mirrors";

/// Repository whose CI runs the mirroring jobs and holds the secrets.
pub const COORDINATOR: &str = "dune-mirrors/mirrorer";

/// Title given to every deploy key this tool registers.
pub const DEPLOY_KEY_TITLE: &str = "Mirror Deploy Key";

/// Prefix of the per-repository secret name.
pub const SECRET_PREFIX: &str = "SSH_KEY_";

/// External key generator.
pub const SSH_KEYGEN: &str = "ssh-keygen";

/// RSA modulus size for generated deploy keys.
pub const KEY_BITS: u32 = 4096;

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "MIRRORER_LOG";
