//! Type aliases for domain concepts.

/// A destination repository name (e.g., dune-common).
///
/// Unique within the repository list.
pub type RepoName = String;

/// Source URL a repository mirrors. Opaque to this tool.
pub type SourceUrl = String;

/// A coordinator secret name (e.g., SSH_KEY_dune_common).
pub type SecretName = String;

/// An OpenSSH public key line (`ssh-rsa AAAA... comment`).
pub type PublicKey = String;
