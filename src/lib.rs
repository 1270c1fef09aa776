//! Mirrorer - provision mirror repositories and their CI credentials.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── setup         # Provision repositories, keys and secrets
//! │   ├── matrix        # Print the CI job matrix
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # Run settings (token, org, coordinator)
//!     ├── repos         # repos.json loading
//!     ├── keys          # ssh-keygen key pairs
//!     ├── cipher/       # Sealed-box secret encryption
//!     ├── forge/        # Hosting-service API (GitHub)
//!     ├── provision     # Per-repository workflow
//!     └── matrix        # Job matrix generation
//! ```
//!
//! # Workflow
//!
//! For every repository in `repos.json`, in name order:
//!
//! 1. Generate a 4096-bit RSA key pair
//! 2. Create `<org>/<name>` if it doesn't exist
//! 3. Register the public key as a writable deploy key
//! 4. Seal the private key and store it as `SSH_KEY_<name>` on the
//!    coordinator repository
//!
//! The first failure aborts the run.

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::config::Settings;
pub use crate::core::matrix::{JobDescriptor, Matrix};
pub use crate::core::repos::Repos;
