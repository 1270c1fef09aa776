//! Core library components.
//!
//! This module contains the provisioning logic, the hosting-service client,
//! key generation, secret encryption, and configuration handling.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod forge;
pub mod keys;
pub mod matrix;
pub mod provision;
pub mod repos;
pub mod types;
pub mod validation;
