//! Matrix command - print the CI job matrix.

use std::path::Path;

use crate::core::matrix::Matrix;
use crate::core::repos::Repos;
use crate::error::Result;

/// Print the job matrix for `repos` as one JSON document on stdout.
pub fn execute(repos: &Path, pretty: bool) -> Result<()> {
    let repos = Repos::load(repos)?;
    let matrix = Matrix::from_repos(&repos);

    let json = if pretty {
        matrix.to_json_pretty()?
    } else {
        matrix.to_json()?
    };
    println!("{}", json);

    Ok(())
}
