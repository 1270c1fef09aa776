//! Setup command.
//!
//! Provisions every repository in the list against the hosting service.

use tracing::info;

use crate::cli::output::{self, Status};
use crate::cli::SetupArgs;
use crate::core::config::Settings;
use crate::core::forge::GitHub;
use crate::core::keys::SshKeygen;
use crate::core::provision::{Event, Outcome, Provisioner};
use crate::core::repos::Repos;
use crate::error::Result;

/// Provision mirrors, deploy keys and secrets.
pub fn execute(args: SetupArgs) -> Result<()> {
    let settings = Settings::new(args.token)?
        .with_api_url(args.api_url)
        .with_organization(args.org)
        .with_coordinator(args.coordinator)
        .with_deploy_key_title(args.key_title)
        .with_skip_provisioned(args.skip_provisioned);
    settings.validate()?;

    let repos = Repos::load(&args.repos)?;
    repos.validate()?;
    if repos.is_empty() {
        output::warn(&format!("no repositories in {}", args.repos.display()));
        return Ok(());
    }

    let forge = GitHub::new(&settings)?;
    let keygen = SshKeygen::new();
    let provisioner = Provisioner::new(&settings, &forge, &keygen);

    output::section("Provisioning");
    output::kv("organization", &settings.organization);
    output::kv("coordinator", &settings.coordinator);
    output::kv("repositories", repos.len());
    println!();

    info!(repos = repos.len(), "starting provisioning");

    let report = provisioner.run(&repos, show_progress)?;

    println!();
    output::success(&format!(
        "provisioned {} of {} repositories ({} created, {} skipped)",
        report.provisioned(),
        repos.len(),
        report.created(),
        report.skipped()
    ));

    info!("provisioning complete");
    Ok(())
}

fn show_progress(event: Event<'_>) {
    match event {
        Event::Started(name) => output::progress(name),
        Event::Failed(_) => output::progress_done(Status::Failed),
        Event::Finished(name, outcome) => match outcome {
            Outcome::Provisioned {
                created_repo,
                fingerprint,
            } => {
                output::progress_done(if *created_repo {
                    Status::Created
                } else {
                    Status::Ok
                });
                output::dimmed(&format!("  {} {}", output::repo(name), fingerprint));
            }
            Outcome::Skipped => output::progress_done(Status::Skipped),
        },
    }
}
