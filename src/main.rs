use std::path::PathBuf;

use color_eyre::eyre::{eyre, WrapErr};
use log::{error, info, warn};
use structopt::StructOpt;

use crate::config::Target;
use crate::error::Error;
use crate::hetzner::{Client, UpdateRecord};
use crate::public_ip::{PublicAddrs, Resolver};

mod config;
mod error;
mod hetzner;
mod public_ip;

const RUST_BACKTRACE: &str = "RUST_BACKTRACE";

/// Published TTL. Short, so address changes propagate quickly.
const RECORD_TTL: u64 = 60;

#[derive(StructOpt, Debug)]
pub(crate) struct HetznerDynDns {
    /// Path to the configuration file
    #[structopt(short = "c", parse(from_os_str))]
    config: PathBuf,
}

fn main() -> color_eyre::Result<()> {
    if std::env::var_os(RUST_BACKTRACE).is_none() {
        std::env::set_var(RUST_BACKTRACE, "1");
    }

    let args: HetznerDynDns = HetznerDynDns::from_args();

    color_eyre::install()?;
    stderrlog::new()
        .verbosity(2)
        .init()
        .wrap_err("Failed to initialize logging")?;

    let config = config::load(&args.config).wrap_err("Failed to load configuration")?;
    if config.targets.is_empty() {
        warn!("No targets configured, nothing to update");
        return Ok(());
    }

    let addrs = Resolver::new()
        .resolve()
        .wrap_err("Failed to determine the public IP address")?;

    let client = Client::new(&config.api_token, &config.api_url);

    let failures = update_targets(&client, &config.targets, &addrs);
    if failures.is_empty() {
        return Ok(());
    }
    for (target, err) in &failures {
        error!("{}.{}: {}", target.record, target.zone, err);
    }
    Err(eyre!(
        "{} of {} target(s) failed to update",
        failures.len(),
        config.targets.len()
    ))
}

/// Updates every target in configuration order. A failing target does not
/// abort the run; its error is collected and the remaining targets still get
/// their update.
fn update_targets<'t>(
    client: &Client,
    targets: &'t [Target],
    addrs: &PublicAddrs,
) -> Vec<(&'t Target, Error)> {
    let mut failures = Vec::new();
    for target in targets {
        info!("Processing target {}.{}", target.record, target.zone);
        if let Err(e) = update_target(client, target, addrs) {
            failures.push((target, e));
        }
    }
    failures
}

fn update_target(client: &Client, target: &Target, addrs: &PublicAddrs) -> Result<(), Error> {
    let zone = client.find_zone(&target.zone)?;
    let records = client.list_records(&zone.id)?;

    for record in records.into_iter().filter(|r| r.name == target.record) {
        let value = match record.record_type.as_str() {
            "A" => match addrs.v4 {
                Some(ip) => ip.to_string(),
                None => {
                    warn!(
                        "Skipping A record {} in {}, host has no IPv4 connectivity",
                        record.name, target.zone
                    );
                    continue;
                }
            },
            "AAAA" => match addrs.v6 {
                Some(ip) => ip.to_string(),
                None => {
                    warn!(
                        "Skipping AAAA record {} in {}, host has no IPv6 connectivity",
                        record.name, target.zone
                    );
                    continue;
                }
            },
            _ => continue,
        };

        info!(
            "Updating {} record {} in {} from {} to {}",
            record.record_type, record.name, target.zone, record.value, value
        );
        client.update_record(
            &record.id,
            &UpdateRecord {
                name: record.name,
                ttl: RECORD_TTL,
                record_type: record.record_type,
                value,
                zone_id: record.zone_id,
            },
        )?;
    }

    Ok(())
}
