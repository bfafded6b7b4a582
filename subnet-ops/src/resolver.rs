//! Resolves when a validator starts validating and for how long.
//!
//! Each of the two choices has a flag fast path (for scripting) and a guided
//! prompt path. The "until expires" duration asks the P-chain when the node's
//! primary network validation ends, since a subnet validator cannot outlive it.

use std::time::Duration;

use avalanche_types::ids::node;
use chrono::{DateTime, Utc};
use log::info;

use crate::{
    constants::STAKING_START_LEAD_TIME,
    errors::{Error, Result},
    gateway::{self, ValidatorSetGateway},
    network::Network,
    prompt::Prompter,
    timefmt, ux, validate,
};

pub const DEFAULT_START_OPTION: &str = "Start in five minutes";
pub const DEFAULT_DURATION_OPTION: &str = "Until primary network validator expires";
pub const CUSTOM_OPTION: &str = "Custom";

/// When and for how long a validator validates.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ValidationWindow {
    pub start: DateTime<Utc>,
    pub duration: Duration,
}

impl ValidationWindow {
    pub fn end(&self) -> Result<DateTime<Utc>> {
        timefmt::add(&self.start, self.duration)
    }
}

/// Time-related inputs given as flags; "None" falls back to prompts.
#[derive(Debug, Clone, Default)]
pub struct TimeFlags {
    pub start_time: Option<String>,
    pub staking_period: Option<Duration>,
}

pub struct Resolver<'a> {
    prompter: &'a dyn Prompter,
    gateway: &'a dyn ValidatorSetGateway,
    now: DateTime<Utc>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        prompter: &'a dyn Prompter,
        gateway: &'a dyn ValidatorSetGateway,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            prompter,
            gateway,
            now,
        }
    }

    pub fn resolve(
        &self,
        flags: &TimeFlags,
        network: Network,
        node_id: &node::Id,
    ) -> Result<ValidationWindow> {
        let start = self.resolve_start(flags.start_time.as_deref())?;
        let duration = self.resolve_duration(flags.staking_period, network, node_id, &start)?;
        Ok(ValidationWindow { start, duration })
    }

    pub fn resolve_start(&self, flag: Option<&str>) -> Result<DateTime<Utc>> {
        if let Some(s) = flag.filter(|s| !s.trim().is_empty()) {
            let start = timefmt::parse(s)?;
            validate::start_time(&start, &self.now)?;
            return Ok(start);
        }

        ux::print_notice(
            "When should your validator start validating?\nIf your validator is not ready by this time, subnet downtime can occur.",
        )?;
        let options = [DEFAULT_START_OPTION.to_string(), CUSTOM_OPTION.to_string()];
        let selected = self.prompter.capture_list("Start time", &options)?;
        if selected == DEFAULT_START_OPTION {
            return timefmt::add(&self.now, STAKING_START_LEAD_TIME);
        }

        let start = self.prompter.capture_date(
            "When should the validator start validating? Enter a UTC datetime in 'YYYY-MM-DD HH:MM:SS' format",
        )?;
        validate::start_time(&start, &self.now)?;
        Ok(start)
    }

    pub fn resolve_duration(
        &self,
        flag: Option<Duration>,
        network: Network,
        node_id: &node::Id,
        start: &DateTime<Utc>,
    ) -> Result<Duration> {
        if let Some(d) = flag.filter(|d| !d.is_zero()) {
            return Ok(d);
        }

        let options = [
            DEFAULT_DURATION_OPTION.to_string(),
            CUSTOM_OPTION.to_string(),
        ];
        let selected = self
            .prompter
            .capture_list("How long should your validator validate for?", &options)?;
        if selected == DEFAULT_DURATION_OPTION {
            return max_validation_time(self.gateway, network, node_id, start);
        }
        confirm_duration(self.prompter, start)
    }
}

/// Time left from "start" until the node stops validating the primary network.
pub fn max_validation_time(
    gateway: &dyn ValidatorSetGateway,
    network: Network,
    node_id: &node::Id,
    start: &DateTime<Utc>,
) -> Result<Duration> {
    let validators = gateway.get_current_validators(network, &gateway::primary_network_id())?;
    let record = validators
        .iter()
        .find(|v| v.node_id == *node_id)
        .ok_or_else(|| Error::NodeNotFound(node_id.to_string()))?;

    let end = timefmt::from_unix(record.end_time)?;
    info!(
        "{node_id} validates the primary network until {}",
        timefmt::format(&end)
    );
    let secs = end.timestamp() - start.timestamp();
    if secs <= 0 {
        return Err(Error::InvalidDuration(format!(
            "{node_id} stops validating the primary network at {}, before the start time {}",
            timefmt::format(&end),
            timefmt::format(start)
        )));
    }
    Ok(Duration::from_secs(secs as u64))
}

/// States of the custom-duration confirmation loop. Confirmation is the only
/// way to reach "Resolved".
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConfirmState {
    AwaitingCandidate,
    AwaitingConfirmation(Duration),
    Resolved(Duration),
}

/// Asks for a duration and the operator's sign-off on the resulting end
/// time until they confirm.
pub fn confirm_duration(prompter: &dyn Prompter, start: &DateTime<Utc>) -> Result<Duration> {
    let mut state = ConfirmState::AwaitingCandidate;
    loop {
        state = match state {
            ConfirmState::AwaitingCandidate => {
                let d = prompter.capture_duration(
                    "How long should this validator be validating? Enter a duration, e.g. 8760h",
                )?;
                ConfirmState::AwaitingConfirmation(d)
            }
            ConfirmState::AwaitingConfirmation(d) => {
                let end = timefmt::add(start, d)?;
                let yes = prompter.capture_yes_no(&format!(
                    "Your validator will finish staking by {}",
                    timefmt::format(&end)
                ))?;
                if yes {
                    ConfirmState::Resolved(d)
                } else {
                    ConfirmState::AwaitingCandidate
                }
            }
            ConfirmState::Resolved(d) => return Ok(d),
        };
    }
}
