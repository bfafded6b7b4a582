//! Scripted collaborators shared by the workflow tests.

use std::{cell::RefCell, collections::VecDeque, path::PathBuf, str::FromStr, time::Duration};

use avalanche_types::ids::{self, node};
use chrono::{DateTime, Utc};
use primitive_types::H160;

use crate::{
    errors::{Error, Result},
    gateway::{ValidatorRecord, ValidatorSetGateway},
    network::Network,
    prompt::Prompter,
};

pub const NODE_A: &str = "NodeID-7Xhw2mDxuDS44j42TCB6U5579esbSt3Lg";
pub const NODE_B: &str = "NodeID-MFrZFVCXPv5iCn6M9K6XduxGTYp891xXZ";

/// Answers popped in order; every prompt is recorded.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub lists: RefCell<VecDeque<String>>,
    pub yes_no: RefCell<VecDeque<bool>>,
    pub strings: RefCell<VecDeque<String>>,
    pub numbers: RefCell<VecDeque<u64>>,
    pub durations: RefCell<VecDeque<Duration>>,
    pub dates: RefCell<VecDeque<DateTime<Utc>>>,
    pub node_ids: RefCell<VecDeque<node::Id>>,
    pub weights: RefCell<VecDeque<u64>>,
    pub addresses: RefCell<VecDeque<H160>>,
    pub files: RefCell<VecDeque<PathBuf>>,
    pub asked: RefCell<Vec<String>>,
}

fn next<T>(q: &RefCell<VecDeque<T>>, prompt: &str) -> Result<T> {
    q.borrow_mut()
        .pop_front()
        .ok_or_else(|| Error::Prompt(format!("no scripted answer for {prompt:?}")))
}

impl ScriptedPrompter {
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn record(&self, prompt: &str) {
        self.asked.borrow_mut().push(prompt.to_string());
    }
}

impl Prompter for ScriptedPrompter {
    fn capture_list(&self, prompt: &str, options: &[String]) -> Result<String> {
        self.record(prompt);
        let answer = next(&self.lists, prompt)?;
        assert!(
            options.contains(&answer),
            "{answer:?} is not one of {options:?}"
        );
        Ok(answer)
    }
    fn capture_yes_no(&self, prompt: &str) -> Result<bool> {
        self.record(prompt);
        next(&self.yes_no, prompt)
    }
    fn capture_string(&self, prompt: &str) -> Result<String> {
        self.record(prompt);
        next(&self.strings, prompt)
    }
    fn capture_u64(&self, prompt: &str) -> Result<u64> {
        self.record(prompt);
        next(&self.numbers, prompt)
    }
    fn capture_duration(&self, prompt: &str) -> Result<Duration> {
        self.record(prompt);
        next(&self.durations, prompt)
    }
    fn capture_date(&self, prompt: &str) -> Result<DateTime<Utc>> {
        self.record(prompt);
        next(&self.dates, prompt)
    }
    fn capture_node_id(&self, prompt: &str) -> Result<node::Id> {
        self.record(prompt);
        next(&self.node_ids, prompt)
    }
    fn capture_weight(&self, prompt: &str) -> Result<u64> {
        self.record(prompt);
        next(&self.weights, prompt)
    }
    fn capture_address(&self, prompt: &str) -> Result<H160> {
        self.record(prompt);
        next(&self.addresses, prompt)
    }
    fn capture_existing_file(&self, prompt: &str) -> Result<PathBuf> {
        self.record(prompt);
        next(&self.files, prompt)
    }
}

/// Fixed validator set; counts calls.
pub struct StaticGateway {
    pub validators: Vec<ValidatorRecord>,
    pub calls: RefCell<Vec<(Network, String)>>,
}

impl StaticGateway {
    pub fn new(validators: Vec<ValidatorRecord>) -> Self {
        Self {
            validators,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ValidatorSetGateway for StaticGateway {
    fn get_current_validators(
        &self,
        network: Network,
        subnet_id: &ids::Id,
    ) -> Result<Vec<ValidatorRecord>> {
        self.calls
            .borrow_mut()
            .push((network, subnet_id.to_string()));
        Ok(self.validators.clone())
    }
}

pub fn node(s: &str) -> node::Id {
    node::Id::from_str(s).unwrap()
}
