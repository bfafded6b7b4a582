use std::{path::PathBuf, str::FromStr, time::Duration};

use avalanche_types::ids::node;
use chrono::{DateTime, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use primitive_types::H160;

use crate::{
    errors::{Error, Result},
    timefmt, validate,
};

/// Interactive input, abstracted so the workflows can run against scripted
/// answers in tests.
pub trait Prompter {
    /// Returns the selected option verbatim.
    fn capture_list(&self, prompt: &str, options: &[String]) -> Result<String>;
    fn capture_yes_no(&self, prompt: &str) -> Result<bool>;
    fn capture_string(&self, prompt: &str) -> Result<String>;
    fn capture_u64(&self, prompt: &str) -> Result<u64>;
    /// Non-zero Go-style duration (e.g., "8760h").
    fn capture_duration(&self, prompt: &str) -> Result<Duration>;
    /// UTC datetime in "YYYY-MM-DD HH:MM:SS" layout.
    fn capture_date(&self, prompt: &str) -> Result<DateTime<Utc>>;
    fn capture_node_id(&self, prompt: &str) -> Result<node::Id>;
    fn capture_weight(&self, prompt: &str) -> Result<u64>;
    /// 20-byte hex address with or without "0x".
    fn capture_address(&self, prompt: &str) -> Result<H160>;
    fn capture_existing_file(&self, prompt: &str) -> Result<PathBuf>;
}

/// Terminal prompts; invalid answers are re-asked in place.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn input_with<F>(&self, prompt: &str, mut check: F) -> Result<String>
    where
        F: FnMut(&str) -> Result<()>,
    {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|s: &String| -> std::result::Result<(), String> {
                check(s.trim()).map_err(|e| e.to_string())
            })
            .interact_text()
            .map(|s| s.trim().to_string())
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}

impl Prompter for DialoguerPrompter {
    fn capture_list(&self, prompt: &str, options: &[String]) -> Result<String> {
        if options.is_empty() {
            return Err(Error::Prompt(format!("no options to choose from for {prompt:?}")));
        }
        let selected = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))?;
        Ok(options[selected].clone())
    }

    fn capture_yes_no(&self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn capture_string(&self, prompt: &str) -> Result<String> {
        self.input_with(prompt, |s| {
            if s.is_empty() {
                return Err(Error::Prompt(String::from("value cannot be empty")));
            }
            Ok(())
        })
    }

    fn capture_u64(&self, prompt: &str) -> Result<u64> {
        let s = self.input_with(prompt, |s| {
            s.parse::<u64>()
                .map(|_| ())
                .map_err(|e| Error::parse("number", s, e))
        })?;
        s.parse::<u64>().map_err(|e| Error::parse("number", &s, e))
    }

    fn capture_duration(&self, prompt: &str) -> Result<Duration> {
        let s = self.input_with(prompt, |s| {
            let d = timefmt::parse_duration(s)?;
            if d.is_zero() {
                return Err(Error::InvalidDuration(String::from("must be greater than zero")));
            }
            Ok(())
        })?;
        timefmt::parse_duration(&s)
    }

    fn capture_date(&self, prompt: &str) -> Result<DateTime<Utc>> {
        let s = self.input_with(prompt, |s| {
            let t = timefmt::parse(s)?;
            validate::start_time(&t, &Utc::now())
        })?;
        timefmt::parse(&s)
    }

    fn capture_node_id(&self, prompt: &str) -> Result<node::Id> {
        let s = self.input_with(prompt, |s| {
            node::Id::from_str(s)
                .map(|_| ())
                .map_err(|e| Error::parse("node ID", s, e))
        })?;
        node::Id::from_str(&s).map_err(|e| Error::parse("node ID", &s, e))
    }

    fn capture_weight(&self, prompt: &str) -> Result<u64> {
        let check = |s: &str| -> Result<i64> {
            let w = s.parse::<i64>().map_err(|e| Error::parse("weight", s, e))?;
            validate::stake_weight(w)?;
            Ok(w)
        };
        let s = self.input_with(prompt, |s| check(s).map(|_| ()))?;
        Ok(check(&s)? as u64)
    }

    fn capture_address(&self, prompt: &str) -> Result<H160> {
        let s = self.input_with(prompt, |s| parse_address(s).map(|_| ()))?;
        parse_address(&s)
    }

    fn capture_existing_file(&self, prompt: &str) -> Result<PathBuf> {
        let s = self.input_with(prompt, |s| {
            if !PathBuf::from(s).is_file() {
                return Err(Error::Prompt(format!("file '{s}' does not exist")));
            }
            Ok(())
        })?;
        Ok(PathBuf::from(s))
    }
}

pub fn parse_address(s: &str) -> Result<H160> {
    let hex = s.trim().trim_start_matches("0x");
    if hex.len() != 40 {
        return Err(Error::parse("address", s, "expected 20 bytes in hex"));
    }
    H160::from_str(hex).map_err(|e| Error::parse("address", s, e))
}

#[test]
fn test_parse_address() {
    let addr = parse_address("0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC").unwrap();
    assert_eq!(
        format!("{:x}", addr),
        "8db97c7cece249c2b98bdc0226cc4c2a57bf52fc"
    );
    assert!(parse_address("8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC").is_ok());
    assert!(parse_address("0x1234").is_err());
    assert!(parse_address("0xZZb97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC").is_err());
}
