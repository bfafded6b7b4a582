//! Subnet configuration and validator onboarding workflows.
pub mod add_validator;
pub mod app;
pub mod constants;
pub mod create;
pub mod deployer;
pub mod errors;
pub mod gateway;
pub mod network;
pub mod prompt;
pub mod resolver;
pub mod sidecar;
pub mod subnet_evm;
#[cfg(test)]
mod testutil;
pub mod timefmt;
pub mod ux;
pub mod validate;
