//! Subnet-EVM configuration generated by "create".
pub mod genesis;
