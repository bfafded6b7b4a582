use std::time::Duration;

/// Default directory name under the home directory.
pub const BASE_DIR_NAME: &str = ".avalanche-cli";

pub const KEY_DIR: &str = "key";
pub const KEY_SUFFIX: &str = ".pk";

pub const VM_DIR: &str = "vms";

pub const GENESIS_SUFFIX: &str = "_genesis.json";
pub const SIDECAR_SUFFIX: &str = "_sidecar.json";

/// Rendering and parsing layout for all operator-facing timestamps (UTC).
pub const TIME_PARSE_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

pub const MIN_STAKE_WEIGHT: i64 = 1;
pub const DEFAULT_STAKE_WEIGHT: i64 = 20;
pub const MAX_STAKE_WEIGHT: i64 = 100;

/// Start time offered as the default ("Start in five minutes").
pub const STAKING_START_LEAD_TIME: Duration = Duration::from_secs(5 * 60);

/// Explicit start times must be at least this far in the future.
pub const STAKING_MINIMUM_LEAD_TIME: Duration = Duration::from_secs(25);

/// Deadline for each remote read or transaction submission.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(3 * 60);

pub const FUJI_API_ENDPOINT: &str = "https://api.avax-test.network";
pub const MAINNET_API_ENDPOINT: &str = "https://api.avax.network";

/// ref. <https://github.com/ava-labs/subnet-evm/blob/master/networks/11111/genesis.json>
pub const EWOQ_ADDRESS: &str = "0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC";
