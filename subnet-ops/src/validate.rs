//! Input checks run before anything touches the network.

use chrono::{DateTime, Utc};

use crate::{
    constants::{MAX_STAKE_WEIGHT, MIN_STAKE_WEIGHT, STAKING_MINIMUM_LEAD_TIME},
    errors::{Error, Result},
};

pub fn stake_weight(w: i64) -> Result<()> {
    if !(MIN_STAKE_WEIGHT..=MAX_STAKE_WEIGHT).contains(&w) {
        return Err(Error::InvalidWeight(w));
    }
    Ok(())
}

/// Same rule the P-chain applies to chain names in "CreateChainTx":
/// ASCII letters, ASCII digits and spaces only.
pub fn subnet_name(name: &str) -> Result<()> {
    if name
        .chars()
        .any(|c| !c.is_ascii() || !(c.is_ascii_alphanumeric() || c == ' '))
    {
        return Err(Error::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Fails if "t" is earlier than "now" plus the minimum staking lead time.
pub fn start_time(t: &DateTime<Utc>, now: &DateTime<Utc>) -> Result<()> {
    let lead = chrono::Duration::seconds(STAKING_MINIMUM_LEAD_TIME.as_secs() as i64);
    if *t < *now + lead {
        return Err(Error::TooSoon {
            lead: STAKING_MINIMUM_LEAD_TIME,
        });
    }
    Ok(())
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- validate::test_stake_weight --exact --show-output
#[test]
fn test_stake_weight() {
    for w in [i64::MIN, -1, 0, 101, 1000, i64::MAX] {
        assert!(
            matches!(stake_weight(w), Err(Error::InvalidWeight(got)) if got == w),
            "weight {w} should be rejected"
        );
    }
    for w in MIN_STAKE_WEIGHT..=MAX_STAKE_WEIGHT {
        assert!(stake_weight(w).is_ok(), "weight {w} should be accepted");
    }
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- validate::test_subnet_name --exact --show-output
#[test]
fn test_subnet_name() {
    for name in ["mysubnet", "My Subnet 2", "123", "", "a b c"] {
        assert!(subnet_name(name).is_ok(), "{name:?} should be accepted");
    }
    for name in [
        "my-subnet",
        "my_subnet",
        "subnet!",
        "subnét",
        "サブネット",
        "tab\there",
        "new\nline",
        "dot.",
    ] {
        assert!(
            matches!(subnet_name(name), Err(Error::InvalidName { .. })),
            "{name:?} should be rejected"
        );
    }
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- validate::test_start_time --exact --show-output
#[test]
fn test_start_time() {
    use chrono::TimeZone;

    let now = Utc.timestamp_opt(1690000000, 0).unwrap();
    let lead = STAKING_MINIMUM_LEAD_TIME.as_secs() as i64;

    let boundary = Utc.timestamp_opt(1690000000 + lead, 0).unwrap();
    assert!(start_time(&boundary, &now).is_ok());

    let later = Utc.timestamp_opt(1690000000 + lead + 3600, 0).unwrap();
    assert!(start_time(&later, &now).is_ok());

    let just_short = Utc.timestamp_opt(1690000000 + lead - 1, 0).unwrap();
    assert!(matches!(
        start_time(&just_short, &now),
        Err(Error::TooSoon { .. })
    ));

    let past = Utc.timestamp_opt(1680000000, 0).unwrap();
    assert!(matches!(start_time(&past, &now), Err(Error::TooSoon { .. })));
}
