//! Serializes timestamps as `<secs>.<nsecs>` strings.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn serialize<S>(timestamp: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::Error;

    let duration_since_epoch = match timestamp.duration_since(UNIX_EPOCH) {
        Ok(duration_since_epoch) => duration_since_epoch,
        Err(_) => return Err(S::Error::custom("timestamp must be later than UNIX_EPOCH")),
    };

    serializer.serialize_str(&format!(
        "{secs}.{nsecs}",
        secs = duration_since_epoch.as_secs(),
        nsecs = duration_since_epoch.subsec_nanos()
    ))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let s = String::deserialize(deserializer)?;
    let (secs, nsecs) = s
        .split_once('.')
        .ok_or_else(|| D::Error::custom("timestamp must be in the format <secs>.<nsecs>"))?;

    Ok(UNIX_EPOCH
        + Duration::new(
            secs.parse::<u64>().map_err(D::Error::custom)?,
            nsecs.parse::<u32>().map_err(D::Error::custom)?,
        ))
}
