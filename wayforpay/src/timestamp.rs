//! Unix timestamps for order dates and callback acknowledgements.
//!
//! The gateway exchanges times as whole seconds since the Unix epoch, encoded
//! as bare JSON integers, and signs them in their decimal form.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{Duration, SystemTime};

/// Seconds since the Unix epoch (1970-01-01T00:00:00Z).
///
/// Zero is the "unset" value: a draft whose order date was never set carries
/// `UnixTimestamp::default()` and fails validation.
///
/// ```json
/// 1699999999
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnixTimestamp(u64);

impl Display for UnixTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SystemTime> for UnixTimestamp {
    /// Truncates to whole seconds. Times before the epoch map to zero.
    fn from(time: SystemTime) -> Self {
        let secs = time
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self(secs)
    }
}

impl From<UnixTimestamp> for SystemTime {
    fn from(ts: UnixTimestamp) -> Self {
        Self::UNIX_EPOCH + Duration::from_secs(ts.0)
    }
}

impl UnixTimestamp {
    /// Creates a new [`UnixTimestamp`] from a raw seconds value.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the current system time as a [`UnixTimestamp`].
    #[must_use]
    pub fn now() -> Self {
        SystemTime::now().into()
    }

    /// Returns the timestamp as raw seconds since the Unix epoch.
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Returns `true` if this is the zero "unset" value.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_integer() {
        let ts = UnixTimestamp::from_secs(123_456_789);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "123456789");
        let back: UnixTimestamp = serde_json::from_str("123456789").unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_from_system_time_truncates() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(UnixTimestamp::from(time).as_secs(), 1);
    }

    #[test]
    fn test_pre_epoch_is_unset() {
        let time = SystemTime::UNIX_EPOCH - Duration::from_secs(10);
        assert!(UnixTimestamp::from(time).is_unset());
        assert!(UnixTimestamp::default().is_unset());
        assert!(!UnixTimestamp::now().is_unset());
    }
}
