//! Serde support for `Duration` fields written as humantime strings
//! (`"250ms"`, `"10s"`, `"1m 30s"`).
//!
//! ```ignore
//! #[serde(with = "crate::humantime_serde")]
//! timeout: Duration,
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct V;

    impl de::Visitor<'_> for V {
        type Value = Duration;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a duration such as \"250ms\" or \"10s\"")
        }

        fn visit_str<E>(self, v: &str) -> Result<Duration, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    d.deserialize_str(V)
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature fixed by serde `with`
pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&humantime::format_duration(*d))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Timeout {
        #[serde(with = "super")]
        value: Duration,
    }

    #[test]
    fn parses_and_formats() {
        let t: Timeout = serde_json::from_str(r#"{"value": "1m 30s"}"#).expect("parses");
        assert_eq!(t.value, Duration::from_secs(90));

        let json = serde_json::to_string(&Timeout {
            value: Duration::from_millis(250),
        })
        .expect("serializes");
        assert_eq!(json, r#"{"value":"250ms"}"#);
    }

    #[test]
    fn rejects_garbage() {
        let err = serde_json::from_str::<Timeout>(r#"{"value": "soon"}"#).expect_err("invalid");
        assert!(err.to_string().contains("soon"));
    }
}
