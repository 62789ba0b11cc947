use std::{ops::Deref, str::FromStr};

use serde::{de, Deserialize};

/// Human readable duration like `"500ms"`, `"90s"` or `"1d 2h 3m 4s"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

const UNITS: &[(&str, std::time::Duration)] = &[
    ("ms", std::time::Duration::from_millis(1)),
    ("s", std::time::Duration::from_secs(1)),
    ("m", std::time::Duration::from_secs(60)),
    ("h", std::time::Duration::from_secs(60 * 60)),
    ("d", std::time::Duration::from_secs(24 * 60 * 60)),
];

impl FromStr for Duration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .try_fold(std::time::Duration::ZERO, |total, part| {
                let split = part
                    .find(|c: char| !c.is_ascii_digit())
                    .ok_or_else(|| format!("Missing unit in duration {part:?}"))?;
                let (value, unit) = part.split_at(split);

                let value = value
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid number in duration {part:?}"))?;
                let unit = UNITS
                    .iter()
                    .find_map(|&(name, duration)| (name == unit).then_some(duration))
                    .ok_or_else(|| format!("Unknown unit in duration {part:?}"))?;

                unit.checked_mul(value)
                    .and_then(|duration| total.checked_add(duration))
                    .ok_or_else(|| format!("Duration {s:?} is too long"))
            })
            .map(Self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}
