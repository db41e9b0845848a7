//! Scratch-ticket price tiers and the table that says how long each tier's roll is.

use anyhow::{bail, Context};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::warn;

/// Roll length used when a denomination is missing from the configured table.
pub const FALLBACK_ROLL_LENGTH: i64 = 300;

/// A ticket price tier, in whole dollars. Displayed and keyed as `$N`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Denomination(u32);

impl Denomination {
    pub const fn new(price: u32) -> Self {
        Self(price)
    }

    /// The price of a single ticket.
    pub fn price(&self) -> i64 {
        i64::from(self.0)
    }
}

impl Display for Denomination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl FromStr for Denomination {
    type Err = anyhow::Error;

    /// Accepts `$5` or `5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        if digits.is_empty() {
            bail!("A denomination cannot be empty")
        }
        let price = digits
            .parse::<u32>()
            .with_context(|| format!("Invalid denomination '{s}'"))?;
        Ok(Self(price))
    }
}

impl Serialize for Denomination {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Denomination {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Denomination::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// How the sold count is derived when the close reading is below the open reading, i.e. the
/// counter passed the end of the roll and restarted.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapRule {
    /// `roll_length - (open - close)`: the rest of the old roll was sold plus the start of a new
    /// one.
    #[default]
    Remainder,
    /// `roll_length - (roll_length - open + close)`, which reduces to `open - close`. This
    /// reproduces the arithmetic the store once used for its lowest tier and has the opposite
    /// sign to `Remainder` for the same wrap.
    Reversed,
}

serde_plain::derive_display_from_serialize!(WrapRule);
serde_plain::derive_fromstr_from_deserialize!(WrapRule);

/// One row of the denomination table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DenominationSpec {
    pub denomination: Denomination,
    /// Number of tickets on a roll before the counter restarts.
    pub roll_length: i64,
    #[serde(default)]
    pub wrap: WrapRule,
}

impl DenominationSpec {
    pub const fn new(denomination: Denomination, roll_length: i64) -> Self {
        Self {
            denomination,
            roll_length,
            wrap: WrapRule::Remainder,
        }
    }

    pub const fn with_wrap(self, wrap: WrapRule) -> Self {
        Self {
            denomination: self.denomination,
            roll_length: self.roll_length,
            wrap,
        }
    }
}

/// The denomination table: which tiers exist, their roll lengths and wrap rules.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denominations(Vec<DenominationSpec>);

impl Default for Denominations {
    fn default() -> Self {
        let spec = |price, roll_length| DenominationSpec::new(Denomination::new(price), roll_length);
        Self(vec![
            spec(1, 300),
            spec(2, 150),
            spec(3, 60),
            spec(5, 60),
            spec(10, 60),
            spec(20, 30),
            spec(30, 30),
            spec(50, 30),
        ])
    }
}

impl Denominations {
    pub fn new(specs: Vec<DenominationSpec>) -> Self {
        Self(specs)
    }

    /// Returns the configured spec for `denomination`. A tier missing from the table is not an
    /// error; it gets `FALLBACK_ROLL_LENGTH` and the `Remainder` rule.
    pub fn spec_for(&self, denomination: Denomination) -> DenominationSpec {
        match self.0.iter().find(|s| s.denomination == denomination) {
            Some(spec) => *spec,
            None => {
                warn!(
                    "Denomination {denomination} is not configured, using a roll length of \
                    {FALLBACK_ROLL_LENGTH}"
                );
                DenominationSpec::new(denomination, FALLBACK_ROLL_LENGTH)
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DenominationSpec> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_denomination() {
        assert_eq!(Denomination::from_str("$5").unwrap(), Denomination::new(5));
        assert_eq!(Denomination::from_str(" 20 ").unwrap(), Denomination::new(20));
        assert!(Denomination::from_str("$").is_err());
        assert!(Denomination::from_str("five").is_err());
        assert!(Denomination::from_str("-1").is_err());
    }

    #[test]
    fn test_denomination_display() {
        assert_eq!(Denomination::new(10).to_string(), "$10");
    }

    #[test]
    fn test_default_table_roll_lengths() {
        let table = Denominations::default();
        let roll = |p| table.spec_for(Denomination::new(p)).roll_length;
        assert_eq!(roll(1), 300);
        assert_eq!(roll(2), 150);
        assert_eq!(roll(3), 60);
        assert_eq!(roll(5), 60);
        assert_eq!(roll(10), 60);
        assert_eq!(roll(20), 30);
        assert_eq!(roll(30), 30);
        assert_eq!(roll(50), 30);
        assert!(table.iter().all(|s| s.wrap == WrapRule::Remainder));
    }

    #[test]
    fn test_unknown_denomination_falls_back() {
        let table = Denominations::default();
        let spec = table.spec_for(Denomination::new(7));
        assert_eq!(spec.roll_length, FALLBACK_ROLL_LENGTH);
        assert_eq!(spec.wrap, WrapRule::Remainder);
        assert!(table.iter().all(|s| s.denomination != Denomination::new(7)));
    }

    #[test]
    fn test_table_serde() {
        let json = r#"[{"denomination": "$2", "roll_length": 150, "wrap": "reversed"},
                       {"denomination": "$5", "roll_length": 60}]"#;
        let table: Denominations = serde_json::from_str(json).unwrap();
        let two = table.spec_for(Denomination::new(2));
        assert_eq!(two.wrap, WrapRule::Reversed);
        assert_eq!(table.spec_for(Denomination::new(5)).wrap, WrapRule::Remainder);
    }
}
