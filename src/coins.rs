//! Token amounts in `<amount><denom>` notation.
//!
//! Parsing is normalizing: fractional amounts are truncated, zero entries are
//! dropped and the result is sorted by denom.
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

const DENOM_PATTERN: &str = r"[a-zA-Z][a-zA-Z0-9/:._-]{2,127}";

fn coin_regex() -> &'static Regex {
    static COIN: OnceLock<Regex> = OnceLock::new();
    COIN.get_or_init(|| {
        Regex::new(&format!(r"^([0-9]+)(?:\.([0-9]+))?({DENOM_PATTERN})$"))
            .expect("coin pattern compiles")
    })
}

/// A single denom/amount pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "amount_string")]
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Parse exactly one `<amount><denom>` entry.
    pub fn parse(text: &str) -> Result<Self> {
        parse_entry(text.trim(), text)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A normalized set of coins, unique per denom and sorted by denom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Parse a comma- or whitespace-separated list of coins.
    pub fn parse(text: &str) -> Result<Self> {
        let mut by_denom: BTreeMap<String, u128> = BTreeMap::new();
        let entries = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|entry| !entry.is_empty());
        for entry in entries {
            let coin = parse_entry(entry, text)?;
            if by_denom.contains_key(&coin.denom) {
                return Err(Error::InvalidAmount {
                    input: text.to_string(),
                    reason: format!("duplicate denomination {}", coin.denom),
                });
            }
            by_denom.insert(coin.denom, coin.amount);
        }
        Ok(Self::from_map(by_denom))
    }

    /// Build a normalized set from arbitrary coins, summing duplicates.
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Self {
        let mut by_denom: BTreeMap<String, u128> = BTreeMap::new();
        for coin in coins {
            let slot = by_denom.entry(coin.denom).or_default();
            *slot = slot.saturating_add(coin.amount);
        }
        Self::from_map(by_denom)
    }

    fn from_map(by_denom: BTreeMap<String, u128>) -> Self {
        Self(
            by_denom
                .into_iter()
                .filter(|(_, amount)| *amount > 0)
                .map(|(denom, amount)| Coin { denom, amount })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .find(|coin| coin.denom == denom)
            .map(|coin| coin.amount)
            .unwrap_or(0)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Coin::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

impl Serialize for Coins {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let coins = Vec::<Coin>::deserialize(deserializer)?;
        Ok(Coins::from_coins(coins))
    }
}

fn parse_entry(entry: &str, input: &str) -> Result<Coin> {
    let invalid = |reason: String| Error::InvalidAmount {
        input: input.to_string(),
        reason,
    };
    let captures = coin_regex()
        .captures(entry)
        .ok_or_else(|| invalid(format!("{entry:?} is not <amount><denom>")))?;
    let amount: u128 = captures[1]
        .parse()
        .map_err(|_| invalid(format!("amount in {entry:?} is out of range")))?;
    Ok(Coin {
        denom: captures[3].to_string(),
        amount,
    })
}

/// Cosmos REST encodes integer amounts as strings.
mod amount_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
