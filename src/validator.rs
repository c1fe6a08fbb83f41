//! Validator onboarding.
//!
//! Display fields and self-delegation come from options; the staking amount
//! and commission terms are asked interactively from a fixed descriptor
//! table.
use crate::coins::Coin;
use crate::error::Result;
use crate::prompt::{ask_all, Prompter, Question};
use serde::Serialize;

/// Default signing account name.
pub const DEFAULT_ACCOUNT: &str = "default";

/// Validator settings supplied up front. `None` means unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub account: String,
    pub moniker: Option<String>,
    pub website: Option<String>,
    pub details: Option<String>,
    pub identity: Option<String>,
    pub security_contact: Option<String>,
    pub min_self_delegation: Option<String>,
    pub gas_price: Option<String>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            account: DEFAULT_ACCOUNT.to_string(),
            moniker: None,
            website: None,
            details: None,
            identity: None,
            security_contact: None,
            min_self_delegation: None,
            gas_price: None,
        }
    }
}

/// Everything needed to generate a gentx for one validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidatorProfile {
    pub account: String,
    pub moniker: Option<String>,
    pub website: Option<String>,
    pub details: Option<String>,
    pub identity: Option<String>,
    pub security_contact: Option<String>,
    pub min_self_delegation: Option<String>,
    pub gas_price: String,
    pub staking_amount: String,
    pub commission_rate: String,
    pub commission_max_rate: String,
    pub commission_max_change_rate: String,
}

struct Field {
    label: &'static str,
    default: Option<&'static str>,
    assign: fn(&mut ValidatorProfile, String),
}

const FIELDS: [Field; 4] = [
    Field {
        label: "Staking amount",
        default: None,
        assign: |profile, value| profile.staking_amount = value,
    },
    Field {
        label: "Commission rate",
        default: Some("0.10"),
        assign: |profile, value| profile.commission_rate = value,
    },
    Field {
        label: "Commission max rate",
        default: Some("0.20"),
        assign: |profile, value| profile.commission_max_rate = value,
    },
    Field {
        label: "Commission max change rate",
        default: Some("0.01"),
        assign: |profile, value| profile.commission_max_change_rate = value,
    },
];

/// Questions asked during onboarding, in order.
pub fn questions() -> Vec<Question> {
    FIELDS
        .iter()
        .map(|field| {
            let question = Question::new(field.label).required();
            match field.default {
                Some(default) => question.default_answer(default),
                None => question,
            }
        })
        .collect()
}

/// Collect a validator profile, asking for the staking amount and commission.
pub fn collect_validator(
    prompter: &dyn Prompter,
    options: &ValidatorOptions,
    stake_denom: &str,
) -> Result<ValidatorProfile> {
    let mut profile = ValidatorProfile {
        account: options.account.clone(),
        moniker: options.moniker.clone(),
        website: options.website.clone(),
        details: options.details.clone(),
        identity: options.identity.clone(),
        security_contact: options.security_contact.clone(),
        min_self_delegation: options.min_self_delegation.clone(),
        gas_price: options
            .gas_price
            .clone()
            .unwrap_or_else(|| format!("0{stake_denom}")),
        ..ValidatorProfile::default()
    };

    let answers = ask_all(prompter, &questions())?;
    for (field, answer) in FIELDS.iter().zip(answers) {
        (field.assign)(&mut profile, answer);
    }

    let stake = Coin::parse(&profile.staking_amount)?;
    if stake.denom != stake_denom {
        tracing::warn!(
            staking_denom = %stake.denom,
            stake_denom,
            "staking amount does not use the genesis stake denom"
        );
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use std::cell::RefCell;

    struct Answers {
        answers: RefCell<Vec<&'static str>>,
        asked: RefCell<Vec<String>>,
    }

    impl Answers {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().rev().copied().collect()),
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl Prompter for Answers {
        fn confirm(&self, _label: &str) -> Result<bool> {
            Ok(true)
        }

        fn ask(&self, question: &Question) -> Result<String> {
            self.asked.borrow_mut().push(question.label.clone());
            Ok(self.answers.borrow_mut().pop().unwrap_or_default().to_string())
        }
    }

    #[test]
    fn commission_defaults_apply_and_gas_price_is_derived() {
        let prompter = Answers::new(&["50000000stake"]);
        let options = ValidatorOptions {
            account: "alice".to_string(),
            website: Some("https://alice.example".to_string()),
            ..ValidatorOptions::default()
        };
        let profile = collect_validator(&prompter, &options, "stake").unwrap();
        assert_eq!(profile.account, "alice");
        assert_eq!(profile.staking_amount, "50000000stake");
        assert_eq!(profile.commission_rate, "0.10");
        assert_eq!(profile.commission_max_rate, "0.20");
        assert_eq!(profile.commission_max_change_rate, "0.01");
        assert_eq!(profile.gas_price, "0stake");
        assert_eq!(profile.website.as_deref(), Some("https://alice.example"));
        assert_eq!(
            *prompter.asked.borrow(),
            vec![
                "Staking amount",
                "Commission rate",
                "Commission max rate",
                "Commission max change rate"
            ]
        );
    }

    #[test]
    fn explicit_gas_price_wins() {
        let prompter = Answers::new(&["1stake", "0.05", "0.5", "0.02"]);
        let options = ValidatorOptions {
            gas_price: Some("0.025uatom".to_string()),
            ..ValidatorOptions::default()
        };
        let profile = collect_validator(&prompter, &options, "stake").unwrap();
        assert_eq!(profile.gas_price, "0.025uatom");
        assert_eq!(profile.commission_rate, "0.05");
        assert_eq!(profile.commission_max_change_rate, "0.02");
    }

    #[test]
    fn missing_staking_amount_is_incomplete_input() {
        let prompter = Answers::new(&[""]);
        let err = collect_validator(&prompter, &ValidatorOptions::default(), "stake").unwrap_err();
        assert!(matches!(err, Error::IncompleteInput { ref field } if field == "Staking amount"));
    }

    #[test]
    fn malformed_staking_amount_is_invalid_amount() {
        let prompter = Answers::new(&["lots"]);
        let err = collect_validator(&prompter, &ValidatorOptions::default(), "stake").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    }
}
