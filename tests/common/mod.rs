//! Shared in-memory collaborators for workflow integration tests.
#![allow(dead_code)]

use netlaunch::account::{Account, AccountRegistry};
use netlaunch::chain::ChainDaemon;
use netlaunch::coins::Coins;
use netlaunch::network::{Campaign, ChainLaunch, InitialGenesis, Network};
use netlaunch::prompt::{Prompter, Question};
use netlaunch::proposal::Proposition;
use netlaunch::validator::ValidatorProfile;
use netlaunch::{Context, Error, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

pub fn launch(launch_id: u64) -> ChainLaunch {
    ChainLaunch {
        launch_id,
        coordinator_id: 1,
        genesis_chain_id: format!("orbit-{launch_id}"),
        source_url: "https://github.com/acme/orbit".to_string(),
        source_hash: "0123abcd".to_string(),
        initial_genesis: InitialGenesis::Default,
        campaign_id: None,
        is_mainnet: false,
        launch_triggered: false,
    }
}

pub fn campaign(campaign_id: u64, name: &str) -> Campaign {
    Campaign {
        campaign_id,
        name: name.to_string(),
        coordinator_id: 1,
        mainnet_id: 0,
        mainnet_initialized: false,
        total_supply: Coins::parse("1000stake").unwrap(),
        metadata: String::new(),
    }
}

pub fn genesis_json(chain_id: &str, denom: &str) -> String {
    format!(
        r#"{{"chain_id":"{chain_id}","app_state":{{"staking":{{"params":{{"bond_denom":"{denom}"}}}}}}}}"#
    )
}

/// Network double that records every call and applies updates in memory.
#[derive(Default)]
pub struct FakeNetwork {
    pub launches: HashMap<u64, ChainLaunch>,
    pub genesis_files: HashMap<String, Vec<u8>>,
    pub campaigns: RefCell<HashMap<u64, Campaign>>,
    pub calls: RefCell<Vec<String>>,
    pub submitted: RefCell<Vec<(u64, Vec<Proposition>)>>,
    pub reject_submissions: bool,
}

impl FakeNetwork {
    pub fn with_launch(mut self, launch: ChainLaunch) -> Self {
        self.launches.insert(launch.launch_id, launch);
        self
    }

    pub fn with_campaign(self, campaign: Campaign) -> Self {
        self.campaigns
            .borrow_mut()
            .insert(campaign.campaign_id, campaign);
        self
    }

    pub fn with_genesis(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.genesis_files.insert(url.to_string(), bytes);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Network for FakeNetwork {
    fn fetch_chain_launch(&self, ctx: &Context, launch_id: u64) -> Result<ChainLaunch> {
        self.calls.borrow_mut().push(format!("fetch_chain_launch {launch_id}"));
        ctx.ensure_active()?;
        self.launches
            .get(&launch_id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                what: "launch",
                id: launch_id.to_string(),
            })
    }

    fn fetch_genesis(&self, ctx: &Context, url: &str) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push(format!("fetch_genesis {url}"));
        ctx.ensure_active()?;
        self.genesis_files
            .get(url)
            .cloned()
            .ok_or_else(|| Error::RemoteFailure(format!("GET {url}: 404")))
    }

    fn fetch_campaign(&self, ctx: &Context, campaign_id: u64) -> Result<Campaign> {
        self.calls.borrow_mut().push(format!("fetch_campaign {campaign_id}"));
        ctx.ensure_active()?;
        self.campaigns
            .borrow()
            .get(&campaign_id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                what: "campaign",
                id: campaign_id.to_string(),
            })
    }

    fn submit_campaign_update(
        &self,
        ctx: &Context,
        campaign_id: u64,
        propositions: &[Proposition],
    ) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("submit_campaign_update {campaign_id}"));
        ctx.ensure_active()?;
        if self.reject_submissions {
            return Err(Error::RemoteFailure("tx rejected: code 4".to_string()));
        }
        self.submitted
            .borrow_mut()
            .push((campaign_id, propositions.to_vec()));
        let mut campaigns = self.campaigns.borrow_mut();
        let campaign = campaigns.get_mut(&campaign_id).ok_or_else(|| Error::NotFound {
            what: "campaign",
            id: campaign_id.to_string(),
        })?;
        for proposition in propositions {
            match proposition {
                Proposition::Name(name) => campaign.name = name.clone(),
                Proposition::Metadata(metadata) => campaign.metadata = metadata.clone(),
                Proposition::TotalSupply(supply) => campaign.total_supply = supply.clone(),
            }
        }
        Ok(())
    }
}

/// Keyring double holding a fixed set of account names.
pub struct FakeAccounts {
    pub names: Vec<&'static str>,
}

impl FakeAccounts {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            names: names.to_vec(),
        }
    }
}

impl AccountRegistry for FakeAccounts {
    fn get_by_name(&self, name: &str) -> Result<Account> {
        if self.names.contains(&name) {
            return Ok(Account {
                name: name.to_string(),
                address: format!("spn1{name}"),
            });
        }
        Err(Error::NotFound {
            what: "account",
            id: name.to_string(),
        })
    }
}

/// Prompter answering from a script and recording what was asked.
pub struct ScriptedPrompter {
    pub confirm_answer: bool,
    pub answers: RefCell<VecDeque<String>>,
    pub confirms: RefCell<Vec<String>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    /// Answers are consumed in order; once exhausted every question gets "".
    pub fn new(confirm_answer: bool, answers: &[&str]) -> Self {
        Self {
            confirm_answer,
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            confirms: RefCell::new(Vec::new()),
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn confirm_count(&self) -> usize {
        self.confirms.borrow().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, label: &str) -> Result<bool> {
        self.confirms.borrow_mut().push(label.to_string());
        Ok(self.confirm_answer)
    }

    fn ask(&self, question: &Question) -> Result<String> {
        self.asked.borrow_mut().push(question.label.clone());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or_default())
    }
}

/// Chain daemon double writing a minimal genesis and a JSON gentx.
#[derive(Default)]
pub struct FakeChainDaemon {
    pub fail_gentx: Cell<bool>,
    pub init_calls: Cell<usize>,
    pub add_account_calls: Cell<usize>,
    pub gentx_calls: Cell<usize>,
    pub profiles: RefCell<Vec<ValidatorProfile>>,
    pub monikers: RefCell<Vec<String>>,
}

impl ChainDaemon for FakeChainDaemon {
    fn init(&self, _launch: &ChainLaunch, home: &Path, moniker: &str) -> Result<()> {
        self.init_calls.set(self.init_calls.get() + 1);
        self.monikers.borrow_mut().push(moniker.to_string());
        let config = home.join("config");
        fs::create_dir_all(&config).unwrap();
        fs::write(config.join("genesis.json"), genesis_json("generated", "stake")).unwrap();
        fs::write(config.join("config.toml"), "moniker = \"node\"\n").unwrap();
        Ok(())
    }

    fn add_genesis_account(
        &self,
        _launch: &ChainLaunch,
        home: &Path,
        address: &str,
        amount: &str,
    ) -> Result<()> {
        self.add_account_calls.set(self.add_account_calls.get() + 1);
        let path = home.join("config/genesis.json");
        let mut genesis: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        let coins = Coins::parse(amount).unwrap();
        let balance = serde_json::json!({ "address": address, "coins": coins });
        let bank = &mut genesis["app_state"]["bank"];
        if !bank["balances"].is_array() {
            bank["balances"] = serde_json::json!([]);
        }
        if let Some(balances) = bank["balances"].as_array_mut() {
            balances.push(balance);
        }
        fs::write(&path, serde_json::to_vec(&genesis).unwrap()).unwrap();
        Ok(())
    }

    fn gentx(
        &self,
        launch: &ChainLaunch,
        _home: &Path,
        profile: &ValidatorProfile,
        output: &Path,
    ) -> Result<()> {
        self.gentx_calls.set(self.gentx_calls.get() + 1);
        if self.fail_gentx.get() {
            return Err(Error::Daemon {
                program: "orbitd".to_string(),
                detail: "gentx: key not found".to_string(),
            });
        }
        self.profiles.borrow_mut().push(profile.clone());
        let body = serde_json::json!({
            "chain_id": launch.genesis_chain_id,
            "delegator": profile.account,
            "amount": profile.staking_amount,
        });
        fs::write(output, serde_json::to_vec(&body).unwrap()).unwrap();
        Ok(())
    }
}

/// Every file under `root` with its contents, keyed by relative path.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                files.insert(relative, fs::read(&path).unwrap());
            }
        }
    }
    files
}
