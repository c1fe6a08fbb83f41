//! Per-launch local chain home.
//!
//! A home moves through `absent -> initialized -> gentx generated`. The
//! `netlaunch.json` marker records the stage so a run that failed after
//! initialization resumes without touching genesis again.
use crate::chain::ChainDaemon;
use crate::error::{Error, Result};
use crate::network::{ChainLaunch, InitialGenesis};
use crate::util::{sha256_hex, write_atomic};
use crate::validator::ValidatorProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const MARKER_SCHEMA_VERSION: u32 = 1;
const MARKER_FILE: &str = "netlaunch.json";

/// Typed paths inside a chain home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHome {
    root: PathBuf,
}

impl ChainHome {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `config/` directory path.
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    /// Return the `config/genesis.json` path.
    pub fn genesis_path(&self) -> PathBuf {
        self.config_dir().join("genesis.json")
    }

    /// Return the `config/gentx/gentx.json` path.
    pub fn gentx_path(&self) -> PathBuf {
        self.config_dir().join("gentx").join("gentx.json")
    }

    /// Return the `netlaunch.json` marker path.
    pub fn marker_path(&self) -> PathBuf {
        self.root.join(MARKER_FILE)
    }
}

/// Home directory used for a launch when none is given explicitly.
pub fn default_home(networks_root: &Path, launch_id: u64) -> PathBuf {
    networks_root.join(launch_id.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Initialized,
    GentxGenerated,
}

/// Workspace progress persisted next to the node files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceMarker {
    pub schema_version: u32,
    pub launch_id: u64,
    pub genesis_chain_id: String,
    pub genesis_sha256: String,
    pub stage: Stage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gentx_path: Option<PathBuf>,
}

impl WorkspaceMarker {
    /// Whether the launch now publishes a genesis other than the one installed.
    pub fn is_stale_for(&self, launch: &ChainLaunch) -> bool {
        match &launch.initial_genesis {
            InitialGenesis::Url { hash, .. } if !hash.is_empty() => {
                !hash.eq_ignore_ascii_case(&self.genesis_sha256)
            }
            _ => false,
        }
    }
}

/// What a home directory holds before a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeState {
    Absent,
    /// Initialized for the same launch, gentx still pending.
    Resumable(WorkspaceMarker),
    /// Anything else that would be destroyed by a fresh initialization.
    Existing,
}

/// The fields of a genesis file the workflows rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genesis {
    pub chain_id: String,
    pub stake_denom: String,
}

/// Local workspace for one launch ID.
#[derive(Debug, Clone)]
pub struct Workspace {
    launch_id: u64,
    home: ChainHome,
}

impl Workspace {
    pub fn new(launch_id: u64, root: PathBuf) -> Self {
        Self {
            launch_id,
            home: ChainHome::new(root),
        }
    }

    pub fn launch_id(&self) -> u64 {
        self.launch_id
    }

    pub fn home(&self) -> &ChainHome {
        &self.home
    }

    pub fn genesis_path(&self) -> PathBuf {
        self.home.genesis_path()
    }

    /// Classify the home without modifying it.
    pub fn check(&self) -> Result<HomeState> {
        let root = self.home.root();
        if !root.exists() || is_empty_dir(root)? {
            return Ok(HomeState::Absent);
        }
        let marker = match self.load_marker() {
            Ok(marker) => marker,
            Err(err) => {
                tracing::debug!(home = %root.display(), error = %err, "unreadable workspace marker");
                None
            }
        };
        Ok(match marker {
            Some(marker)
                if marker.launch_id == self.launch_id
                    && marker.stage == Stage::Initialized
                    && self.home.genesis_path().is_file() =>
            {
                HomeState::Resumable(marker)
            }
            _ => HomeState::Existing,
        })
    }

    /// Create a fresh home and materialize the launch genesis.
    ///
    /// Any previous content of the home is removed, so callers must have
    /// confirmed the overwrite first. `published_genesis` holds the downloaded
    /// file for launches with a genesis URL; it is checked before the home is
    /// touched.
    pub fn initialize(
        &self,
        daemon: &dyn ChainDaemon,
        launch: &ChainLaunch,
        published_genesis: Option<&[u8]>,
        moniker: &str,
    ) -> Result<Genesis> {
        let genesis_path = self.home.genesis_path();
        let published = match (&launch.initial_genesis, published_genesis) {
            (InitialGenesis::Url { url, hash }, Some(bytes)) => {
                verify_genesis_hash(&genesis_path, url, hash, bytes)?;
                parse_genesis(&genesis_path, bytes)?;
                Some(bytes)
            }
            (InitialGenesis::Url { url, .. }, None) => {
                return Err(Error::GenesisParse {
                    path: genesis_path,
                    reason: format!("genesis published at {url} was not downloaded"),
                });
            }
            (InitialGenesis::Default, _) => None,
        };

        let root = self.home.root();
        if root.exists() {
            fs::remove_dir_all(root).map_err(Error::workspace("remove stale home", root))?;
        }
        fs::create_dir_all(root).map_err(Error::workspace("create home", root))?;
        daemon.init(launch, root, moniker)?;

        let bytes = match published {
            Some(bytes) => bytes.to_vec(),
            None => {
                let generated =
                    fs::read(&genesis_path).map_err(Error::workspace("read", &genesis_path))?;
                with_chain_id(&genesis_path, &generated, &launch.genesis_chain_id)?
            }
        };

        let genesis = parse_genesis(&genesis_path, &bytes)?;
        if genesis.chain_id != launch.genesis_chain_id {
            tracing::warn!(
                genesis_chain_id = %genesis.chain_id,
                launch_chain_id = %launch.genesis_chain_id,
                "genesis chain id differs from launch record"
            );
        }
        write_atomic(&genesis_path, &bytes)?;
        self.write_marker(&WorkspaceMarker {
            schema_version: MARKER_SCHEMA_VERSION,
            launch_id: self.launch_id,
            genesis_chain_id: genesis.chain_id.clone(),
            genesis_sha256: sha256_hex(&bytes),
            stage: Stage::Initialized,
            gentx_path: None,
        })?;
        tracing::debug!(home = %root.display(), chain_id = %genesis.chain_id, "genesis materialized");
        Ok(genesis)
    }

    /// Generate the validator gentx inside the home.
    ///
    /// A failure leaves the initialized home in place for a later retry.
    /// The validator account is funded with the staking amount in genesis
    /// first, unless an earlier attempt already did so.
    pub fn generate_gentx(
        &self,
        daemon: &dyn ChainDaemon,
        launch: &ChainLaunch,
        profile: &ValidatorProfile,
        address: &str,
    ) -> Result<PathBuf> {
        let genesis_path = self.home.genesis_path();
        let genesis_bytes =
            fs::read(&genesis_path).map_err(Error::workspace("read", &genesis_path))?;
        if genesis_has_balance(&genesis_bytes, address) {
            tracing::debug!(address, "genesis account already funded");
        } else {
            daemon.add_genesis_account(launch, self.home.root(), address, &profile.staking_amount)?;
        }

        let output = self.home.gentx_path();
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(Error::workspace("create", parent))?;
        }
        daemon.gentx(launch, self.home.root(), profile, &output)?;
        if !output.is_file() {
            return Err(Error::Daemon {
                program: "gentx".to_string(),
                detail: format!("no gentx written to {}", output.display()),
            });
        }

        let mut marker = match self.load_marker()? {
            Some(marker) => marker,
            None => {
                let bytes = fs::read(self.home.genesis_path())
                    .map_err(Error::workspace("read", self.home.genesis_path()))?;
                WorkspaceMarker {
                    schema_version: MARKER_SCHEMA_VERSION,
                    launch_id: self.launch_id,
                    genesis_chain_id: launch.genesis_chain_id.clone(),
                    genesis_sha256: sha256_hex(&bytes),
                    stage: Stage::Initialized,
                    gentx_path: None,
                }
            }
        };
        marker.stage = Stage::GentxGenerated;
        marker.gentx_path = Some(output.clone());
        self.write_marker(&marker)?;
        Ok(output)
    }

    pub fn load_marker(&self) -> Result<Option<WorkspaceMarker>> {
        let path = self.home.marker_path();
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(Error::workspace("read", &path))?;
        let marker: WorkspaceMarker =
            serde_json::from_slice(&bytes).map_err(|err| Error::Workspace {
                context: "parse marker",
                path: path.clone(),
                source: err.into(),
            })?;
        Ok(Some(marker))
    }

    fn write_marker(&self, marker: &WorkspaceMarker) -> Result<()> {
        let path = self.home.marker_path();
        let text = serde_json::to_vec_pretty(marker).map_err(|err| Error::Workspace {
            context: "serialize marker",
            path: path.clone(),
            source: err.into(),
        })?;
        write_atomic(&path, &text)
    }
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(path).map_err(Error::workspace("read", path))?;
    Ok(entries.next().is_none())
}

/// Whether genesis already holds a bank balance for `address`.
pub fn genesis_has_balance(bytes: &[u8], address: &str) -> bool {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|value| {
            value
                .pointer("/app_state/bank/balances")
                .and_then(Value::as_array)
                .map(|balances| {
                    balances
                        .iter()
                        .any(|entry| entry.get("address").and_then(Value::as_str) == Some(address))
                })
        })
        .unwrap_or(false)
}

/// Read and decode a genesis file.
pub fn read_genesis(path: &Path) -> Result<Genesis> {
    let bytes = fs::read(path).map_err(|err| Error::GenesisParse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    parse_genesis(path, &bytes)
}

fn parse_genesis(path: &Path, bytes: &[u8]) -> Result<Genesis> {
    let invalid = |reason: String| Error::GenesisParse {
        path: path.to_path_buf(),
        reason,
    };
    let value: Value = serde_json::from_slice(bytes).map_err(|err| invalid(err.to_string()))?;
    let chain_id = value
        .get("chain_id")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing chain_id".to_string()))?;
    let stake_denom = value
        .pointer("/app_state/staking/params/bond_denom")
        .and_then(Value::as_str)
        .filter(|denom| !denom.is_empty())
        .ok_or_else(|| invalid("missing app_state.staking.params.bond_denom".to_string()))?;
    Ok(Genesis {
        chain_id: chain_id.to_string(),
        stake_denom: stake_denom.to_string(),
    })
}

fn verify_genesis_hash(path: &Path, url: &str, expected: &str, bytes: &[u8]) -> Result<()> {
    if expected.is_empty() {
        return Ok(());
    }
    let actual = sha256_hex(bytes);
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(Error::GenesisParse {
            path: path.to_path_buf(),
            reason: format!("genesis from {url} has sha256 {actual}, launch expects {expected}"),
        });
    }
    Ok(())
}

fn with_chain_id(path: &Path, bytes: &[u8], chain_id: &str) -> Result<Vec<u8>> {
    let invalid = |reason: String| Error::GenesisParse {
        path: path.to_path_buf(),
        reason,
    };
    let mut value: Value = serde_json::from_slice(bytes).map_err(|err| invalid(err.to_string()))?;
    let object = value
        .as_object_mut()
        .ok_or_else(|| invalid("genesis is not a JSON object".to_string()))?;
    object.insert("chain_id".to_string(), Value::String(chain_id.to_string()));
    serde_json::to_vec_pretty(&value).map_err(|err| invalid(err.to_string()))
}
