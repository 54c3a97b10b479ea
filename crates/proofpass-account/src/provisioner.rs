//! The provisioning run: generate, reveal, fund, store.
//!
//! A run moves through [`Stage`]s in one direction only:
//!
//! ```text
//! Start ─► KeypairGenerated ─► FundRequested ─► Funded ─► ConfigWritten ─► Done
//!   │                               │
//!   ▼                               ▼
//! GenerationFailed ─► Aborted    FundFailed ─► Aborted
//! ```
//!
//! Status lines for the user go to the writer passed to
//! [`Provisioner::run`]; diagnostics go to the logger.

use std::{error::Error as _, fmt, io::Write, path::PathBuf};

use log::{debug, info, warn};

use crate::{
    config::AccountConfig,
    env_file::EnvFile,
    error::{Aborted, KeypairError, ProvisionError},
    faucet::{Faucet, FundingOutcome},
    horizon::Horizon,
    keypair::{Keypair, generate_keypair},
    reveal::KeyReveal,
    transport::HttpGet,
};

const RULE: &str = "═══════════════════════════════════════";

/// Progress of a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    KeypairGenerated,
    FundRequested,
    Funded,
    ConfigWritten,
    Done,
    GenerationFailed,
    FundFailed,
    Aborted,
}

impl Stage {
    /// Returns `true` if a run may move from `self` to `next`.
    ///
    /// Every non-terminal stage may abort; there is no way back.
    pub fn can_advance_to(self, next: Stage) -> bool {
        match (self, next) {
            (Self::Done | Self::Aborted, _) => false,
            (_, Self::Aborted) => true,
            (Self::Start, Self::KeypairGenerated | Self::GenerationFailed)
            | (Self::KeypairGenerated, Self::FundRequested)
            | (Self::FundRequested, Self::Funded | Self::FundFailed)
            | (Self::Funded, Self::ConfigWritten)
            | (Self::ConfigWritten, Self::Done) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::KeypairGenerated => "keypair generated",
            Self::FundRequested => "fund requested",
            Self::Funded => "funded",
            Self::ConfigWritten => "config written",
            Self::Done => "done",
            Self::GenerationFailed => "generation failed",
            Self::FundFailed => "fund failed",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Tracks the stage of one run.
#[derive(Debug)]
struct Run {
    stage: Stage,
}

impl Run {
    fn new() -> Self {
        Self {
            stage: Stage::Start,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "invalid transition {} -> {next}",
            self.stage
        );
        debug!(from:% = self.stage, to:% = next; "Stage transition");
        self.stage = next;
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub public_key: String,
    /// Native balance after funding, if it was looked up successfully.
    pub balance: Option<String>,
    pub env_file: PathBuf,
    pub explorer_link: String,
}

type Keygen = Box<dyn Fn() -> Result<Keypair, KeypairError>>;

/// Creates, funds and stores one testnet account.
pub struct Provisioner<T> {
    transport: T,
    config: AccountConfig,
    env_file: EnvFile,
    keygen: Keygen,
}

impl<T: HttpGet> Provisioner<T> {
    pub fn new(transport: T, config: AccountConfig, env_file: EnvFile) -> Self {
        Self {
            transport,
            config,
            env_file,
            keygen: Box::new(generate_keypair),
        }
    }

    /// Replaces the random keypair source.
    pub fn with_keygen(
        mut self,
        keygen: impl Fn() -> Result<Keypair, KeypairError> + 'static,
    ) -> Self {
        self.keygen = Box::new(keygen);
        self
    }

    /// Runs the provisioning flow once, printing status lines to `out`.
    ///
    /// The env file is only written after successful funding.
    ///
    /// # Errors
    ///
    /// Returns [`Aborted`] with the stage the run stopped at. A failure line
    /// (`Failed to fund account` or `Error: ...`) has already been printed.
    pub fn run(&self, out: &mut dyn Write) -> Result<Summary, Aborted> {
        let mut run = Run::new();

        match self.execute(&mut run, out) {
            Ok(summary) => Ok(summary),
            Err(error) => {
                let stage = run.stage;
                let status = match &error {
                    ProvisionError::Funding(_) => "❌ Failed to fund account".to_string(),
                    other => format!("❌ Error: {}", describe(other)),
                };
                if let Err(err) = writeln!(out, "{status}") {
                    warn!(err:% = err; "Could not print failure status");
                }
                run.advance(Stage::Aborted);
                warn!(stage:% = stage, err:% = error; "Provisioning aborted");
                Err(Aborted { stage, error })
            }
        }
    }

    fn execute(&self, run: &mut Run, out: &mut dyn Write) -> Result<Summary, ProvisionError> {
        writeln!(out, "🌟 Creating Stellar testnet account...\n")?;

        let keypair = match (self.keygen)() {
            Ok(keypair) => {
                run.advance(Stage::KeypairGenerated);
                keypair
            }
            Err(err) => {
                run.advance(Stage::GenerationFailed);
                return Err(ProvisionError::Keypair(err));
            }
        };
        let public_key = keypair.public_key();
        info!(public_key = public_key; "Keypair generated");

        writeln!(out, "Generated keypair!")?;
        KeyReveal::new(self.config.reveal()).reveal(out, &keypair)?;
        writeln!(out, "\n📡 Funding account with Friendbot...\n")?;

        run.advance(Stage::FundRequested);
        let outcome = Faucet::new(&self.transport)
            .with_base_url(self.config.friendbot_url())
            .with_timeout(self.config.timeout())
            .fund(public_key);

        if let Some(diagnostic) = match &outcome {
            FundingOutcome::Funded => None,
            FundingOutcome::Rejected { status } => {
                Some(format!("Friendbot responded with status {status}"))
            }
            FundingOutcome::Unreachable { reason } => {
                Some(format!("Error funding account: {reason}"))
            }
        } {
            writeln!(out, "{diagnostic}")?;
            run.advance(Stage::FundFailed);
            return Err(ProvisionError::Funding(outcome));
        }
        run.advance(Stage::Funded);
        writeln!(out, "✅ Account funded successfully!\n")?;

        let balance = if self.config.check_balance() {
            self.lookup_balance(public_key, out)?
        } else {
            None
        };

        self.env_file
            .write_credentials(&keypair)
            .map_err(ProvisionError::EnvFile)?;
        run.advance(Stage::ConfigWritten);
        writeln!(
            out,
            "✅ Credentials saved to {}\n",
            self.env_file.path().display()
        )?;

        let explorer_link = self.config.explorer_link(public_key);
        writeln!(out, "{RULE}")?;
        writeln!(out, "🎉 Setup complete!\n")?;
        writeln!(out, "Your Stellar testnet account is ready to use.")?;
        writeln!(out, "Explorer: {explorer_link}")?;
        writeln!(out, "{RULE}\n")?;

        run.advance(Stage::Done);
        info!(public_key = public_key; "Provisioning complete");

        Ok(Summary {
            public_key: public_key.to_string(),
            balance,
            env_file: self.env_file.path().to_path_buf(),
            explorer_link,
        })
    }

    /// Balance lookup failures are reported and otherwise ignored.
    fn lookup_balance(
        &self,
        public_key: &str,
        out: &mut dyn Write,
    ) -> Result<Option<String>, ProvisionError> {
        let horizon = Horizon::new(&self.transport)
            .with_base_url(self.config.horizon_url())
            .with_timeout(self.config.timeout());

        match horizon.native_balance(public_key) {
            Ok(balance) => {
                writeln!(out, "💰 Balance: {balance} XLM\n")?;
                Ok(Some(balance))
            }
            Err(err) => {
                warn!(err:% = err; "Balance lookup failed");
                writeln!(out, "⚠️  Could not load balance: {err}\n")?;
                Ok(None)
            }
        }
    }
}

/// Joins an error with its chain of sources.
fn describe(error: &ProvisionError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&err.to_string());
        source = err.source();
    }
    message
}
