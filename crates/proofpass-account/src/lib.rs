//! ProofPass testnet account provisioning.
//!
//! Creates a Stellar keypair, funds the account through Friendbot and stores
//! both keys in the placeholder lines of an env file.
//!
//! ```rust,no_run
//! use proofpass_account::{
//!     Provisioner, config::AccountConfig, env_file::EnvFile, transport::UreqTransport,
//! };
//!
//! let provisioner = Provisioner::new(
//!     UreqTransport::new(),
//!     AccountConfig::default(),
//!     EnvFile::new(".env"),
//! );
//! let summary = provisioner
//!     .run(&mut std::io::stdout())
//!     .expect("Provisioning failed");
//! println!("{}", summary.explorer_link);
//! ```

pub mod config;
pub mod env_file;
pub mod faucet;
pub mod horizon;
pub mod keypair;
pub mod provisioner;
pub mod reveal;
pub mod transport;

mod error;

pub use error::{Aborted, EnvFileError, HorizonError, KeypairError, ProvisionError, TransportError};
pub use faucet::{FundingOutcome, fund_account};
pub use keypair::{Keypair, generate_keypair};
pub use provisioner::{Provisioner, Stage, Summary};
