//! The one place that prints key material.

use std::io::{self, Write};

use serde::Deserialize;

use crate::keypair::Keypair;

/// Number of secret characters shown under [`RevealPolicy::Redacted`].
const REDACTED_PREFIX: usize = 4;

/// How much of the secret seed is shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealPolicy {
    /// Print the whole secret seed.
    #[default]
    Full,
    /// Print only the first characters of the secret seed.
    Redacted,
}

/// Prints generated keys according to a [`RevealPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyReveal {
    policy: RevealPolicy,
}

impl KeyReveal {
    pub fn new(policy: RevealPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RevealPolicy {
        self.policy
    }

    /// Writes the public key and the secret seed to `out`.
    ///
    /// # Errors
    ///
    /// Propagates write failures of `out`.
    pub fn reveal(&self, out: &mut dyn Write, keypair: &Keypair) -> io::Result<()> {
        writeln!(out, "Public Key: {}", keypair.public_key())?;
        match self.policy {
            RevealPolicy::Full => writeln!(out, "Secret Key: {}", keypair.secret_key()),
            RevealPolicy::Redacted => {
                let prefix: String = keypair.secret_key().chars().take(REDACTED_PREFIX).collect();
                writeln!(out, "Secret Key: {prefix}... (redacted, see the env file)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "SBK2VIYYSVG76E7VC3QHYARNFLY2EAQXDHRC7BMXBBGIFG74ARPRMNQM";

    fn revealed(policy: RevealPolicy) -> String {
        let keypair = Keypair::from_parts("GABC", SECRET);
        let mut out = Vec::new();
        KeyReveal::new(policy).reveal(&mut out, &keypair).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_full_reveal() {
        assert_eq!(
            revealed(RevealPolicy::Full),
            format!("Public Key: GABC\nSecret Key: {SECRET}\n")
        );
    }

    #[test]
    fn test_redacted_reveal() {
        let output = revealed(RevealPolicy::Redacted);
        assert!(output.contains("Public Key: GABC"));
        assert!(output.contains("Secret Key: SBK2..."));
        assert!(!output.contains(SECRET));
    }

    #[test]
    fn test_default_policy_is_full() {
        assert_eq!(KeyReveal::default().policy(), RevealPolicy::Full);
    }
}
