//! End-to-end tests of the provisioning flow against an in-memory transport.

use std::{cell::RefCell, fs, time::Duration};

use proofpass_account::{
    FundingOutcome, Keypair, KeypairError, ProvisionError, Provisioner, Stage, TransportError,
    config::AccountConfig,
    env_file::EnvFile,
    reveal::RevealPolicy,
    transport::{HttpGet, HttpResponse},
};

const ENV_TEMPLATE: &str = "STELLAR_SECRET_KEY=\nSTELLAR_PUBLIC_KEY=\n";
const BALANCE_BODY: &str =
    r#"{"balances": [{"balance": "10000.0000000", "asset_type": "native"}]}"#;

/// Routes requests by host and records every URL.
struct MockTransport {
    friendbot: Result<HttpResponse, TransportError>,
    horizon: Result<HttpResponse, TransportError>,
    requests: RefCell<Vec<String>>,
}

impl MockTransport {
    fn new(friendbot: Result<HttpResponse, TransportError>) -> Self {
        Self {
            friendbot,
            horizon: Ok(HttpResponse::new(200, BALANCE_BODY)),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn funded() -> Self {
        Self::new(Ok(HttpResponse::new(200, "{}")))
    }

    fn timing_out() -> Self {
        Self::new(Err(TransportError::Timeout {
            url: "https://friendbot.stellar.org?addr=GABC".to_string(),
        }))
    }
}

impl HttpGet for MockTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        assert_eq!(timeout, Duration::from_secs(30));
        self.requests.borrow_mut().push(url.to_string());
        if url.starts_with("https://friendbot.stellar.org") {
            self.friendbot.clone()
        } else if url.starts_with("https://horizon-testnet.stellar.org") {
            self.horizon.clone()
        } else {
            panic!("unexpected request to {url}");
        }
    }
}

fn fixed_keypair() -> Result<Keypair, KeypairError> {
    Ok(Keypair::from_parts("GABC", "SXYZ"))
}

struct Fixture {
    _dir: tempfile::TempDir,
    env_file: EnvFile,
}

impl Fixture {
    fn new(content: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, content).unwrap();
        Self {
            env_file: EnvFile::new(path),
            _dir: dir,
        }
    }

    fn content(&self) -> String {
        fs::read_to_string(self.env_file.path()).unwrap()
    }
}

fn run(
    transport: &MockTransport,
    config: AccountConfig,
    fixture: &Fixture,
) -> (Result<proofpass_account::Summary, proofpass_account::Aborted>, String) {
    let provisioner =
        Provisioner::new(transport, config, fixture.env_file.clone()).with_keygen(fixed_keypair);
    let mut out = Vec::new();
    let result = provisioner.run(&mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_happy_path() {
    let fixture = Fixture::new(ENV_TEMPLATE);
    let transport = MockTransport::funded();

    let (result, stdout) = run(&transport, AccountConfig::default(), &fixture);

    let summary = result.expect("provisioning should succeed");
    assert_eq!(summary.public_key, "GABC");
    assert_eq!(summary.balance.as_deref(), Some("10000.0000000"));
    assert_eq!(
        summary.explorer_link,
        "https://stellar.expert/explorer/testnet/account/GABC"
    );

    assert_eq!(
        fixture.content(),
        "STELLAR_SECRET_KEY=SXYZ\nSTELLAR_PUBLIC_KEY=GABC\n"
    );
    assert!(stdout.contains("Public Key: GABC"));
    assert!(stdout.contains("Secret Key: SXYZ"));
    assert!(stdout.contains("Balance: 10000.0000000 XLM"));
    assert!(stdout.contains("Setup complete"));
    assert!(stdout.contains("Explorer: https://stellar.expert/explorer/testnet/account/GABC"));

    assert_eq!(
        *transport.requests.borrow(),
        vec![
            "https://friendbot.stellar.org?addr=GABC".to_string(),
            "https://horizon-testnet.stellar.org/accounts/GABC".to_string(),
        ]
    );
}

#[test]
fn test_exported_placeholders_are_filled() {
    let fixture = Fixture::new("export STELLAR_SECRET_KEY=\nexport STELLAR_PUBLIC_KEY=\n");
    let transport = MockTransport::funded();

    let (result, stdout) = run(&transport, AccountConfig::default(), &fixture);

    assert!(result.is_ok(), "{stdout}");
    assert_eq!(
        fixture.content(),
        "export STELLAR_SECRET_KEY=SXYZ\nexport STELLAR_PUBLIC_KEY=GABC\n"
    );
}

#[test]
fn test_timeout_leaves_env_file_untouched() {
    let original = "# ProofPass\r\nSTELLAR_SECRET_KEY=\r\nSTELLAR_PUBLIC_KEY=\r\n";
    let fixture = Fixture::new(original);
    let transport = MockTransport::timing_out();

    let (result, stdout) = run(&transport, AccountConfig::default(), &fixture);

    let aborted = result.unwrap_err();
    assert_eq!(aborted.stage, Stage::FundFailed);
    assert!(matches!(
        aborted.error,
        ProvisionError::Funding(FundingOutcome::Unreachable { .. })
    ));
    assert!(stdout.contains("Failed to fund account"));
    assert!(!stdout.contains("Setup complete"));
    assert_eq!(fixture.content(), original);
    // One funding attempt, no retry and no balance lookup.
    assert_eq!(transport.requests.borrow().len(), 1);
}

#[test]
fn test_rejected_funding() {
    let fixture = Fixture::new(ENV_TEMPLATE);
    let transport = MockTransport::new(Ok(HttpResponse::new(400, "{\"detail\":\"exists\"}")));

    let (result, stdout) = run(&transport, AccountConfig::default(), &fixture);

    let aborted = result.unwrap_err();
    assert!(matches!(
        aborted.error,
        ProvisionError::Funding(FundingOutcome::Rejected { status: 400 })
    ));
    assert!(stdout.contains("Friendbot responded with status 400"));
    assert!(stdout.contains("Failed to fund account"));
    assert_eq!(fixture.content(), ENV_TEMPLATE);
}

#[test]
fn test_balance_failure_is_not_fatal() {
    let fixture = Fixture::new(ENV_TEMPLATE);
    let mut transport = MockTransport::funded();
    transport.horizon = Ok(HttpResponse::new(404, "{}"));

    let (result, stdout) = run(&transport, AccountConfig::default(), &fixture);

    let summary = result.unwrap();
    assert_eq!(summary.balance, None);
    assert!(stdout.contains("Could not load balance"));
    assert!(stdout.contains("Setup complete"));
    assert!(fixture.content().contains("STELLAR_PUBLIC_KEY=GABC"));
}

#[test]
fn test_balance_check_can_be_disabled() {
    let fixture = Fixture::new(ENV_TEMPLATE);
    let transport = MockTransport::funded();
    let config = AccountConfig::default().with_check_balance(false);

    let (result, _) = run(&transport, config, &fixture);

    assert!(result.is_ok());
    assert_eq!(transport.requests.borrow().len(), 1);
}

#[test]
fn test_missing_placeholder_reports_error() {
    let fixture = Fixture::new("STELLAR_PUBLIC_KEY=\n");
    let transport = MockTransport::funded();

    let (result, stdout) = run(&transport, AccountConfig::default(), &fixture);

    let aborted = result.unwrap_err();
    assert_eq!(aborted.stage, Stage::Funded);
    assert!(matches!(aborted.error, ProvisionError::EnvFile(_)));
    assert!(stdout.contains("Error: could not update env file"));
    assert!(stdout.contains("STELLAR_SECRET_KEY"));
    assert_eq!(fixture.content(), "STELLAR_PUBLIC_KEY=\n");
}

#[test]
fn test_generation_failure_aborts_before_funding() {
    let fixture = Fixture::new(ENV_TEMPLATE);
    let transport = MockTransport::funded();
    let provisioner = Provisioner::new(
        &transport,
        AccountConfig::default(),
        fixture.env_file.clone(),
    )
    .with_keygen(|| Err(KeypairError::RandomSource("no entropy".to_string())));

    let mut out = Vec::new();
    let aborted = provisioner.run(&mut out).unwrap_err();

    assert_eq!(aborted.stage, Stage::GenerationFailed);
    assert!(String::from_utf8(out).unwrap().contains("Error: keypair generation failed"));
    assert!(transport.requests.borrow().is_empty());
    assert_eq!(fixture.content(), ENV_TEMPLATE);
}

#[test]
fn test_redacted_reveal_keeps_secret_off_stdout() {
    let fixture = Fixture::new(ENV_TEMPLATE);
    let transport = MockTransport::funded();
    let provisioner = Provisioner::new(
        &transport,
        AccountConfig::default().with_reveal(RevealPolicy::Redacted),
        fixture.env_file.clone(),
    )
    .with_keygen(|| {
        Ok(Keypair::from_parts(
            "GABC",
            "SBK2VIYYSVG76E7VC3QHYARNFLY2EAQXDHRC7BMXBBGIFG74ARPRMNQM",
        ))
    });

    let mut out = Vec::new();
    provisioner.run(&mut out).unwrap();
    let stdout = String::from_utf8(out).unwrap();

    assert!(!stdout.contains("SBK2VIYYSVG76E7VC3QHYARNFLY2EAQXDHRC7BMXBBGIFG74ARPRMNQM"));
    assert!(
        fixture
            .content()
            .contains("STELLAR_SECRET_KEY=SBK2VIYYSVG76E7VC3QHYARNFLY2EAQXDHRC7BMXBBGIFG74ARPRMNQM")
    );
}
