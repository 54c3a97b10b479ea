use std::{
    cell::RefCell,
    fs,
    net::TcpListener,
    path::{Path, PathBuf},
    process::Command,
    time::Duration,
};

use tempfile::tempdir;

use proofpass_account::{
    TransportError,
    transport::{HttpGet, HttpResponse},
};
use proofpass_cli::{
    AccountArgs, CliError, HandbookArgs, render_report, run_account_with, run_handbook,
};

/// Answers Friendbot with `friendbot_status` and Horizon with a balance.
struct StubTransport {
    friendbot_status: u16,
    requests: RefCell<Vec<String>>,
}

impl StubTransport {
    fn new(friendbot_status: u16) -> Self {
        Self {
            friendbot_status,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl HttpGet for StubTransport {
    fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(url.to_string());
        if url.contains("friendbot") {
            Ok(HttpResponse::new(self.friendbot_status, "{}"))
        } else {
            Ok(HttpResponse::new(
                200,
                r#"{"balances": [{"balance": "10000.0000000", "asset_type": "native"}]}"#,
            ))
        }
    }
}

/// Writes `content` as a config file in `dir`, so no user or project config
/// is picked up.
fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("proofpass.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn handbook_args(output: &Path, config: &Path) -> HandbookArgs {
    HandbookArgs {
        output: path_arg(output),
        config: Some(path_arg(config)),
        log_level: "off".to_string(),
    }
}

fn account_args(env_file: &Path, config: &Path) -> AccountArgs {
    AccountArgs {
        env_file: path_arg(env_file),
        config: Some(path_arg(config)),
        log_level: "off".to_string(),
    }
}

/// A localhost URL nothing listens on.
fn closed_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[test]
fn e2e_handbook_generation() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_config(temp_dir.path(), "");
    let output = temp_dir.path().join("ProofPass_Developer_Handbook.pdf");
    let args = handbook_args(&output, &config);

    let report = run_handbook(&args).expect("Handbook generation failed");
    assert_eq!(report.pdf_path, output);

    let first = fs::read(&output).unwrap();
    assert!(first.starts_with(b"%PDF-"));
    assert!(temp_dir.path().join("architecture_diagram.png").exists());
    assert!(temp_dir.path().join("sequence_flow.png").exists());

    run_handbook(&args).unwrap();
    assert_eq!(fs::read(&output).unwrap(), first);
}

#[test]
fn e2e_handbook_with_config_removing_diagrams() {
    let temp_dir = tempdir().unwrap();
    let config = write_config(temp_dir.path(), "[handbook]\nkeep_diagrams = false\n");
    let output = temp_dir.path().join("handbook.pdf");

    run_handbook(&handbook_args(&output, &config)).unwrap();

    assert!(output.exists());
    assert!(!temp_dir.path().join("architecture_diagram.png").exists());
    assert!(!temp_dir.path().join("sequence_flow.png").exists());
}

#[test]
fn e2e_handbook_missing_config() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("h.pdf");
    let args = handbook_args(&output, Path::new("/nonexistent/proofpass.toml"));

    let err = run_handbook(&args).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
    assert!(render_report(&err).contains("config::missing_file"));
    assert!(!output.exists());
}

#[test]
fn e2e_account_happy_path() {
    let temp_dir = tempdir().unwrap();
    let config = write_config(temp_dir.path(), "");
    let env_path = temp_dir.path().join(".env");
    fs::write(
        &env_path,
        "PORT=3000\nSTELLAR_SECRET_KEY=\nSTELLAR_PUBLIC_KEY=\nSTELLAR_NETWORK=testnet\n",
    )
    .unwrap();
    let mut out = Vec::new();

    let summary = run_account_with(
        &account_args(&env_path, &config),
        StubTransport::new(200),
        &mut out,
    )
    .unwrap();

    let stdout = String::from_utf8(out).unwrap();
    assert!(stdout.contains(&summary.public_key));
    assert!(stdout.contains("Setup complete"));

    let content = fs::read_to_string(&env_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "PORT=3000");
    assert!(lines[1].starts_with("STELLAR_SECRET_KEY=S"));
    assert_eq!(lines[2], format!("STELLAR_PUBLIC_KEY={}", summary.public_key));
    assert_eq!(lines[3], "STELLAR_NETWORK=testnet");
}

#[test]
fn e2e_account_funding_failure() {
    let temp_dir = tempdir().unwrap();
    let config = write_config(temp_dir.path(), "");
    let env_path = temp_dir.path().join(".env");
    let original = "STELLAR_SECRET_KEY=\nSTELLAR_PUBLIC_KEY=\n";
    fs::write(&env_path, original).unwrap();
    let mut out = Vec::new();
    let transport = StubTransport::new(500);

    let err =
        run_account_with(&account_args(&env_path, &config), &transport, &mut out).unwrap_err();

    assert!(matches!(err, CliError::Account(_)));
    assert!(String::from_utf8(out).unwrap().contains("Failed to fund account"));
    assert_eq!(fs::read_to_string(&env_path).unwrap(), original);
    assert_eq!(transport.requests.borrow().len(), 1);
}

#[test]
fn e2e_handbook_binary_exits_zero() {
    let temp_dir = tempdir().unwrap();
    let config = write_config(temp_dir.path(), "");
    let output = temp_dir.path().join("ProofPass_Developer_Handbook.pdf");

    let result = Command::new(env!("CARGO_BIN_EXE_proofpass-handbook"))
        .current_dir(temp_dir.path())
        .args(["--output", &path_arg(&output)])
        .args(["--config", &path_arg(&config)])
        .args(["--log-level", "off"])
        .output()
        .expect("Failed to run proofpass-handbook");

    assert_eq!(result.status.code(), Some(0), "{result:?}");
    assert!(String::from_utf8_lossy(&result.stdout).contains("PDF generado"));
    assert!(fs::read(&output).unwrap().starts_with(b"%PDF-"));
}

#[test]
fn e2e_handbook_binary_exits_one_on_missing_config() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("handbook.pdf");

    let result = Command::new(env!("CARGO_BIN_EXE_proofpass-handbook"))
        .current_dir(temp_dir.path())
        .args(["--output", &path_arg(&output)])
        .args(["--config", "/nonexistent/proofpass.toml"])
        .args(["--log-level", "off"])
        .output()
        .expect("Failed to run proofpass-handbook");

    assert_eq!(result.status.code(), Some(1), "{result:?}");
    assert!(!output.exists());
}

#[test]
fn e2e_account_binary_exits_one_when_faucet_unreachable() {
    let temp_dir = tempdir().unwrap();
    let faucet_url = closed_local_url();
    let config = write_config(
        temp_dir.path(),
        &format!("[account]\nfriendbot_url = \"{faucet_url}\"\ntimeout_secs = 5\n"),
    );
    let env_path = temp_dir.path().join(".env");
    let original = "PORT=3000\r\nSTELLAR_SECRET_KEY=\r\nSTELLAR_PUBLIC_KEY=\r\n";
    fs::write(&env_path, original).unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_proofpass-account"))
        .current_dir(temp_dir.path())
        .args(["--env-file", &path_arg(&env_path)])
        .args(["--config", &path_arg(&config)])
        .args(["--log-level", "off"])
        .output()
        .expect("Failed to run proofpass-account");

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert_eq!(result.status.code(), Some(1), "{result:?}");
    assert!(stdout.contains("Failed to fund account"), "{stdout}");
    assert!(!stdout.contains("Setup complete"));
    assert_eq!(fs::read(&env_path).unwrap(), original.as_bytes());
}
