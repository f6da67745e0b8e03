use std::process::Command;

fn dossier() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dossier"))
}

#[test]
fn init_writes_a_valid_brief() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.md"), "# Sample Tool\n\nA demo.").unwrap();
    std::fs::write(dir.path().join("main.py"), "print('hello')").unwrap();

    let output = dossier()
        .arg("init")
        .arg(dir.path())
        .args(["--provider", "rules"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "dossier init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let brief_path = dir.path().join("dossier.yaml");
    assert!(brief_path.exists(), "dossier.yaml should exist");

    let brief = dossier_brief::load_brief(&brief_path).unwrap();
    assert_eq!(brief.project_name, "Sample Tool");
    assert_eq!(brief.project_type.to_string(), "cli");
    assert!(brief.tech_stack.contains(&"Python".to_string()));
}

#[test]
fn init_honors_output_flag() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.md"), "# Out\n").unwrap();
    let out_path = dir.path().join("custom/brief.yaml");

    let output = dossier()
        .arg("init")
        .arg(dir.path())
        .args(["--provider", "mock"])
        .arg("--output")
        .arg(&out_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(out_path.exists());
}

#[test]
fn init_rejects_missing_path() {
    let output = dossier()
        .arg("init")
        .arg("/definitely/not/a/repo")
        .args(["--provider", "rules"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn unknown_provider_falls_back_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.md"), "# Fallback\n").unwrap();

    let output = dossier()
        .arg("init")
        .arg(dir.path())
        .args(["--provider", "no-such-backend"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "unknown provider must fall back, not fail: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rules"));
}

#[test]
fn validate_accepts_generated_brief() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.md"), "# Valid\n").unwrap();
    let brief_path = dir.path().join("dossier.yaml");

    let output = dossier()
        .arg("init")
        .arg(dir.path())
        .args(["--provider", "rules"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = dossier().arg("validate").arg(&brief_path).output().unwrap();
    assert!(
        output.status.success(),
        "validate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("valid"));
}

#[test]
fn validate_rejects_malformed_brief() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "project_name: only-a-name\n").unwrap();

    let output = dossier().arg("validate").arg(&path).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn validate_rejects_missing_file() {
    let output = dossier()
        .arg("validate")
        .arg("/no/such/brief.yaml")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
