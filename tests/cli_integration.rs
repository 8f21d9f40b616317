use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};

fn qrforge(args: &[&str]) -> Output {
    let binary_path = assert_cmd::cargo::cargo_bin!("qrforge");
    Command::new(binary_path)
        .args(args)
        .output()
        .expect("cli run succeeds")
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout is utf8");
    serde_json::from_str(&stdout).expect("stdout is valid json")
}

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("qrforge-cli-{}-{}", std::process::id(), name))
}

#[test]
fn encode_wifi_emits_exact_payload() {
    let output = qrforge(&[
        "--json",
        "encode",
        "--type",
        "wifi",
        "--field",
        "ssid=Home",
        "--field",
        "password=pass1234",
        "--field",
        "security=WPA",
        "--field",
        "hidden=false",
    ]);
    assert!(output.status.success(), "cli exited unsuccessfully: {:?}", output);

    let json = stdout_json(&output);
    assert_eq!(json["raw_string"], "WIFI:T:WPA;S:Home;P:pass1234;H:false;;");
    assert_eq!(json["alphabet_class"], "byte");
    assert_eq!(json["level"], "M");
}

#[test]
fn encode_email_human_output() {
    let output = qrforge(&[
        "encode",
        "--type",
        "email",
        "-f",
        "email=a@b.com",
        "-f",
        "subject=Hi",
        "-f",
        "body=",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("payload:  mailto:a@b.com?subject=Hi&body="));
    assert!(stdout.contains("type:     email"));
}

#[test]
fn empty_email_is_rejected_with_status_3() {
    let output = qrforge(&[
        "--json", "encode", "--type", "email", "-f", "email=", "-f", "subject=Hi",
    ]);
    assert_eq!(output.status.code(), Some(3));
    let json = stdout_json(&output);
    assert_eq!(json["reason"], "no_data");
}

#[test]
fn pinned_version_too_small_is_rejected() {
    let text = "?".repeat(4000);
    let field = format!("text={}", text);
    let output = qrforge(&[
        "--json", "encode", "--type", "text", "-f", &field, "--level", "H", "--version", "5",
    ]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout_json(&output)["reason"], "capacity_exceeded");
}

#[test]
fn unknown_type_is_a_usage_error() {
    let output = qrforge(&["encode", "--type", "fax"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn capacity_single_version() {
    let output = qrforge(&["--json", "capacity", "--version", "1", "--level", "L"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json[0]["module_side"], 21);
    assert_eq!(json[0]["capacity"]["byte"], 24);
}

#[test]
fn capacity_table_lists_all_versions() {
    let output = qrforge(&["--json", "capacity"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output).as_array().map(|a| a.len()), Some(40));

    let output = qrforge(&["capacity", "--version", "41"]);
    assert!(!output.status.success());
}

#[test]
fn classify_reports_alphabet() {
    let output = qrforge(&["--json", "classify", "0123456789"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["alphabet"], "numeric");
    assert_eq!(json["version"], 1);
    assert_eq!(json["fits"], true);
}

#[test]
fn dynamic_url_uses_configured_base() {
    let config = temp_file("dynamic.json");
    std::fs::write(&config, r#"{"short_link": {"base_url": "https://go.example"}}"#).unwrap();

    let output = qrforge(&[
        "--json",
        "--config",
        config.to_str().unwrap(),
        "encode",
        "--type",
        "url",
        "-f",
        "url=https://example.com/a/very/long/path?campaign=spring",
        "--dynamic",
    ]);
    let _ = std::fs::remove_file(&config);

    assert!(output.status.success(), "cli exited unsuccessfully: {:?}", output);
    let json = stdout_json(&output);
    assert!(json["raw_string"].as_str().unwrap().starts_with("https://go.example/"));
    assert_eq!(
        json["short_link_source"],
        "https://example.com/a/very/long/path?campaign=spring"
    );
}

#[test]
fn record_and_list_history() {
    let history = temp_file("history.json");
    let history_arg = history.to_str().unwrap();

    let output = qrforge(&[
        "--history-file",
        history_arg,
        "encode",
        "--type",
        "phone",
        "-f",
        "number=+15551234567",
        "--record",
        "--fg",
        "#112233",
    ]);
    assert!(output.status.success(), "cli exited unsuccessfully: {:?}", output);

    let output = qrforge(&["--json", "--history-file", history_arg, "history"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json[0]["raw_string"], "tel:+15551234567");
    assert_eq!(json[0]["colors"]["foreground"], "#112233");

    let output = qrforge(&["--history-file", history_arg, "history", "--clear"]);
    assert!(output.status.success());
    let _ = std::fs::remove_file(&history);
}

#[test]
fn record_without_history_file_fails() {
    let output = qrforge(&["encode", "--type", "text", "-f", "text=hi", "--record"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no history file configured"));
}
