use assert_cmd::Command;

/// The name of the CLI binary
const BINARY: &str = "girts";

/// Check that "girts --version" works correctly
#[test]
fn version_command() {
    let mut cmd = Command::cargo_bin(BINARY).unwrap();
    let assert = cmd.arg("--version").assert();
    assert.success().stdout("girts 0.1.0\n");
}

/// Check that "girts list" finds the fixture modules
#[test]
fn list_command() {
    let mut cmd = Command::cargo_bin(BINARY).unwrap();
    let assert = cmd.args(["list", "-g", "../fixtures"]).assert();
    assert.success().stdout("GObject-2.0\nTest-1.0\n");
}

/// Check that "girts generate" writes declaration files and stubs
#[test]
fn generate_command() {
    let outdir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin(BINARY).unwrap();
    let assert = cmd
        .args(["generate", "Test-1.0", "-g", "../fixtures", "-o"])
        .arg(outdir.path())
        .assert();
    assert.success();

    let dts = std::fs::read_to_string(outdir.path().join("Test-1.0.d.ts")).unwrap();
    assert!(dts.contains("export enum Direction {"));
    assert!(dts.contains("export class Widget extends GObject.Object"));
    assert!(dts.contains("static get_default(): Widget"));
    assert!(dts.contains("vfunc_show(): void"));
    assert!(dts.contains("connect(sigName: \"clicked\""));

    let stub = std::fs::read_to_string(outdir.path().join("Test-1.0.js")).unwrap();
    assert!(stub.contains("imports.gi.Test"));

    // Dependencies are generated too
    assert!(outdir.path().join("GObject-2.0.d.ts").exists());
}
