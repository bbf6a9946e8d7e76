use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

const PRICES_WSDL: &str = include_str!("fixtures/prices.wsdl");
const ROUND_TRIP: &str = include_str!("fixtures/round_trip.rs");

fn workspace_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

fn generator(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_st-generator"))
        .args(args)
        .output()
        .unwrap()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write_wsdl(dir: &Path) -> String {
    let path = dir.join("prices.wsdl");
    fs::write(&path, PRICES_WSDL).unwrap();
    path.to_str().unwrap().to_string()
}

/// Lays out a crate depending on the runtime, with the round trip tests next to it.
fn client_crate(dir: &Path) {
    let manifest = format!(
        r#"[package]
name = "prices-client"
version = "0.0.0"
edition = "2021"
publish = false

[dependencies]
st-builtins = {{ path = {:?} }}

[workspace]
"#,
        workspace_dir().join("builtins").to_str().unwrap()
    );
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::create_dir_all(dir.join("tests")).unwrap();
    fs::write(dir.join("Cargo.toml"), manifest).unwrap();
    fs::write(dir.join("src/lib.rs"), "pub mod prices;\n").unwrap();
    fs::write(dir.join("tests/round_trip.rs"), ROUND_TRIP).unwrap();

    let lock = workspace_dir().join("Cargo.lock");
    if lock.exists() {
        fs::copy(lock, dir.join("Cargo.lock")).unwrap();
    }
}

#[test]
fn generated_client_compiles_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let wsdl = write_wsdl(dir.path());
    let crate_dir = dir.path().join("prices-client");
    client_crate(&crate_dir);

    let modules = crate_dir.join("src/prices");
    assert_success(&generator(&[
        "generate-client",
        &wsdl,
        modules.to_str().unwrap(),
    ]));
    for file in ["mod.rs", "types.rs", "messages.rs", "client.rs"] {
        assert!(modules.join(file).is_file(), "{file} was not written");
    }

    // A separate target directory, the outer build holds the lock on the workspace one.
    let output = Command::new(env!("CARGO"))
        .args(["test", "--offline", "--quiet"])
        .current_dir(&crate_dir)
        .env(
            "CARGO_TARGET_DIR",
            workspace_dir().join("target").join("generated-client"),
        )
        .output()
        .unwrap();
    assert_success(&output);
}

#[test]
fn bindings_are_limited_to_the_selection() {
    let dir = tempfile::tempdir().unwrap();
    let wsdl = write_wsdl(dir.path());
    let output = dir.path().join("bindings.rs");
    assert_success(&generator(&[
        "generate-bindings",
        "--from-wsdl",
        "--only",
        "GetPriceResponse",
        &wsdl,
        output.to_str().unwrap(),
    ]));

    let source = fs::read_to_string(output).unwrap();
    assert!(source.contains("pub struct GetPriceResponseComplexType"));
    assert!(source.contains("pub struct AmountSimpleType"));
    assert!(source.contains("pub struct CurrencySimpleType"));
    assert!(!source.contains("pub struct GetPriceComplexType"));
}

#[test]
fn unreadable_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.wsdl");
    let output = generator(&[
        "generate-client",
        missing.to_str().unwrap(),
        dir.path().join("out").to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(!dir.path().join("out/mod.rs").exists());
}
