use std::{
    fs,
    io::{Read, Write},
    process,
};

use assert_cmd::Command;
use predicates::str::{contains, is_empty};
use rstest::*;
use tempfile::{tempdir, NamedTempFile, TempDir};

fn cmd() -> Command {
    Command::cargo_bin("itch4").unwrap()
}

#[fixture]
fn output_dir() -> TempDir {
    tempdir().unwrap()
}

/// A timestamp followed by an add order, as they would appear on the wire.
fn sample_bytes() -> Vec<u8> {
    let mut bytes = vec![b'T'];
    bytes.extend_from_slice(&34_200u32.to_be_bytes());
    bytes.push(b'A');
    bytes.extend_from_slice(&1000u32.to_be_bytes());
    bytes.extend_from_slice(&42u64.to_be_bytes());
    bytes.push(b'B');
    bytes.extend_from_slice(&500u32.to_be_bytes());
    bytes.extend_from_slice(b"AAPL    ");
    bytes.extend_from_slice(&1_500_000u32.to_be_bytes());
    bytes
}

const SAMPLE_CSV: &str = "T,34200\nA,1000,42,B,500,AAPL    ,1500000\n";

fn write_input_file(dir: &TempDir, bytes: &[u8]) -> String {
    let path = format!("{}/input.itch", dir.path().to_str().unwrap());
    fs::write(&path, bytes).unwrap();
    path
}

#[rstest]
fn write_csv_to_stdout(output_dir: TempDir) {
    let input_path = write_input_file(&output_dir, &sample_bytes());
    cmd()
        .arg(&input_path)
        .assert()
        .success()
        .stdout(SAMPLE_CSV)
        .stderr(is_empty());
}

#[test]
fn read_from_stdin() {
    cmd()
        .arg("-")
        .write_stdin(sample_bytes())
        .assert()
        .success()
        .stdout(SAMPLE_CSV);
}

#[rstest]
fn write_csv_to_path(output_dir: TempDir) {
    let input_path = write_input_file(&output_dir, &sample_bytes());
    let output_path = format!("{}/a.csv", output_dir.path().to_str().unwrap());
    cmd()
        .args([&input_path, "--output", &output_path])
        .assert()
        .success()
        .stdout(is_empty());
    assert_eq!(fs::read_to_string(&output_path).unwrap(), SAMPLE_CSV);
}

#[rstest]
fn no_overwrite_without_force(output_dir: TempDir) {
    let input_path = write_input_file(&output_dir, &sample_bytes());
    let output_path = format!("{}/a.csv", output_dir.path().to_str().unwrap());
    fs::write(&output_path, "contents").unwrap();
    cmd()
        .args([&input_path, "--output", &output_path])
        .assert()
        .failure()
        .stderr(contains("Output file exists"));
    assert_eq!(fs::read_to_string(&output_path).unwrap(), "contents");
    cmd()
        .args([&input_path, "--output", &output_path, "--force"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&output_path).unwrap(), SAMPLE_CSV);
}

#[rstest]
fn limit_record_count(output_dir: TempDir) {
    let input_path = write_input_file(&output_dir, &sample_bytes());
    cmd()
        .args([&input_path, "--limit", "1"])
        .assert()
        .success()
        .stdout("T,34200\n");
}

#[rstest]
fn truncated_input_keeps_prior_records(output_dir: TempDir) {
    let mut bytes = sample_bytes();
    // chop the add order mid-field
    bytes.truncate(bytes.len() - 7);
    let input_path = write_input_file(&output_dir, &bytes);
    cmd()
        .arg(&input_path)
        .assert()
        .failure()
        .stdout("T,34200\n")
        .stderr(contains("truncated input"));
}

#[rstest]
fn unknown_type_code(output_dir: TempDir) {
    let mut bytes = sample_bytes();
    bytes.push(b'z');
    let input_path = write_input_file(&output_dir, &bytes);
    cmd()
        .arg(&input_path)
        .assert()
        .failure()
        .stdout(SAMPLE_CSV)
        .stderr(contains("couldn't convert"));
}

#[rstest]
fn infers_zstd_compressed_input(output_dir: TempDir) {
    let compressed = zstd::encode_all(sample_bytes().as_slice(), 0).unwrap();
    let input_path = write_input_file(&output_dir, &compressed);
    cmd()
        .arg(&input_path)
        .assert()
        .success()
        .stdout(SAMPLE_CSV);
}

#[test]
fn read_from_nonexistent_path() {
    let input_file = NamedTempFile::new().unwrap();
    let input_path = input_file.path().to_owned();
    // delete it so the path no longer exists
    drop(input_file);
    cmd()
        .arg(input_path)
        .assert()
        .failure()
        .stderr(contains("opening file to decode"));
}

#[test]
fn broken_pipe_is_silent() {
    // enough output to overflow the pipe buffer
    let mut bytes = Vec::new();
    for _ in 0..20_000 {
        bytes.extend_from_slice(&sample_bytes());
    }
    let mut input_file = NamedTempFile::new().unwrap();
    input_file.write_all(&bytes).unwrap();
    input_file.flush().unwrap();

    let mut itch_res = process::Command::new(assert_cmd::cargo::cargo_bin("itch4"))
        .arg(input_file.path())
        .stdout(process::Stdio::piped())
        .stderr(process::Stdio::piped())
        .spawn()
        .unwrap();
    let mut false_cmd = process::Command::new("false");
    false_cmd.stdin(itch_res.stdout.take().unwrap());
    Command::from_std(false_cmd)
        .assert()
        .failure()
        .stdout(is_empty())
        .stderr(is_empty());
    assert!(itch_res.wait().unwrap().success());
    let mut stderr = String::new();
    itch_res
        .stderr
        .take()
        .unwrap()
        .read_to_string(&mut stderr)
        .unwrap();
    assert!(stderr.is_empty(), "Stderr: {stderr}");
}
