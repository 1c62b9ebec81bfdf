// citnames/tests/cli.rs
use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use tempfile::tempdir;

const COMPILE: &str = r#"{"executable":"/usr/bin/gcc","arguments":["gcc","-c","foo.c","-o","foo.o","-Wall"],"working_dir":"/project"}"#;
const MAKE: &str =
    r#"{"executable":"/usr/bin/make","arguments":["make","-j4"],"working_dir":"/project"}"#;

#[test]
fn test_citnames_help() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("citnames")?;
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage: citnames"));
    Ok(())
}

#[test]
fn test_stdin_to_stdout() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;

    let mut cmd = Command::cargo_bin("citnames")?;
    cmd.current_dir(work_dir.path());
    cmd.write_stdin(format!("{COMPILE}\n{MAKE}\n"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""recognized":{"type":"compile""#))
        .stdout(predicate::str::contains(r#""source_files":["foo.c"]"#))
        .stdout(predicate::str::contains(r#""result":"not_compiler_call""#));

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_malformed_line_is_skipped() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;

    let mut cmd = Command::cargo_bin("citnames")?;
    cmd.current_dir(work_dir.path());
    cmd.write_stdin(format!("not an execution\n{MAKE}\n"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let output = String::from_utf8(output)?;
    assert_eq!(output.lines().count(), 1);
    assert!(output.contains("not_compiler_call"));

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_files_and_configuration() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let config_file = work_dir.path().join("config.yml");
    let input_file = work_dir.path().join("events.json");
    let output_file = work_dir.path().join("semantics.json");

    std::fs::write(
        &config_file,
        "schema: \"4.0\"\ncompilers:\n  - path: /usr/bin/make\n    as: gcc\n  - path: /usr/bin/gcc\n    ignore: true\n",
    )?;
    let hinted =
        r#"{"executable":"/usr/bin/make","arguments":["make","-c","bar.c"],"working_dir":"/project"}"#;
    std::fs::write(&input_file, format!("{COMPILE}\n{hinted}\n"))?;

    let mut cmd = Command::cargo_bin("citnames")?;
    cmd.current_dir(work_dir.path());
    cmd.arg("-c").arg(&config_file);
    cmd.arg("-i").arg(&input_file);
    cmd.arg("-o").arg(&output_file);
    cmd.assert().success();

    let output = std::fs::read_to_string(&output_file)?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(r#""result":"not_compiler_call""#));
    assert!(lines[1].contains(r#""source_files":["bar.c"]"#));

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_invalid_configuration_fails() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let config_file = work_dir.path().join("config.yml");
    std::fs::write(&config_file, "schema: \"3.0\"\n")?;

    let mut cmd = Command::cargo_bin("citnames")?;
    cmd.current_dir(work_dir.path());
    cmd.arg("--config").arg(&config_file);
    cmd.write_stdin("");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported schema version"));

    work_dir.close()?;
    Ok(())
}

#[test]
fn test_missing_input_file_fails() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;

    let mut cmd = Command::cargo_bin("citnames")?;
    cmd.current_dir(work_dir.path());
    cmd.args(["-i", "missing.json"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open input file"));

    work_dir.close()?;
    Ok(())
}
