#![cfg(unix)]

use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::{os::unix::fs::PermissionsExt, path::PathBuf, process::Command}; // Run programs

/// A stand-in for the docker CLI knowing two containers: `1111 nginx web` and `2222 alpine worker`
const FAKE_DOCKER: &str = r#"#!/bin/sh
case "$1" in
  ps)
    [ -n "$FAKE_DOCKER_EMPTY" ] && exit 0
    case "$*" in
      *"--filter id=2222"*) echo "2222 alpine worker" ;;
      *"--filter name=web"*) echo "1111 nginx web" ;;
      *"--filter"*) ;;
      *) printf '1111 nginx web\n2222 alpine worker\n' ;;
    esac
    ;;
  exec)
    if [ "$2" = "-it" ]; then
      echo "attached $3 $4"
      exit 5
    fi
    case "$3" in
      cat) printf '# valid login shells\n/bin/sh\n/bin/bash\n' ;;
      which)
        [ "$4" = "top" ] || exit 1
        echo /usr/bin/top
        ;;
    esac
    ;;
esac
"#;

fn fake_docker(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("docker");
    std::fs::write(&path, FAKE_DOCKER).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn dsh(docker: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("dsh").unwrap();
    cmd.arg("--docker").arg(docker).env_remove("RUST_LOG");
    cmd
}

#[test]
fn attaches_with_the_preferred_shell() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let docker = fake_docker(&dir);

    dsh(&docker)
        .arg("2222")
        .assert()
        .code(5)
        .stdout(predicate::str::contains(
            "Running /bin/bash in worker (2222).\nattached 2222 /bin/bash\n",
        ));
    Ok(())
}

#[test]
fn falls_back_to_the_container_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let docker = fake_docker(&dir);

    dsh(&docker)
        .arg("web")
        .assert()
        .stdout(predicate::str::contains("Running /bin/bash in web (1111)."));
    Ok(())
}

#[test]
fn unknown_containers_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let docker = fake_docker(&dir);

    dsh(&docker)
        .arg("db")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Could not find container matching 'db'.",
        ));
    Ok(())
}

#[test]
fn several_containers_prompt_for_a_choice() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let docker = fake_docker(&dir);

    assert_cmd::Command::from_std(dsh(&docker))
        .write_stdin("x\n2\n")
        .assert()
        .code(5)
        .stdout(predicate::str::contains(
            "1. 1111 nginx web\n2. 2222 alpine worker\nInvalid choice.\n",
        ))
        .stdout(predicate::str::contains("Running /bin/bash in worker (2222)."))
        .stderr(predicate::str::contains("> > "));
    Ok(())
}

#[test]
fn closing_the_prompt_attaches_nowhere() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let docker = fake_docker(&dir);

    assert_cmd::Command::from_std(dsh(&docker))
        .write_stdin("")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Running").not());
    Ok(())
}

#[test]
fn no_running_containers() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let docker = fake_docker(&dir);

    dsh(&docker)
        .env("FAKE_DOCKER_EMPTY", "1")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("There are no running containers."));
    Ok(())
}

#[test]
fn requested_commands_are_resolved_in_the_container() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let docker = fake_docker(&dir);

    dsh(&docker)
        .args(["--command", "top", "2222"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains("Running /usr/bin/top in worker (2222)."));

    dsh(&docker)
        .args(["-c", "htop", "2222"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Could not find 'htop' in 2222."));
    Ok(())
}

#[test]
fn missing_docker_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    let mut cmd = Command::cargo_bin("dsh")?;
    cmd.env("PATH", dir.path())
        .env_remove("RUST_LOG")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'docker' not found."));
    Ok(())
}

#[test]
fn non_executable_docker_on_path_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let stray = tempfile::tempdir()?;
    std::fs::write(stray.path().join("docker"), "not a program\n")?;
    std::fs::set_permissions(
        stray.path().join("docker"),
        std::fs::Permissions::from_mode(0o644),
    )?;

    let real = tempfile::tempdir()?;
    fake_docker(&real);

    let mut cmd = Command::cargo_bin("dsh")?;
    cmd.env("PATH", std::env::join_paths([stray.path(), real.path()])?)
        .env_remove("RUST_LOG")
        .arg("2222")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("attached 2222 /bin/bash"));
    Ok(())
}
