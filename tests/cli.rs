//! Integration tests for the k8s-overlay-patch binary.

use assert_cmd::Command;
use assert_fs::prelude::*;
use k8s_overlay_patch::manifest::parse_manifest;
use k8s_overlay_patch::value::{from_yaml, Value};
use k8s_overlay_patch::ObjectKey;
use predicates::prelude::*;

const PATCH: &str = "tests/testdata/patch.yaml";
const BAD_PATCH: &str = "tests/testdata/bad-patch.yaml";
const MANIFEST: &str = "tests/testdata/manifest.yaml";

fn overlay_patch() -> Command {
    Command::cargo_bin("k8s-overlay-patch").unwrap()
}

fn field<'a>(value: &'a Value, path: &[&str]) -> &'a Value {
    path.iter().fold(value, |v, key| {
        v.as_map()
            .and_then(|m| m.get(key))
            .unwrap_or_else(|| panic!("missing field {key}"))
    })
}

#[test]
fn patches_manifest_file_to_stdout() {
    let output = overlay_patch()
        .args(["-n", "test-namespace", "-p", PATCH, "-m", MANIFEST])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let objects = parse_manifest(&String::from_utf8(output.stdout).unwrap()).unwrap();
    let keys: Vec<_> = objects.iter().map(|o| o.key().clone()).collect();
    assert_eq!(
        keys,
        vec![
            ObjectKey::new("Deployment", "test-namespace", "test-deployment"),
            ObjectKey::new("Service", "test-namespace", "test-service"),
            ObjectKey::new("ClusterRole", "", "test-reader"),
        ]
    );

    let deployment = objects[0].tree();
    assert_eq!(
        field(deployment, &["metadata", "annotations", "my"]),
        &Value::from("annotation")
    );
    assert_eq!(field(deployment, &["spec", "replicas"]), &Value::Int(3));
    let containers = field(deployment, &["spec", "template", "spec", "containers"]);
    assert_eq!(
        field(&containers.as_list().unwrap()[0], &["args"]),
        &from_yaml("[--port=8080, --log-level=info]").unwrap()
    );

    let service = objects[1].tree();
    assert_eq!(
        field(service, &["metadata", "annotations", "my"]),
        &Value::from("annotation")
    );
    assert_eq!(
        field(service, &["spec", "ports"]),
        &from_yaml("[{name: http, port: 8080, targetPort: 80}]").unwrap()
    );
}

#[test]
fn reads_manifest_from_stdin_and_writes_out_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("out.yaml");
    let manifest = std::fs::read_to_string(MANIFEST).unwrap();

    overlay_patch()
        .args(["--namespace", "test-namespace", "--patch-file", PATCH, "--out"])
        .arg(out.path())
        .write_stdin(manifest)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    out.assert(predicate::str::contains("my: annotation"));
    out.assert(predicate::str::contains("---\n"));
    temp.close().unwrap();
}

#[test]
fn namespace_can_come_from_environment() {
    overlay_patch()
        .env("OVERLAY_NAMESPACE", "test-namespace")
        .args(["-p", PATCH, "-m", MANIFEST])
        .assert()
        .success()
        .stdout(predicate::str::contains("targetPort: 80"));
}

#[test]
fn verbose_logs_each_overlay() {
    overlay_patch()
        .env_remove("RUST_LOG")
        .args(["-v", "-n", "test-namespace", "-p", PATCH, "-m", MANIFEST])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "applying overlay Deployment:test-deployment",
        ))
        .stderr(predicate::str::contains("overlay for ConfigMap:"));
}

#[test]
fn quiet_by_default() {
    overlay_patch()
        .env_remove("RUST_LOG")
        .args(["-n", "test-namespace", "-p", PATCH, "-m", MANIFEST])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn wrong_namespace_reports_unmatched_overlays() {
    overlay_patch()
        .args(["-n", "elsewhere", "-p", PATCH, "-m", MANIFEST])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "overlay for Deployment:test-deployment does not match any object",
        ))
        .stderr(predicate::str::contains("not-rendered").not());
}

#[test]
fn reports_every_error_and_exits_non_zero() {
    overlay_patch()
        .args(["-n", "test-namespace", "-p", BAD_PATCH, "-m", MANIFEST])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no element matches [name:missing]"))
        .stderr(predicate::str::contains("overlay for Secret:absent"));
}

#[test]
fn missing_patch_file_fails() {
    overlay_patch()
        .args(["-p", "tests/testdata/does-not-exist.yaml", "-m", MANIFEST])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read patch file"));
}

#[test]
fn patch_file_is_required() {
    overlay_patch()
        .args(["-m", MANIFEST])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--patch-file"));
}
