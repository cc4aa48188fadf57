use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

/// Stands in for `python3 setup.py <target>`: records the state of the
/// output dirs, then drops one artifact into dist/.
const FAKE_SETUP: &str = r#"
echo "build $1 dist=$(ls dist 2>/dev/null | wc -l | tr -d ' ') build=$(ls build 2>/dev/null | wc -l | tr -d ' ')" >> log.txt
mkdir -p dist
if [ "$1" = sdist ]; then
    touch dist/pkg-1.0.tar.gz
else
    touch dist/pkg-1.0-py3-none-any.whl
fi
exit ${SETUP_EXIT:-0}
"#;

const FAKE_UPLOAD: &str = r#"
echo "upload $*" >> log.txt
exit ${UPLOAD_EXIT:-0}
"#;

struct Project {
    dir: tempfile::TempDir,
    config: PathBuf,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("setup.py"), FAKE_SETUP).unwrap();
        std::fs::write(root.join("upload.sh"), FAKE_UPLOAD).unwrap();
        for stale in ["dist/pkg-0.9.tar.gz", "build/lib/src/main.py"] {
            let path = root.join(stale);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"old").unwrap();
        }

        let config = root.join("tools.toml");
        std::fs::write(
            &config,
            "[publisher]\npython = \"sh\"\nupload_program = \"sh\"\nupload_args = [\"upload.sh\"]\n",
        )
        .unwrap();

        Self { dir, config }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("publish_package").unwrap();
        cmd.current_dir(self.root()).arg("--config").arg(&self.config);
        cmd
    }

    fn log(&self) -> Vec<String> {
        std::fs::read_to_string(self.root().join("log.txt"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(unix)]
#[test]
fn cleans_then_builds_then_uploads_fresh_artifacts() {
    let project = Project::new();

    project.command().assert().success();

    assert_eq!(
        project.log(),
        vec![
            "build sdist dist=0 build=0",
            "build bdist_wheel dist=1 build=0",
            "upload dist/pkg-1.0-py3-none-any.whl dist/pkg-1.0.tar.gz",
        ]
    );
    assert!(project.root().join("build").is_dir());
}

#[cfg(unix)]
#[test]
fn failing_builds_are_still_followed_by_upload() {
    let project = Project::new();

    project.command().env("SETUP_EXIT", "1").assert().success();

    let log = project.log();
    assert_eq!(log.len(), 3);
    assert!(log[2].starts_with("upload "));
}

#[cfg(unix)]
#[test]
fn upload_exit_code_is_reported() {
    let project = Project::new();
    project.command().env("UPLOAD_EXIT", "3").assert().code(3);
}

#[cfg(unix)]
#[test]
fn fail_fast_skips_remaining_steps() {
    let project = Project::new();

    project
        .command()
        .arg("--fail-fast")
        .env("SETUP_EXIT", "4")
        .assert()
        .code(4);

    assert_eq!(project.log(), vec!["build sdist dist=0 build=0"]);
}

#[cfg(unix)]
#[test]
fn repository_is_forwarded_to_upload() {
    let project = Project::new();

    project.command().args(["-r", "testpypi"]).assert().success();

    assert!(project.log()[2].starts_with("upload --repository testpypi dist/"));
}

#[test]
fn dry_run_prints_plan_and_leaves_files_alone() {
    let project = Project::new();
    let config = project.root().join("empty.toml");
    std::fs::write(&config, "").unwrap();

    let mut cmd = Command::cargo_bin("publish_package").unwrap();
    cmd.current_dir(project.root())
        .arg("--dry-run")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("rm -rf "))
        .stdout(predicate::str::contains("python3 setup.py sdist"))
        .stdout(predicate::str::contains("python3 setup.py bdist_wheel"))
        .stdout(predicate::str::contains("twine upload"))
        .stdout(predicate::str::contains("dist/*"));

    assert!(project.root().join("dist/pkg-0.9.tar.gz").exists());
    assert!(project.log().is_empty());
}

#[test]
fn empty_repository_is_rejected() {
    let project = Project::new();
    project
        .command()
        .args(["--repository", " "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--repository cannot be empty"));
}
