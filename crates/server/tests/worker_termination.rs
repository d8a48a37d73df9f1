//! Worker processes must not outlive the orchestrator that started them.
//!
//! The worker program here is a shell script that records its pid and then
//! blocks, so it never reports a result on its own.

#![cfg(target_os = "linux")]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use model::{AppConfig, WorkResult};
use server::{HarvestOrchestrator, ProcessLauncher};
use tempfile::TempDir;

const CONFIG: &str = "cycle_sleep_secs: 60\npoll_interval_secs: 1\nsites:\n  - {name: slow, snapshot: slow.json}\n";

// Arguments are `--config <path> worker --site <name>`
const SLEEPER: &str = "#!/bin/sh\necho $$ > \"$(dirname \"$2\")/$5.pid\"\nexec sleep 30\n";

struct Fixture {
    dir: TempDir,
    config: Arc<AppConfig>,
    launcher: ProcessLauncher,
}

fn setup() -> Fixture {
    let dir = TempDir::new().unwrap();

    let script = dir.path().join("sleeper.sh");
    fs::write(&script, SLEEPER).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let config_path = dir.path().join("harvester.yml");
    fs::write(&config_path, CONFIG).unwrap();
    let config = Arc::new(AppConfig::load(&config_path).unwrap());

    Fixture {
        launcher: ProcessLauncher::new(script, config_path),
        config,
        dir,
    }
}

fn pid_file(dir: &Path) -> PathBuf {
    dir.join("slow.pid")
}

/// Wait until the worker has written its pid
async fn worker_pid(dir: &Path) -> u32 {
    let path = pid_file(dir);
    for _ in 0..200 {
        if let Ok(text) = fs::read_to_string(&path) {
            if let Ok(pid) = text.trim().parse() {
                return pid;
            }
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("worker never wrote {}", path.display());
}

/// Still in the process table and not a zombie waiting to be reaped
fn is_alive(pid: u32) -> bool {
    match fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => {
            let state = stat.rsplit(')').next().and_then(|rest| rest.split_whitespace().next());
            state != Some("Z")
        }
        Err(_) => false,
    }
}

async fn assert_dies(pid: u32) {
    for _ in 0..100 {
        if !is_alive(pid) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("worker {} is still running", pid);
}

#[tokio::test]
async fn test_shutdown_kills_live_worker() {
    let fixture = setup();
    let dir = fixture.dir.path().to_path_buf();
    let orchestrator = HarvestOrchestrator::new(fixture.config.clone(), fixture.launcher).unwrap();

    let shutdown = {
        let dir = dir.clone();
        async move {
            worker_pid(&dir).await;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    };
    orchestrator.run(shutdown).await.unwrap();

    let pid = worker_pid(&dir).await;
    assert_dies(pid).await;
}

#[tokio::test]
async fn test_cycle_end_kills_unreported_worker() {
    let fixture = setup();
    let dir = fixture.dir.path().to_path_buf();
    let orchestrator = HarvestOrchestrator::new(fixture.config.clone(), fixture.launcher)
        .unwrap()
        .with_timing(Duration::from_millis(1500), Duration::from_millis(50));

    let report = orchestrator.run_cycle(1).await;

    assert_eq!(report.len(), 1);
    assert_eq!(report[0].0, "slow");
    match &report[0].1 {
        WorkResult::Error { message, .. } => assert!(message.contains("did not report")),
        other => panic!("expected an error result, got {:?}", other),
    }

    let pid = worker_pid(&dir).await;
    assert_dies(pid).await;
}
