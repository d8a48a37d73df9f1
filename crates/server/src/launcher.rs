//! Worker launchers.
//!
//! A launcher starts one worker for one site and hands back a
//! [`WorkerHandle`]: a one-shot channel the worker's result arrives on, and
//! the task feeding it. Dropping or terminating the handle aborts that task.
//!
//! - [`ProcessLauncher`] runs each worker as a child process of the current
//!   binary (`<exe> --config <path> worker --site <name>`). A reader task
//!   watches the child's stdout for the result line. The child is killed
//!   when the task is aborted.
//! - [`InProcessLauncher`] runs the worker on tokio's blocking pool. Used
//!   for single-shot runs and tests; a blocking worker cannot be killed, its
//!   result is simply ignored once the handle is gone.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use model::{AppConfig, WorkResult};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::worker::run_site_worker;

/// A running worker
pub struct WorkerHandle {
    pub site: String,
    pub result: oneshot::Receiver<WorkResult>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn new(
        site: impl Into<String>,
        result: oneshot::Receiver<WorkResult>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            site: site.into(),
            result,
            task,
        }
    }

    /// Stop the worker; its result, if any, is discarded
    pub fn terminate(&self) {
        self.task.abort();
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Starts workers. Must be called from within a tokio runtime.
pub trait WorkerLauncher: Send + Sync {
    fn launch(&self, site: &str) -> WorkerHandle;
}

/// Runs each worker as a child process
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    config_path: PathBuf,
    debug: bool,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            config_path: config_path.into(),
            debug: false,
        }
    }

    /// Launch workers from the running executable
    pub fn current_exe(config_path: impl Into<PathBuf>) -> Result<Self> {
        let program = std::env::current_exe().context("Failed to locate the running executable")?;
        Ok(Self::new(program, config_path))
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn command(&self, site: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--config").arg(&self.config_path);
        if self.debug {
            cmd.arg("--debug");
        }
        cmd.arg("worker")
            .arg("--site")
            .arg(site)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        cmd
    }
}

impl WorkerLauncher for ProcessLauncher {
    fn launch(&self, site: &str) -> WorkerHandle {
        let (tx, rx) = oneshot::channel();
        let mut cmd = self.command(site);
        let name = site.to_string();

        let task = tokio::spawn(async move {
            let mut child = match cmd
                .spawn()
                .with_context(|| format!("Failed to start worker for {}", name))
            {
                Ok(child) => child,
                Err(e) => {
                    let _ = tx.send(WorkResult::error(format!("{:#}", e)));
                    return;
                }
            };

            let result = read_result(&mut child)
                .await
                .unwrap_or_else(|e| WorkResult::error(format!("{:#}", e)));
            let _ = tx.send(result);

            if let Err(e) = child.wait().await {
                warn!("Failed to reap worker for {}: {}", name, e);
            }
        });

        WorkerHandle::new(site, rx, task)
    }
}

/// First stdout line that parses as a result; anything else is ignored
async fn read_result(child: &mut Child) -> Result<WorkResult> {
    let stdout = child
        .stdout
        .take()
        .context("Worker stdout was not captured")?;
    let mut lines = BufReader::new(stdout).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read worker output")?
    {
        match WorkResult::from_line(&line) {
            Ok(result) => return Ok(result),
            Err(_) => debug!("Ignoring worker output: {}", line),
        }
    }

    let status = child.wait().await.context("Failed to wait for worker")?;
    bail!("Worker exited ({}) without reporting a result", status)
}

type WorkerFn = dyn Fn(&str) -> WorkResult + Send + Sync;

/// Runs each worker on the blocking thread pool of the current runtime
#[derive(Clone)]
pub struct InProcessLauncher {
    worker: Arc<WorkerFn>,
}

impl InProcessLauncher {
    /// Workers harvest the snapshot sites of `config`
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_worker(move |site| run_site_worker(&config, site))
    }

    /// Workers run `worker` with the site name
    pub fn with_worker<F>(worker: F) -> Self
    where
        F: Fn(&str) -> WorkResult + Send + Sync + 'static,
    {
        Self {
            worker: Arc::new(worker),
        }
    }
}

impl WorkerLauncher for InProcessLauncher {
    fn launch(&self, site: &str) -> WorkerHandle {
        let (tx, rx) = oneshot::channel();
        let worker = Arc::clone(&self.worker);
        let name = site.to_string();

        let task = tokio::spawn(async move {
            let job = tokio::task::spawn_blocking(move || worker(&name));
            let result = match job.await {
                Ok(result) => result,
                Err(e) => WorkResult::error(format!("Worker task failed: {}", e)),
            };
            let _ = tx.send(result);
        });

        WorkerHandle::new(site, rx, task)
    }
}
