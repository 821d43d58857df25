use std::path::PathBuf;
use std::process::Stdio;
use tracing::{debug, warn};

/// Launches an external tuner/player/stop executable.
///
/// Invocations are fire-and-forget: the only signal available is whether the
/// process started. Nothing here waits for, times out or cancels the child.
pub trait ActionEffector: Send + Sync {
    fn invoke(&self, command: &str, args: &[String]) -> bool;
}

/// Spawns commands resolved against a base directory, with the child's
/// stdout/stderr detached.
pub struct ProcessEffector {
    base_dir: PathBuf,
}

impl ProcessEffector {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }
}

impl ActionEffector for ProcessEffector {
    fn invoke(&self, command: &str, args: &[String]) -> bool {
        let program = self.base_dir.join(command);
        match tokio::process::Command::new(&program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                debug!(command, pid = child.id(), "effector launched");
                true
            }
            Err(e) => {
                warn!(command, program = %program.display(), "effector launch failed: {}", e);
                false
            }
        }
    }
}
