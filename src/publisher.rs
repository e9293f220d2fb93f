use crate::model::PublishError;
use chrono::Local;
use std::path::Path;
use tokio::process::Command;

/// Commits and pushes the generated artifacts, running git with `base_dir`
/// as working directory so the artifact names stay relative. Stops at the
/// first failing command and carries its captured stderr.
pub async fn publish(
    base_dir: &Path,
    remote: &str,
    branch: &str,
    artifacts: &[&str],
) -> Result<(), PublishError> {
    let mut add = Command::new("git");
    add.current_dir(base_dir).arg("add").args(artifacts);
    run_git(add, "git add").await?;

    let message = format!(
        "更新 Telegram 獎品網址整理 {}",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    let mut commit = Command::new("git");
    commit.current_dir(base_dir).args(["commit", "-m", &message]);
    run_git(commit, "git commit").await?;

    let mut push = Command::new("git");
    push.current_dir(base_dir).args(["push", remote, branch]);
    run_git(push, "git push").await?;

    Ok(())
}

async fn run_git(mut command: Command, context: &str) -> Result<(), PublishError> {
    let output = command
        .output()
        .await
        .map_err(|source| PublishError::Spawn {
            cmd: context.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(PublishError::CommandFailed {
            cmd: context.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
