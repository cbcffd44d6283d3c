//! 依赖安装模块：调用包管理器，子进程输出直接透传到当前终端

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};
use anyhow::{Context, Result};
use thiserror::Error;

/// 通用安装步骤的参数
pub(crate) const DEFAULT_INSTALL_ARGS: &[&str] = &["install"];

/// 默认包管理器
pub(crate) fn default_package_manager() -> &'static str {
    if cfg!(windows) { "npm.cmd" } else { "npm" }
}

/// 安装进程未正常结束
#[derive(Debug, Error)]
pub(crate) enum InstallError {
    #[error("依赖安装失败，进程退出码 {0}")]
    ExitCode(i32),
    #[error("依赖安装进程被信号终止")]
    Terminated,
}

impl InstallError {
    /// 作为本进程的退出码
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            InstallError::ExitCode(code) => *code,
            InstallError::Terminated => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InstallOutcome {
    Succeeded,
    /// 子进程未能启动；只打印，不视为失败
    SpawnFailed(String),
    /// 安装被禁用
    Skipped,
}

/// 以固定的包管理器与工作目录执行安装
#[derive(Debug, Clone)]
pub(crate) struct Installer {
    program: String,
    cwd: PathBuf,
    enabled: bool,
}

impl Installer {
    pub(crate) fn new(program: impl Into<String>, cwd: impl Into<PathBuf>, enabled: bool) -> Self {
        Self { program: program.into(), cwd: cwd.into(), enabled }
    }

    pub(crate) fn install<S: AsRef<str>>(&self, args: &[S]) -> Result<InstallOutcome> {
        if !self.enabled {
            let joined: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
            println!("ℹ️ 跳过依赖安装: {} {}", self.program, joined.join(" "));
            return Ok(InstallOutcome::Skipped);
        }
        install_dependencies(&self.program, args, &self.cwd)
    }
}

/// 启动 `program args…` 并等待结束。
/// 退出码为 0 时成功；非 0 返回 `InstallError`；启动失败只打印并返回 `SpawnFailed`。
pub(crate) fn install_dependencies<S: AsRef<str>>(program: &str, args: &[S], cwd: &Path) -> Result<InstallOutcome> {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|a| a.as_ref()))
        .current_dir(cwd)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    tracing::debug!(?cmd, "spawning package manager");

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            eprintln!("❌ 启动子进程失败: {}: {}", program, e);
            return Ok(InstallOutcome::SpawnFailed(e.to_string()));
        }
    };
    let status = child
        .wait()
        .with_context(|| format!("等待子进程失败: {}", program))?;

    match status.code() {
        Some(0) => {
            println!("\n✅ 进程正常退出。");
            Ok(InstallOutcome::Succeeded)
        }
        Some(code) => {
            eprintln!("\n❌ 进程退出码: {}", code);
            Err(InstallError::ExitCode(code).into())
        }
        None => {
            eprintln!("\n❌ 进程被信号终止");
            Err(InstallError::Terminated.into())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const NO_ARGS: &[&str] = &[];

    #[test]
    fn zero_exit_succeeds() {
        let dir = TempDir::new().unwrap();
        let outcome = install_dependencies("true", NO_ARGS, dir.path()).unwrap();
        assert_eq!(outcome, InstallOutcome::Succeeded);
    }

    #[test]
    fn non_zero_exit_is_rejected_with_code() {
        let dir = TempDir::new().unwrap();
        let err = install_dependencies("sh", &["-c", "exit 3"], dir.path()).unwrap_err();
        let install_err = err.downcast_ref::<InstallError>().unwrap();
        assert!(matches!(install_err, InstallError::ExitCode(3)));
        assert_eq!(install_err.exit_code(), 3);
    }

    #[test]
    fn runs_in_working_tree() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let outcome = install_dependencies("sh", &["-c", "test -f marker"], dir.path()).unwrap();
        assert_eq!(outcome, InstallOutcome::Succeeded);
    }

    #[test]
    fn spawn_failure_is_reported_not_rejected() {
        let dir = TempDir::new().unwrap();
        let outcome = install_dependencies("ia-projects-no-such-binary", &["install"], dir.path()).unwrap();
        assert!(matches!(outcome, InstallOutcome::SpawnFailed(_)));
    }

    #[test]
    fn disabled_installer_skips() {
        let dir = TempDir::new().unwrap();
        let installer = Installer::new("false", dir.path(), false);
        assert_eq!(installer.install(&["install"]).unwrap(), InstallOutcome::Skipped);
    }
}
