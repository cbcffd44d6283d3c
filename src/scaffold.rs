//! 脚手架模块：
//! - `reset` 把 init-files/ 中的模板覆盖到工作文件
//! - `run_project` 重置后按顺序执行指定项目的步骤
//! - 未知项目时打印可用项目列表

use anyhow::{Context, Result};
use std::{fmt::Write as _, fs};

use crate::{
    config::{Catalog, FileRole, InitFileSet, Step},
    install::{InstallOutcome, Installer},
    patch::{apply_patch, PatchOutcome},
};

/// 一次运行的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct RunReport {
    /// 是否匹配到项目
    pub(crate) matched: bool,
    pub(crate) applied: usize,
    pub(crate) missing_anchors: usize,
    pub(crate) failed: usize,
}

/// 将所有工作文件恢复为模板内容。遇到第一个错误即返回，已复制的文件不回滚。
pub(crate) fn reset(files: &InitFileSet) -> Result<()> {
    for role in FileRole::ALL {
        let from = files.init_path(role);
        let to = files.live_path(role);
        if let Some(parent) = to.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("创建目录失败: {}", parent.display()))?;
            }
        }
        fs::copy(&from, &to)
            .with_context(|| format!("重置失败: {} -> {}", from.display(), to.display()))?;
        tracing::debug!(from = %from.display(), to = %to.display(), "reset");
    }
    Ok(())
}

/// 重置工作文件并执行 `key` 对应的项目步骤。
/// 插入失败只记录并继续；额外安装步骤非 0 退出则中止。
pub(crate) fn run_project(
    files: &InitFileSet,
    catalog: &Catalog,
    key: Option<&str>,
    installer: &Installer,
) -> Result<RunReport> {
    reset(files)?;

    let mut report = RunReport::default();
    let Some(project) = key.and_then(|k| catalog.get(k)) else {
        if let Some(k) = key {
            eprintln!("⚠️ 未知项目: {}", k);
        }
        eprintln!("{}", usage(catalog));
        return Ok(report);
    };
    report.matched = true;
    println!("ℹ️ 项目: {}", project.key);

    for (idx, step) in project.steps.iter().enumerate() {
        tracing::debug!(project = %project.key, step = idx + 1, ?step, "running step");
        match step {
            Step::Patch(op) => {
                let path = files.live_path(op.file);
                match apply_patch(&path, &op.anchor, &op.content) {
                    Ok(PatchOutcome::Applied { occurrences }) => {
                        if occurrences > 1 {
                            eprintln!("⚠️ 锚点 \"{}\" 出现 {} 次，内容已重复插入", op.anchor, occurrences);
                        }
                        report.applied += 1;
                    }
                    Ok(PatchOutcome::AnchorMissing) => report.missing_anchors += 1,
                    Err(e) => {
                        eprintln!("❌ 文件操作失败: {:#}", e);
                        tracing::error!(file = %path.display(), error = %e, "patch failed");
                        report.failed += 1;
                    }
                }
            }
            Step::Install(args) => {
                if let InstallOutcome::SpawnFailed(msg) = installer.install(args.as_slice())? {
                    tracing::debug!(%msg, "extra install did not start");
                }
            }
        }
    }
    Ok(report)
}

/// 可用项目列表
pub(crate) fn usage(catalog: &Catalog) -> String {
    let example = catalog
        .get("directives")
        .or_else(|| catalog.projects().first())
        .map(|p| p.key.as_str())
        .unwrap_or("<project-name>");
    let width = catalog.projects().iter().map(|p| p.key.len()).max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "用法: projects [project-name]");
    let _ = writeln!(out, "示例: projects {}", example);
    let _ = writeln!(out, "project-name:");
    for p in catalog.projects() {
        match p.description.as_deref() {
            Some(desc) => {
                let _ = writeln!(out, "  {:<width$}  {}", p.key, desc, width = width);
            }
            None => {
                let _ = writeln!(out, "  {}", p.key);
            }
        }
    }
    out
}
