//! 命令调度模块：
//! - 接收解析好的 CLI 参数，计算“有效参数”（CLI > 环境变量 > 默认值）
//! - 加载项目表，执行重置、插入与依赖安装

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::{
    cli::Cli,
    config::{self, InitFileSet, Variant},
    install::{default_package_manager, Installer, DEFAULT_INSTALL_ARGS},
    scaffold::{run_project, usage},
    utils::{env_bool_truthy, env_opt_path, env_opt_string, parse_variant},
};

/// 运行一次脚手架
pub(crate) fn run(cli: Cli) -> Result<()> {
    let Cli { project, root, variant, catalog, package_manager, skip_install, list } = cli;

    // 环境变量覆盖（若 CLI 未指定）
    let env_project = env_opt_string("IA_PROJECT");
    let env_root = env_opt_path("IA_ROOT");
    let env_variant = env_opt_string("IA_VARIANT");
    let env_catalog = env_opt_path("IA_CATALOG");
    let env_package_manager = env_opt_string("IA_PACKAGE_MANAGER");
    let env_skip_install = env_bool_truthy("IA_SKIP_INSTALL").unwrap_or(false);

    let effective_project = project.or(env_project);
    let effective_root = root.or(env_root).unwrap_or_else(|| PathBuf::from("."));
    let effective_variant = match variant.or(env_variant) {
        Some(name) => parse_variant(&name)
            .with_context(|| format!("未知的项目表: {}（可选 legacy|extended）", name))?,
        None => Variant::Extended,
    };
    let effective_catalog = catalog.or(env_catalog);
    let effective_package_manager = package_manager
        .or(env_package_manager)
        .unwrap_or_else(|| default_package_manager().to_string());
    let effective_skip_install = if skip_install { true } else { env_skip_install };

    let loaded = config::load_catalog(effective_catalog.as_deref(), effective_variant)?;
    if list {
        print!("{}", usage(&loaded.catalog));
        return Ok(());
    }
    println!(
        "ℹ️ 本次使用的项目表: {}（{} 个项目）",
        config::describe_source(&loaded.source),
        loaded.catalog.len()
    );

    let files = InitFileSet::new(effective_root);
    tracing::debug!(root = %files.root().display(), project = ?effective_project, "scaffolding");
    let installer = Installer::new(effective_package_manager, files.root(), !effective_skip_install);

    let report = run_project(&files, &loaded.catalog, effective_project.as_deref(), &installer)?;
    tracing::debug!(?report, "patching finished");
    if report.matched && (report.missing_anchors > 0 || report.failed > 0) {
        eprintln!(
            "⚠️ {} 处锚点缺失，{} 次文件操作失败，生成的应用可能不完整",
            report.missing_anchors, report.failed
        );
    }

    installer.install(DEFAULT_INSTALL_ARGS)?;
    Ok(())
}
