mod cli;
mod commands;
mod config;
mod install;
mod patch;
mod scaffold;
#[cfg(test)]
mod testing;
mod utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{cli::Cli, install::InstallError};

fn main() {
    // 默认静默，通过 RUST_LOG 打开诊断日志
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = commands::run(cli) {
        // 安装失败时退出码与子进程一致（退出码已在安装步骤打印）
        if let Some(install_err) = err.downcast_ref::<InstallError>() {
            std::process::exit(install_err.exit_code());
        }
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }
}
