//! CLI 定义模块：仅负责命令行参数结构体与解析
//! 将 clap 的声明与业务逻辑解耦，具体执行见 `commands`。

use clap::Parser;
use std::path::PathBuf;

/// 顶层 CLI 入口：`projects [PROJECT]`
#[derive(Parser, Debug)]
#[command(
    name = "projects",
    about = "示例项目脚手架：重置模板文件并接入指定示例",
    version,
    after_help = "只需提供项目名 PROJECT；其余选项均可省略，省略时使用当前目录、extended 项目表与 npm。"
)]
pub(crate) struct Cli {
    /// 示例项目名（例如 routes），唯一需要提供的输入。未知或缺省时打印可用项目列表
    #[arg(value_name = "PROJECT")]
    pub(crate) project: Option<String>,
    /// 工作区根目录（包含 init-files/），默认当前目录
    #[arg(long, value_name = "DIR")]
    pub(crate) root: Option<PathBuf>,
    /// 内置项目表（legacy|extended），默认 extended
    #[arg(long, value_name = "NAME")]
    pub(crate) variant: Option<String>,
    /// 自定义项目表 YAML 文件，存在时替代内置项目表
    #[arg(long, value_name = "FILE")]
    pub(crate) catalog: Option<PathBuf>,
    /// 包管理器可执行文件，默认 npm
    #[arg(long, value_name = "BIN")]
    pub(crate) package_manager: Option<String>,
    /// 跳过所有依赖安装步骤
    #[arg(long)]
    pub(crate) skip_install: bool,
    /// 仅列出可用项目，不修改任何文件
    #[arg(long)]
    pub(crate) list: bool,
}
