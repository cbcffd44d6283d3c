//! 配置与数据模型模块：
//! - 定义文件角色 `FileRole`、初始文件表 `InitFileSet`、命名锚点 `Slot`
//! - 定义 `PatchOperation`/`Step`/`ProjectDefinition`/`Catalog` 等结构
//! - 提供 `load_catalog` 支持内置项目表与本地 YAML 文件
//! - 暴露项目表来源信息，便于日志打印

use std::{collections::HashSet, fs, path::{Path, PathBuf}};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

// 内置项目表（两套 key 命名）
const LEGACY_CATALOG: &str = include_str!("assets/legacy.projects.yaml");
const EXTENDED_CATALOG: &str = include_str!("assets/extended.projects.yaml");

/// 被重置与修改的五类文件
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub(crate) enum FileRole {
    App,
    AppConfig,
    Main,
    Tsconfig,
    Package,
}

impl FileRole {
    /// 重置顺序
    pub(crate) const ALL: [FileRole; 5] = [
        FileRole::App,
        FileRole::AppConfig,
        FileRole::Main,
        FileRole::Tsconfig,
        FileRole::Package,
    ];

    /// 模板文件（相对工作区根目录）
    pub(crate) fn init_rel(self) -> &'static str {
        match self {
            FileRole::App => "init-files/app.ts",
            FileRole::AppConfig => "init-files/app.config.ts",
            FileRole::Main => "init-files/main.ts",
            FileRole::Tsconfig => "init-files/tsconfig.app.json",
            FileRole::Package => "init-files/package.json",
        }
    }

    /// 工作文件（相对工作区根目录）
    pub(crate) fn live_rel(self) -> &'static str {
        match self {
            FileRole::App => "src/app/app.ts",
            FileRole::AppConfig => "src/app/app.config.ts",
            FileRole::Main => "src/main.ts",
            FileRole::Tsconfig => "tsconfig.app.json",
            FileRole::Package => "package.json",
        }
    }
}

/// 初始文件表：角色 -> (模板路径, 工作路径)
#[derive(Debug, Clone)]
pub(crate) struct InitFileSet {
    root: PathBuf,
}

impl InitFileSet {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn init_path(&self, role: FileRole) -> PathBuf {
        self.root.join(role.init_rel())
    }

    pub(crate) fn live_path(&self, role: FileRole) -> PathBuf {
        self.root.join(role.live_rel())
    }
}

/// 命名锚点：每个 slot 固定对应一个文件与一段锚点文本
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Slot {
    TsconfigInclude,
    AppTemplate,
    AppImports,
    AppImportFrom,
    MainBootstrap,
    MainImportFrom,
    AppConfigProviders,
    AppConfigImportFrom,
    PackageDependencies,
}

impl Slot {
    pub(crate) fn file(self) -> FileRole {
        match self {
            Slot::TsconfigInclude => FileRole::Tsconfig,
            Slot::AppTemplate | Slot::AppImports | Slot::AppImportFrom => FileRole::App,
            Slot::MainBootstrap | Slot::MainImportFrom => FileRole::Main,
            Slot::AppConfigProviders | Slot::AppConfigImportFrom => FileRole::AppConfig,
            Slot::PackageDependencies => FileRole::Package,
        }
    }

    pub(crate) fn anchor(self) -> &'static str {
        match self {
            Slot::TsconfigInclude => "\"include\": [",
            Slot::AppTemplate => "template: `",
            Slot::AppImports => "imports: [",
            Slot::AppImportFrom => "from '@angular/core'",
            Slot::MainBootstrap => "bootstrapApplication(App, appConfig)",
            Slot::MainImportFrom => "from './app/app'",
            Slot::AppConfigProviders => "provideZonelessChangeDetection()",
            Slot::AppConfigImportFrom => "from '@angular/core'",
            Slot::PackageDependencies => "\"tslib\": \"^2.3.0\"",
        }
    }
}

/// 单次插入：在 `file` 中每个 `anchor` 之后插入 `content`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatchOperation {
    pub(crate) file: FileRole,
    pub(crate) anchor: String,
    pub(crate) content: String,
}

impl PatchOperation {
    pub(crate) fn at_slot(slot: Slot, content: impl Into<String>) -> Self {
        Self { file: slot.file(), anchor: slot.anchor().to_string(), content: content.into() }
    }
}

/// 项目中的一步：插入文本，或额外执行一次包管理器
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Patch(PatchOperation),
    Install(Vec<String>),
}

#[derive(Debug, Clone)]
pub(crate) struct ProjectDefinition {
    pub(crate) key: String,
    pub(crate) description: Option<String>,
    pub(crate) steps: Vec<Step>,
}

/// 有序的项目表，key 唯一
#[derive(Debug, Clone)]
pub(crate) struct Catalog {
    projects: Vec<ProjectDefinition>,
}

impl Catalog {
    pub(crate) fn from_yaml_str(text: &str) -> Result<Self> {
        let raw: RawCatalog = serde_yaml::from_str(text).context("解析项目表 YAML 失败")?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut projects = Vec::with_capacity(raw.projects.len());
        for p in raw.projects {
            let key = p.key.trim().to_string();
            if key.is_empty() {
                bail!("项目表中存在空的 key");
            }
            if !seen.insert(key.clone()) {
                bail!("项目表中 key 重复: {}", key);
            }
            let steps = p
                .steps
                .into_iter()
                .enumerate()
                .map(|(idx, s)| resolve_step(&key, idx, s))
                .collect::<Result<Vec<_>>>()?;
            projects.push(ProjectDefinition { key, description: p.description, steps });
        }
        Ok(Self { projects })
    }

    pub(crate) fn get(&self, key: &str) -> Option<&ProjectDefinition> {
        self.projects.iter().find(|p| p.key == key)
    }

    pub(crate) fn projects(&self) -> &[ProjectDefinition] {
        &self.projects
    }

    pub(crate) fn len(&self) -> usize {
        self.projects.len()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    #[serde(default)]
    projects: Vec<RawProject>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProject {
    key: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

/// 步骤的原始形态：slot+content / file+anchor+content / install 三选一
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    #[serde(default)]
    slot: Option<Slot>,
    #[serde(default)]
    file: Option<FileRole>,
    #[serde(default)]
    anchor: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    install: Option<Vec<String>>,
}

fn resolve_step(key: &str, idx: usize, raw: RawStep) -> Result<Step> {
    match (raw.slot, raw.file, raw.anchor, raw.content, raw.install) {
        (Some(slot), None, None, Some(content), None) => {
            Ok(Step::Patch(PatchOperation::at_slot(slot, content)))
        }
        (None, Some(file), Some(anchor), Some(content), None) => {
            if anchor.is_empty() {
                bail!("项目 {} 第 {} 步: anchor 不能为空", key, idx + 1);
            }
            Ok(Step::Patch(PatchOperation { file, anchor, content }))
        }
        (None, None, None, None, Some(args)) => {
            if args.is_empty() {
                bail!("项目 {} 第 {} 步: install 参数不能为空", key, idx + 1);
            }
            Ok(Step::Install(args))
        }
        _ => bail!(
            "项目 {} 第 {} 步格式无效：需要 slot+content、file+anchor+content 或 install 之一",
            key,
            idx + 1
        ),
    }
}

/// 内置项目表变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Variant {
    /// 早期脚本的 9 个项目（下划线命名）
    Legacy,
    /// 14 个项目（连字符命名），包含路由、生命周期等示例
    Extended,
}

impl Variant {
    fn source_text(self) -> &'static str {
        match self {
            Variant::Legacy => LEGACY_CATALOG,
            Variant::Extended => EXTENDED_CATALOG,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Variant::Legacy => "legacy",
            Variant::Extended => "extended",
        }
    }
}

/// 项目表来源（用于打印和调试）
#[derive(Debug, Clone)]
pub(crate) enum CatalogSource {
    Builtin(Variant),
    File(String),
}

/// 加载后的项目表及其来源
#[derive(Debug, Clone)]
pub(crate) struct LoadedCatalog {
    pub(crate) catalog: Catalog,
    pub(crate) source: CatalogSource,
}

/// 人类可读的来源描述
pub(crate) fn describe_source(src: &CatalogSource) -> String {
    match src {
        CatalogSource::Builtin(v) => format!("内置项目表: {}", v.name()),
        CatalogSource::File(p) => format!("本地文件: {}", p),
    }
}

/// 加载项目表：显式文件优先，否则使用内置变体
pub(crate) fn load_catalog(path: Option<&Path>, variant: Variant) -> Result<LoadedCatalog> {
    if let Some(path) = path {
        let text = fs::read_to_string(path)
            .with_context(|| format!("读取项目表失败: {}", path.display()))?;
        let catalog = Catalog::from_yaml_str(&text)
            .with_context(|| format!("加载项目表失败: {}", path.display()))?;
        return Ok(LoadedCatalog { catalog, source: CatalogSource::File(path.display().to_string()) });
    }
    let catalog = Catalog::from_yaml_str(variant.source_text())
        .with_context(|| format!("内置项目表损坏: {}", variant.name()))?;
    Ok(LoadedCatalog { catalog, source: CatalogSource::Builtin(variant) })
}
