//! 锚点插入模块：
//! - 在锚点文本之后插入内容，锚点本身保留
//! - 字面匹配，锚点中的 `[`、`(`、`.` 等字符不做任何模式解释
//! - 未找到锚点时仅警告，文件保持原样

use std::{fs, path::Path};
use anyhow::{Context, Result};

/// 单次插入的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatchOutcome {
    /// 锚点出现 `occurrences` 次，每处之后都插入了内容
    Applied { occurrences: usize },
    /// 未找到锚点，文件未修改
    AnchorMissing,
}

/// 在 `text` 中每个 `anchor` 之后插入 `content`，返回新文本与命中次数。
/// 锚点为空或未出现时返回 None。
pub(crate) fn insert_after_anchor(text: &str, anchor: &str, content: &str) -> Option<(String, usize)> {
    if anchor.is_empty() {
        return None;
    }
    let occurrences = text.matches(anchor).count();
    if occurrences == 0 {
        return None;
    }
    let replacement = format!("{}{}", anchor, content);
    Some((text.replace(anchor, &replacement), occurrences))
}

/// 读取文件，在锚点后插入内容并整体写回
pub(crate) fn apply_patch(path: &Path, anchor: &str, content: &str) -> Result<PatchOutcome> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("读取文件失败: {}", path.display()))?;
    let Some((patched, occurrences)) = insert_after_anchor(&text, anchor, content) else {
        eprintln!("⚠️ 未找到锚点 \"{}\"，文件未修改: {}", anchor, path.display());
        tracing::warn!(file = %path.display(), anchor, "anchor not found");
        return Ok(PatchOutcome::AnchorMissing);
    };
    fs::write(path, patched.as_bytes())
        .with_context(|| format!("写入文件失败: {}", path.display()))?;
    println!("✅ 已插入: \n {}{}", anchor, content);
    tracing::debug!(file = %path.display(), occurrences, "patch applied");
    Ok(PatchOutcome::Applied { occurrences })
}
