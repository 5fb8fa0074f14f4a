//! Initial content for a freshly created knowledge-base document.

use chrono::{DateTime, Local};
use std::path::Path;

use crate::config::DocumentConfig;
use crate::document::{RECORD_HEADING, TABLE_HEAD, TABLE_SEPARATOR, USAGE_HEADING};

/// Render the default document for the knowledge base rooted at `kb_dir`.
///
/// The record section is empty; the usage notes follow it so later upserts
/// find the usage heading in the footer.
pub fn render_initial(config: &DocumentConfig, kb_dir: &Path, created_at: DateTime<Local>) -> String {
    let kb_path = kb_dir.display();
    let created_at = created_at.format("%Y-%m-%dT%H:%M:%S%.6f");

    format!(
        "# {title}

> {subtitle}
> 位置: {kb_path}

## 配置

- **知识库根目录**: `{kb_path}`
- **创建时间**: {created_at}

{RECORD_HEADING}

{TABLE_HEAD}
{TABLE_SEPARATOR}

{USAGE_HEADING}

- 每个仓库一行记录，格式: `| 仓库名 | 一句话摘要 | 本地路径 |`
- 新增仓库时使用 `kb add` 命令写入，表格会被整体重新生成
- 如仓库被删除，请手动删除对应行
",
        title = config.title,
        subtitle = config.subtitle,
    )
}
