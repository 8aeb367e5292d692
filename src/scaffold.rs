//! Sound library bootstrap: creates the per-tool category directories and
//! drops a README into each so users know which sounds land where.

use anyhow::Context;
use std::fs;

use crate::config::Config;
use crate::events::Tool;

const ROOT_README: &str = "\
# c-notify sound root

Place tool-specific sounds under `codex/` and `claude/`.
Each category folder contains a README describing when its event fires.
Supported file types are configured in `~/.c-notify/config.json`.
";

pub fn init_sound_tree(config: &Config, refresh_readmes: bool) -> anyhow::Result<()> {
    let root = &config.sound_root;
    fs::create_dir_all(root).with_context(|| format!("create {}", root.display()))?;

    let root_readme = root.join("README.md");
    if refresh_readmes || !root_readme.exists() {
        fs::write(&root_readme, ROOT_README)
            .with_context(|| format!("write {}", root_readme.display()))?;
    }

    for tool in [Tool::Codex, Tool::Claude] {
        for (category, doc) in tool.event_docs() {
            let dir = root.join(tool.name()).join(category);
            fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

            let readme = dir.join("README.md");
            if refresh_readmes || !readme.exists() {
                fs::write(&readme, category_readme(tool, category, doc))
                    .with_context(|| format!("write {}", readme.display()))?;
            }
        }
    }

    Ok(())
}

fn category_readme(tool: Tool, category: &str, doc: &str) -> String {
    format!(
        "# {}/{}\n\n{}\n\nPut your own audio files in this folder.\n",
        tool.name(),
        category,
        doc
    )
}
