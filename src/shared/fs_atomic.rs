use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn pending_sibling(path: &Path, parent: &Path) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or(0);
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("artifact");
    parent.join(format!("{name}.pending.{}.{stamp}", std::process::id()))
}

/// Write an artifact through a pending sibling file + rename so readers never
/// observe a partially-written report.
pub fn atomic_write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("artifact path has no parent directory"))?;
    fs::create_dir_all(parent)?;

    let pending = pending_sibling(path, parent);
    let mut file = fs::File::create_new(&pending)?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&pending, path)?;
    #[cfg(unix)]
    fs::File::open(parent)?.sync_all()?;
    Ok(())
}
