//! Replace-on-write helper shared by the config and model persistence paths.

use std::io::Write;
use std::path::Path;

/// Write `data` to `path` through a sibling temporary file, then move it into place.
///
/// Parent directories are created as needed. An existing file at `path` is
/// overwritten; readers never observe a partially written file.
pub fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".cropmate-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_parents_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("file.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        let leftovers = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .count();
        assert_eq!(leftovers, 1);
    }
}
