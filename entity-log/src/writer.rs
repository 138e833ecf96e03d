// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Replaces `path` with `lines`, each newline-terminated, via a sibling temp file.
pub fn write_lines<I, S>(path: &Path, lines: I) -> io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tmp_path = temp_path(path);
    if tmp_path.exists() {
        fs::remove_file(&tmp_path)?;
    }
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        for line in lines {
            writer.write_all(line.as_ref().as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)
}

/// Writes a complete log: the header followed by `rows`.
pub fn write_log<I, S>(path: &Path, header: &str, rows: I) -> io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    write_lines(
        path,
        std::iter::once(header.to_string()).chain(rows.into_iter().map(|r| r.as_ref().to_string())),
    )
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_log_replaces_contents_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("7203.csv");
        fs::write(&path, "stale\n").unwrap();
        write_log(&path, "Date,Open,High,Low,Close,Volume", ["2024-07-19,100,110,90,105,1000"])
            .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Open,High,Low,Close,Volume\n2024-07-19,100,110,90,105,1000\n"
        );
        assert!(!dir.path().join("7203.csv.tmp").exists());
    }
}
