use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use camino::Utf8Path;
use tracing::debug;

use crate::lister::ListingCommand;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReportSummary {
    pub sections: usize,
    pub failed: usize,
}

/// Write one section per directory, in order: header, listing body, blank line.
pub fn write_sections<W: Write>(
    out: &mut W,
    directories: &[String],
    lister: &ListingCommand,
) -> io::Result<ReportSummary> {
    let mut summary = ReportSummary::default();
    for directory in directories {
        writeln!(out, "Directory structure for: {}", directory)?;
        let listing = lister.run(directory);
        out.write_all(listing.body())?;
        out.write_all(b"\n")?;

        summary.sections += 1;
        if listing.is_failure() {
            summary.failed += 1;
        }
        debug!(directory = %directory, failed = listing.is_failure(), "section written");
    }
    Ok(summary)
}

/// Create (or truncate) `path` and write the full report into it.
pub fn write_report(
    path: &Utf8Path,
    directories: &[String],
    lister: &ListingCommand,
) -> Result<ReportSummary> {
    let file = File::create(path).with_context(|| format!("creating report {}", path))?;
    let mut out = BufWriter::new(file);
    let summary = write_sections(&mut out, directories, lister)
        .with_context(|| format!("writing report {}", path))?;
    out.flush()
        .with_context(|| format!("flushing report {}", path))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(tag: &str) -> Utf8PathBuf {
        let mut dir = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("tree-report-report-{tag}-{ts}"));
        fs::create_dir_all(&dir).unwrap();
        Utf8PathBuf::from_path_buf(dir).unwrap()
    }

    #[test]
    fn mixed_success_and_failure_sections() {
        let root = unique_temp_dir("mixed");
        let a = root.join("a");
        fs::create_dir_all(&a).unwrap();
        fs::write(a.join("first.txt"), "").unwrap();
        fs::write(a.join("second.txt"), "").unwrap();
        let b = root.join("b");

        let dirs = vec![a.to_string(), b.to_string()];
        let report = root.join("tree.txt");
        let summary = write_report(&report, &dirs, &ListingCommand::new("ls")).unwrap();
        assert_eq!(summary, ReportSummary { sections: 2, failed: 1 });

        let text = fs::read_to_string(&report).unwrap();
        let expected_a = format!("Directory structure for: {}\nfirst.txt\nsecond.txt\n\n", a);
        assert!(text.starts_with(&expected_a), "{}", text);

        let rest = &text[expected_a.len()..];
        let header_b = format!("Directory structure for: {}\n", b);
        assert!(rest.starts_with(&header_b), "{}", rest);
        let body_b = &rest[header_b.len()..];
        assert!(body_b.starts_with(&format!("An error occurred while processing {}: ", b)));
        assert!(body_b.ends_with('\n'));
        assert_eq!(body_b.matches('\n').count(), 1);

        let _ = fs::remove_dir_all(&root);
    }

    #[cfg(unix)]
    #[test]
    fn section_body_matches_raw_stdout_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        use std::process::Command;

        let root = unique_temp_dir("bytes");
        fs::write(root.as_std_path().join(OsStr::from_bytes(b"caf\xe9.txt")), "").unwrap();
        let dirs = vec![root.to_string()];

        let raw = Command::new("ls").arg(root.as_std_path()).output().unwrap().stdout;
        let mut buf = Vec::new();
        write_sections(&mut buf, &dirs, &ListingCommand::new("ls")).unwrap();

        let header = format!("Directory structure for: {}\n", root);
        let mut expected = header.into_bytes();
        expected.extend_from_slice(&raw);
        expected.push(b'\n');
        assert_eq!(buf, expected);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn headers_follow_input_order() {
        let root = unique_temp_dir("order");
        let dirs: Vec<String> = ["z", "a", "m"]
            .iter()
            .map(|name| {
                let dir = root.join(name);
                fs::create_dir_all(&dir).unwrap();
                dir.to_string()
            })
            .collect();

        let mut buf = Vec::new();
        let summary = write_sections(&mut buf, &dirs, &ListingCommand::new("ls")).unwrap();
        assert_eq!(summary.sections, 3);
        assert_eq!(summary.failed, 0);

        let text = String::from_utf8(buf).unwrap();
        let headers: Vec<&str> = text
            .lines()
            .filter_map(|line| line.strip_prefix("Directory structure for: "))
            .collect();
        assert_eq!(headers, dirs.iter().map(String::as_str).collect::<Vec<_>>());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn empty_input_creates_empty_file() {
        let root = unique_temp_dir("empty");
        let report = root.join("tree.txt");
        fs::write(&report, "stale contents").unwrap();

        let summary = write_report(&report, &[], &ListingCommand::new("ls")).unwrap();
        assert_eq!(summary, ReportSummary::default());
        assert_eq!(fs::read(&report).unwrap(), Vec::<u8>::new());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn rerun_is_byte_identical() {
        let root = unique_temp_dir("rerun");
        let dir = root.join("src");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.rs"), "").unwrap();
        let dirs = vec![dir.to_string(), root.join("gone").to_string()];
        let report = root.join("tree.txt");
        let lister = ListingCommand::new("ls");

        write_report(&report, &dirs, &lister).unwrap();
        let first = fs::read(&report).unwrap();
        write_report(&report, &dirs, &lister).unwrap();
        let second = fs::read(&report).unwrap();
        assert_eq!(first, second);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_parent_directory_is_fatal() {
        let root = unique_temp_dir("fatal");
        let report = root.join("no-such-dir").join("tree.txt");

        let err = write_report(&report, &["src".to_owned()], &ListingCommand::new("ls"))
            .unwrap_err();
        assert!(err.to_string().starts_with("creating report"), "{}", err);
        assert!(!report.exists());

        let _ = fs::remove_dir_all(&root);
    }
}
