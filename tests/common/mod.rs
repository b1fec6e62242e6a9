//! Common test utilities for media-dl integration tests
//!
//! [`FakeYtDlp`] installs a shell script that speaks just enough of the yt-dlp
//! command line for the service: `--dump-single-json` prints a JSON document,
//! otherwise the file named by `-o` is written and its path printed. The URL
//! selects the behavior:
//!
//! - contains `unavailable`: `ERROR:` line on stderr, exit 1
//! - contains `crash`: traceback on stderr, exit 1
//! - contains `slow`: sleeps for a minute
//! - anything else: succeeds with title "Fake Title"

#![allow(dead_code)]

use media_dl::Config;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Title reported by the fake for successful URLs
pub const FAKE_TITLE: &str = "Fake Title";

/// Bytes the fake writes as the media file
pub const FAKE_MEDIA: &[u8] = b"fake media";

const INVOCATION_SEPARATOR: &str = "--- invocation ---";

/// A fake yt-dlp executable living in a temporary directory
pub struct FakeYtDlp {
    dir: TempDir,
    binary: PathBuf,
    log: PathBuf,
}

impl FakeYtDlp {
    /// Write the script and make it executable
    pub fn install() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("yt-dlp");
        let log = dir.path().join("invocations.log");

        let script = format!(
            r#"#!/bin/sh
{{ echo '{separator}'; printf '%s\n' "$@"; }} >> '{log}'

template=""
mode=download
url=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) template="$2"; shift 2 ;;
    --dump-single-json) mode=info; shift ;;
    --) url="$2"; shift 2 ;;
    *) shift ;;
  esac
done

case "$url" in
  *unavailable*) echo "ERROR: [youtube] abc: Video unavailable" >&2; exit 1 ;;
  *crash*) echo "Traceback (most recent call last):" >&2; echo "OSError: boom" >&2; exit 1 ;;
  *slow*) exec sleep 60 ;;
esac

if [ "$mode" = info ]; then
  printf '{{"title":"{title}","format":"18 - 640x360 (360p)","ext":"mp4"}}\n'
  exit 0
fi

out=$(printf '%s' "$template" | sed 's/%(ext)s/mp4/')
printf 'fake media' > "$out"
printf '%s\n' "$out"
"#,
            separator = INVOCATION_SEPARATOR,
            log = log.display(),
            title = FAKE_TITLE,
        );

        std::fs::write(&binary, script).unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();

        Self { dir, binary, log }
    }

    /// Path to the executable
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Arguments of every invocation so far, oldest first
    pub fn invocations(&self) -> Vec<Vec<String>> {
        let Ok(raw) = std::fs::read_to_string(&self.log) else {
            return Vec::new();
        };

        raw.split(&format!("{}\n", INVOCATION_SEPARATOR))
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| chunk.lines().map(str::to_string).collect())
            .collect()
    }

    /// Config that runs this fake and writes artifacts under `out_dir`
    pub fn config(&self, out_dir: &Path) -> Config {
        let mut config = Config::default();
        config.extractor.ytdlp_path = Some(self.binary.clone());
        config.download.temp_dir = out_dir.to_path_buf();
        config.download.retention = None;
        config
    }

    /// Directory holding the script
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Whether `args` contains `flag` immediately followed by `value`
pub fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}
