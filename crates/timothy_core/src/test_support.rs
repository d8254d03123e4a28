//! Scripted stand-ins for `pg_dump` and `psql`.
//!
//! Each [`FakeCluster`] owns a temp directory holding three shell scripts and
//! the state they share: a call log, the bytes every restore received, and a
//! marker file per created database. Failures are injected by touching files.

use crate::config::ToolConfig;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DUMP_SCRIPT: &str = r#"#!/bin/sh
dir='@DIR@'
section=''
for arg in "$@"; do
  case "$arg" in --section=*) section="${arg#--section=}" ;; esac
  last="$arg"
done
echo "dump $section start $last" >> "$dir/calls.log"
echo "pg_dump: dumping contents of section $section" >&2
if [ -f "$dir/fail_dump_$section" ]; then
  echo "pg_dump: error: connection to server failed" >&2
  exit 1
fi
echo "-- section $section"
if [ "$section" = data ] && [ -f "$dir/payload" ]; then
  cat "$dir/payload"
fi
echo "dump $section end" >> "$dir/calls.log"
"#;

const RESTORE_SCRIPT: &str = r#"#!/bin/sh
dir='@DIR@'
mode=tolerant
for arg in "$@"; do
  case "$arg" in ON_ERROR_STOP=1) mode=stop ;; esac
  last="$arg"
done
tmp="$dir/restore.$$"
cat > "$tmp"
section=$(head -n 1 "$tmp" | sed 's/^-- section //')
echo "restore $section $mode $last" >> "$dir/calls.log"
if [ -f "$dir/fail_restore_$section" ]; then
  echo "ERROR:  relation \"employee\" does not exist" >&2
  rm -f "$tmp"
  exit 3
fi
cat "$tmp" >> "$dir/restored"
wc -c < "$tmp" | tr -d ' '
rm -f "$tmp"
"#;

const ADMIN_SCRIPT: &str = r#"#!/bin/sh
dir='@DIR@'
echo "admin $1" >> "$dir/calls.log"
if [ -f "$dir/admin_stderr" ]; then
  cat "$dir/admin_stderr" >&2
  exit 1
fi
name=$(printf '%s\n' "$3" | sed -n 's/^CREATE DATABASE "\([^"]*\)".*/\1/p')
if [ -e "$dir/db_$name" ]; then
  echo "ERROR:  database \"$name\" already exists" >&2
  exit 1
fi
touch "$dir/db_$name"
echo "CREATE DATABASE"
"#;

/// A destination cluster simulated on disk.
pub(crate) struct FakeCluster {
    dir: TempDir,
}

impl FakeCluster {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let cluster = Self { dir };
        cluster.write_script("pg_dump", DUMP_SCRIPT);
        cluster.write_script("psql", RESTORE_SCRIPT);
        cluster.write_script("admin_psql", ADMIN_SCRIPT);
        cluster
    }

    fn write_script(&self, name: &str, body: &str) {
        let path = self.path(name);
        let dir = self.dir.path().to_str().unwrap();
        fs::write(&path, body.replace("@DIR@", dir)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub(crate) fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn program(&self, name: &str) -> String {
        self.path(name).to_str().unwrap().to_string()
    }

    pub(crate) fn tools(&self) -> ToolConfig {
        ToolConfig {
            dump_program: self.program("pg_dump"),
            restore_program: self.program("psql"),
            admin_program: self.program("admin_psql"),
            admin_database: "postgres".to_string(),
        }
    }

    /// Mark `database` as already present on the cluster.
    pub(crate) fn create_database(&self, database: &str) {
        touch(&self.path(&format!("db_{database}")));
    }

    pub(crate) fn has_database(&self, database: &str) -> bool {
        self.path(&format!("db_{database}")).exists()
    }

    pub(crate) fn fail_dump(&self, section: &str) {
        touch(&self.path(&format!("fail_dump_{section}")));
    }

    pub(crate) fn fail_restore(&self, section: &str) {
        touch(&self.path(&format!("fail_restore_{section}")));
    }

    /// Make the administrative command fail with `stderr` and status 1.
    pub(crate) fn fail_admin(&self, stderr: &str) {
        fs::write(self.path("admin_stderr"), stderr).unwrap();
    }

    /// Bytes the data-stage dump emits after its header line.
    pub(crate) fn set_payload(&self, payload: &[u8]) {
        fs::write(self.path("payload"), payload).unwrap();
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.path("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    pub(crate) fn restored(&self) -> Vec<u8> {
        fs::read(self.path("restored")).unwrap_or_default()
    }
}

fn touch(path: &Path) {
    fs::write(path, b"").unwrap();
}
