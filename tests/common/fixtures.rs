// common/fixtures.rs
use std::fs;
use std::io::Result as IoResult;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// `mismatched types` on src/lib.rs:3:5-10, as rustc prints it.
pub const DIRECT_ERROR: &str = r#"{"level":"error","message":"mismatched types","rendered":"error: mismatched types\n...","spans":[{"file_name":"src/lib.rs","line_start":3,"line_end":3,"column_start":5,"column_end":10,"is_primary":true}],"children":[]}"#;

/// A warning whose only primary span sits in its second child.
pub const DIRECT_NESTED_WARNING: &str = r#"{"level":"warning","message":"unused import","rendered":"warning: unused import","spans":[{"file_name":"src/top.rs","line_start":1,"line_end":1,"column_start":1,"column_end":4,"is_primary":false}],"children":[{"level":"note","message":"first","spans":[],"children":[]},{"level":"help","message":"second","spans":[{"file_name":"src/child.rs","line_start":12,"line_end":14,"column_start":2,"column_end":8,"is_primary":true}],"children":[]}]}"#;

/// A note with no spans anywhere.
pub const DIRECT_NO_SPAN: &str = r#"{"level":"note","message":"verification took 3s","rendered":"note: verification took 3s","spans":[],"children":[]}"#;

pub const DIRECT_SUMMARY: &str = r#"{"level":"error","message":"aborting due to 2 previous errors","rendered":"error: aborting due to 2 previous errors","spans":[],"children":[]}"#;

/// Wraps a rustc diagnostic the way `cargo --message-format=json` does.
pub fn wrapped(diagnostic: &str) -> String {
    format!(
        r#"{{"reason":"compiler-message","package_id":"demo 0.1.0 (path+file:///demo)","target":{{"name":"demo"}},"message":{}}}"#,
        diagnostic
    )
}

pub const BUILD_FINISHED: &str = r#"{"reason":"build-finished","success":false}"#;

/// A scratch directory holding captured streams and config files.
pub struct Scratch {
    /// Dropping this removes the directory.
    pub temp_dir: TempDir,
}

impl Scratch {
    pub fn new() -> IoResult<Self> {
        Ok(Scratch {
            temp_dir: tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `lines` joined with newlines to `name` and returns its path.
    pub fn write_lines<S: AsRef<str>>(&self, name: &str, lines: &[S]) -> IoResult<PathBuf> {
        let path = self.temp_dir.path().join(name);
        let text: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
        fs::write(&path, text.join("\n"))?;
        Ok(path)
    }

    pub fn write(&self, name: &str, contents: &str) -> IoResult<PathBuf> {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}
