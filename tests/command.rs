/*!
Defines a simple command snapshotting mechanism.

This wraps `std::process::Command` with an owned builder so that test
helpers can hand commands around without futzing with mutable borrows, and
renders the outcome of running a command (exit status, stdout, stderr) into
a single string suitable for an inline Insta snapshot.
*/

use std::{
    ffi::{OsStr, OsString},
    io::Write,
    process, thread,
};

use bstr::{BString, ByteSlice};

macro_rules! assert_cmd_snapshot {
    ($cmd:expr, @$snapshot:literal $(,)?) => {{
        let snapshot = $cmd.snapshot();
        insta::assert_snapshot!(snapshot.as_str(), @$snapshot);
    }};
}

pub(crate) use assert_cmd_snapshot;

/// A snapshot generated from running a command.
pub struct Snapshot(String);

impl Snapshot {
    fn new(output: &process::Output) -> Snapshot {
        Snapshot(format!(
            "success: {:?}\n\
             exit_code: {}\n\
             ----- stdout -----\n\
             {}\n\
             ----- stderr -----\n\
             {}",
            output.status.success(),
            output.status.code().unwrap_or(!0),
            bytes_to_string(&output.stdout),
            bytes_to_string(&output.stderr),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An owned builder around `std::process::Command`.
///
/// Unlike the standard builder, every method takes and returns `self` by
/// value, which composes much more nicely in tests. This also knows how to
/// feed a fixed byte string to the child's stdin, which the standard
/// `output()` API makes needlessly annoying.
#[derive(Clone, Debug)]
pub struct Command {
    bin: OsString,
    args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
    stdin: Option<BString>,
}

/// Create a command for the binary under test.
pub fn bin() -> Command {
    Command {
        bin: OsString::from(env!("CARGO_BIN_EXE_datesniff")),
        args: vec![],
        envs: vec![],
        stdin: None,
    }
}

impl Command {
    /// Add an argument to the end of this command invocation.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Command {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add arguments to the end of this command invocation.
    pub fn args(
        mut self,
        args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    ) -> Command {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Set an environment variable.
    pub fn env(
        mut self,
        key: impl AsRef<OsStr>,
        val: impl AsRef<OsStr>,
    ) -> Command {
        self.envs
            .push((key.as_ref().to_os_string(), val.as_ref().to_os_string()));
        self
    }

    /// Pass the given bytes to the command on stdin.
    pub fn stdin(mut self, stdin: impl Into<Vec<u8>>) -> Command {
        self.stdin = Some(BString::from(stdin.into()));
        self
    }

    /// Run the command and render its outcome for snapshotting.
    pub fn snapshot(&self) -> Snapshot {
        let mut cmd = process::Command::new(&self.bin);
        cmd.args(&self.args);
        for (key, val) in self.envs.iter() {
            cmd.env(key, val);
        }
        cmd.stdin(process::Stdio::piped());
        cmd.stdout(process::Stdio::piped());
        cmd.stderr(process::Stdio::piped());

        let mut child = cmd.spawn().unwrap();
        let mut child_stdin = child.stdin.take().unwrap();
        let stdin = self.stdin.clone().unwrap_or_default();
        let writer =
            thread::spawn(move || child_stdin.write_all(&stdin));
        let output = child.wait_with_output().unwrap();
        writer.join().unwrap().unwrap();
        Snapshot::new(&output)
    }
}

fn bytes_to_string(bytes: &[u8]) -> String {
    // Not technically lossless, but nothing in these tests emits
    // invalid UTF-8.
    bytes.to_str_lossy().into_owned()
}
