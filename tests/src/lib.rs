//! Helpers for the integration tests in `tests/`.

use std::{
    io::Read,
    process::{Command, Stdio},
    time::Duration,
};

use wait_timeout::ChildExt;

const CC_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CcOutcome {
    Accepted,
    /// The compiler's diagnostics
    Rejected(String),
    /// There is no C compiler to ask
    Unavailable,
}

/// Asks the C compiler in `CC` (or `cc`) whether `source` is a valid translation unit. Only the
/// syntax and semantics are checked, nothing is compiled.
pub fn check_with_cc(source: &str) -> CcOutcome {
    let file = temp_file::with_contents(source.as_bytes());
    let cc = std::env::var_os("CC").unwrap_or_else(|| "cc".into());

    let child = Command::new(cc)
        .args(["-fsyntax-only", "-std=c99", "-x", "c"])
        .arg(file.path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return CcOutcome::Unavailable,
        Err(err) => panic!("Failed to spawn the C compiler: {err}"),
    };

    let mut stderr = child.stderr.take().expect("Failed to open stderr of cc");
    let reader = std::thread::spawn(move || {
        let mut s = String::new();
        stderr
            .read_to_string(&mut s)
            .expect("Failed to read stderr of cc");
        s
    });

    let status = match child
        .wait_timeout(CC_TIMEOUT)
        .expect("Failed to wait for cc")
    {
        Some(status) => status,
        None => {
            child.kill().expect("Failed to kill cc");
            child.wait().expect("Failed to wait for cc");
            return CcOutcome::Rejected(format!("cc took longer than {CC_TIMEOUT:?}"));
        }
    };

    let diagnostics = reader.join().expect("stderr reader panicked");
    if status.success() {
        CcOutcome::Accepted
    } else {
        CcOutcome::Rejected(diagnostics)
    }
}

/// Panics with the compiler output when `cc` rejects `source`. Prints a note and passes when
/// there is no compiler.
#[track_caller]
pub fn assert_cc_accepts(source: &str) {
    match check_with_cc(source) {
        CcOutcome::Accepted => {}
        CcOutcome::Unavailable => {
            eprintln!("no C compiler found, skipping the acceptance check");
        }
        CcOutcome::Rejected(diagnostics) => {
            panic!("cc rejected:\n{source}\ndiagnostics:\n{diagnostics}")
        }
    }
}
