//! Platform-specific process helpers

use std::process::ExitStatus;

/// Command that opens a directory in the desktop file browser
pub fn file_browser_command() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "explorer"
    }
    #[cfg(target_os = "macos")]
    {
        "open"
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        "xdg-open"
    }
}

/// Exit code to mirror for a finished child.
///
/// On Unix a signal-terminated child maps to `128 + signal`, the shell convention.
pub fn exit_code_of(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_browser_command_for_platform() {
        let command = file_browser_command();
        if cfg!(target_os = "windows") {
            assert_eq!(command, "explorer");
        } else if cfg!(target_os = "macos") {
            assert_eq!(command, "open");
        } else {
            assert_eq!(command, "xdg-open");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_of_signal() {
        use std::os::unix::process::ExitStatusExt;

        assert_eq!(exit_code_of(&ExitStatus::from_raw(0)), 0);
        // Raw wait status: exit code lives in the second byte
        assert_eq!(exit_code_of(&ExitStatus::from_raw(3 << 8)), 3);
        // SIGKILL
        assert_eq!(exit_code_of(&ExitStatus::from_raw(9)), 137);
    }
}
