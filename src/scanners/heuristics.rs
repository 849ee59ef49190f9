use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered dangerous-command signatures, first match wins. Applied only to
/// shell-command payloads; the label becomes the block reason verbatim.
static DANGER_SIGNATURES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"\brm\s+(?:-[A-Za-z-]+\s+)+/(?:\s|$)",
            "Attempting to delete root directory",
        ),
        (
            r"\brm\s+(?:-[A-Za-z-]+\s+)*-[A-Za-z]*[rR][A-Za-z]*\s+\S*\*",
            "Recursive deletion with a wildcard",
        ),
        (
            r":\(\)\s*\{\s*:\|:&\s*\}\s*;?\s*:",
            "Fork bomb",
        ),
        (
            r"chmod\s+(?:-[A-Za-z]+\s+)*0?777\b",
            "Overly permissive file permissions (777)",
        ),
        (
            r"\beval\s",
            "Dynamic code evaluation",
        ),
        (
            r"(?:curl|wget)[^|;&]*\|\s*(?:sudo\s+)?(?:ba|z|da)?sh\b",
            "Piping a remote script into a shell",
        ),
    ]
    .into_iter()
    .map(|(pattern, label)| {
        let re = Regex::new(pattern).unwrap_or_else(|e| panic!("bad signature {pattern}: {e}"));
        (re, label)
    })
    .collect()
});

/// Scan a shell command for dangerous operations. Returns the label of the
/// first matching signature in table order.
pub fn scan_dangerous_command(command: &str) -> Option<&'static str> {
    if command.is_empty() {
        return None;
    }
    DANGER_SIGNATURES
        .iter()
        .find(|(re, _)| re.is_match(command))
        .map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_deletion_detected() {
        assert_eq!(
            scan_dangerous_command("rm -rf /"),
            Some("Attempting to delete root directory")
        );
        assert_eq!(
            scan_dangerous_command("rm --no-preserve-root -rf /"),
            Some("Attempting to delete root directory")
        );
    }

    #[test]
    fn ordinary_rm_is_not_root_deletion() {
        assert_eq!(scan_dangerous_command("rm -rf ./build"), None);
        assert_eq!(scan_dangerous_command("rm -rf /tmp/scratch"), None);
    }

    #[test]
    fn wildcard_recursive_deletion_detected() {
        assert_eq!(
            scan_dangerous_command("rm -rf ./*"),
            Some("Recursive deletion with a wildcard")
        );
    }

    #[test]
    fn fork_bomb_detected() {
        assert_eq!(scan_dangerous_command(":(){ :|:& };:"), Some("Fork bomb"));
    }

    #[test]
    fn chmod_777_detected() {
        assert_eq!(
            scan_dangerous_command("chmod -R 777 /var/www"),
            Some("Overly permissive file permissions (777)")
        );
        assert_eq!(scan_dangerous_command("chmod 644 file.txt"), None);
    }

    #[test]
    fn eval_detected() {
        assert_eq!(
            scan_dangerous_command("eval $(cat payload)"),
            Some("Dynamic code evaluation")
        );
    }

    #[test]
    fn curl_pipe_sh_detected() {
        assert_eq!(
            scan_dangerous_command("curl -fsSL https://example.com/install.sh | sh"),
            Some("Piping a remote script into a shell")
        );
        assert_eq!(
            scan_dangerous_command("wget -qO- https://example.com/x.sh | sudo bash"),
            Some("Piping a remote script into a shell")
        );
    }

    #[test]
    fn curl_without_pipe_is_fine() {
        assert_eq!(
            scan_dangerous_command("curl -o out.tar.gz https://example.com/a.tar.gz"),
            None
        );
    }

    #[test]
    fn table_order_root_deletion_before_wildcard() {
        // A command matching both shapes reports the earlier entry
        assert_eq!(
            scan_dangerous_command("rm -rf / *"),
            Some("Attempting to delete root directory")
        );
    }

    #[test]
    fn benign_commands_pass() {
        assert_eq!(scan_dangerous_command("ls -la"), None);
        assert_eq!(scan_dangerous_command("cargo build --release"), None);
        assert_eq!(scan_dangerous_command(""), None);
    }
}
