//! Version comparison for CLI and template compatibility

use semver::Version;

/// Command suggested when a template needs a newer CLI
pub const UPGRADE_COMMAND: &str = "cargo install expo-genie --force";

/// Compare CLI version against the minimum version a template declares.
/// Returns a warning message if the CLI is older than the template expects.
pub fn check_compatibility(cli_version: &str, template_version: &str, upgrade_command: &str) -> Option<String> {
    let cli_ver = Version::parse(cli_version).ok()?;
    let template_ver = Version::parse(template_version.trim_start_matches('v')).ok()?;

    if cli_ver < template_ver {
        Some(format!(
            "This template was designed for expo-genie {} or newer.\n\
             You are running version {}.\n\
             Consider updating: {}",
            template_ver, cli_version, upgrade_command
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_older_than_template() {
        let warning = check_compatibility("0.1.0", "0.2.0", UPGRADE_COMMAND);
        assert!(warning.unwrap().contains("0.2.0 or newer"));
    }

    #[test]
    fn test_cli_same_as_template() {
        assert!(check_compatibility("0.1.0", "0.1.0", UPGRADE_COMMAND).is_none());
    }

    #[test]
    fn test_cli_newer_than_template() {
        assert!(check_compatibility("0.2.0", "0.1.0", UPGRADE_COMMAND).is_none());
    }

    #[test]
    fn test_leading_v_accepted() {
        assert!(check_compatibility("0.1.0", "v1.0.0", UPGRADE_COMMAND).is_some());
    }

    #[test]
    fn test_invalid_versions() {
        // No warning when either side is unparsable
        assert!(check_compatibility("invalid", "0.1.0", UPGRADE_COMMAND).is_none());
        assert!(check_compatibility("0.1.0", "latest", UPGRADE_COMMAND).is_none());
    }
}
