//! Active world resolution from `server.properties`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{AddonPaths, DEFAULT_WORLD_NAME, LEVEL_NAME_KEY};
use crate::log::Logger;
use crate::{log_error, log_warn};

/// Read the `level-name` value from a properties file.
///
/// Lines are scanned in order; the first line starting with `level-name=`
/// whose trimmed value is non-empty wins. Returns `Ok(None)` when no such
/// line exists. Section headers and malformed lines are ignored.
pub fn read_level_name(path: &Path) -> io::Result<Option<String>> {
    let content = fs::read_to_string(path)?;
    Ok(find_level_name(&content))
}

fn find_level_name(content: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|line| line.strip_prefix(LEVEL_NAME_KEY)?.strip_prefix('='))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

/// Determines which world receives pack registrations.
///
/// Resolution never fails: any problem with `server.properties` is logged
/// and the default world name is used instead.
pub struct WorldResolver {
    server_properties: PathBuf,
    logger: Arc<dyn Logger>,
}

impl WorldResolver {
    /// Create a resolver for the given server layout.
    pub fn new(paths: &AddonPaths, logger: Arc<dyn Logger>) -> Self {
        Self {
            server_properties: paths.server_properties.clone(),
            logger,
        }
    }

    /// Name of the world to register packs against.
    pub fn resolve_target_world(&self) -> String {
        match read_level_name(&self.server_properties) {
            Ok(Some(name)) => name,
            Ok(None) => {
                log_warn!(
                    self.logger,
                    "No level-name found in server.properties, using default '{}'.",
                    DEFAULT_WORLD_NAME
                );
                DEFAULT_WORLD_NAME.to_string()
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log_error!(
                    self.logger,
                    "server.properties not found, using default '{}'.",
                    DEFAULT_WORLD_NAME
                );
                DEFAULT_WORLD_NAME.to_string()
            }
            Err(e) => {
                log_warn!(
                    self.logger,
                    "Could not read {}: {}, using default '{}'.",
                    self.server_properties.display(),
                    e,
                    DEFAULT_WORLD_NAME
                );
                DEFAULT_WORLD_NAME.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogLevel, MemoryLogger};
    use std::fs;
    use tempfile::TempDir;

    fn resolver_with(properties: Option<&str>) -> (TempDir, Arc<MemoryLogger>, WorldResolver) {
        let temp = TempDir::new().unwrap();
        let paths = AddonPaths::under_root(temp.path());
        if let Some(content) = properties {
            fs::write(&paths.server_properties, content).unwrap();
        }
        let logger = Arc::new(MemoryLogger::new());
        let resolver = WorldResolver::new(&paths, logger.clone());
        (temp, logger, resolver)
    }

    #[test]
    fn test_level_name_is_used() {
        let (_temp, logger, resolver) = resolver_with(Some(
            "server-name=Dedicated Server\ngamemode=survival\nlevel-name=survival\nlevel-seed=\n",
        ));

        assert_eq!(resolver.resolve_target_world(), "survival");
        assert!(logger.records().is_empty());
    }

    #[test]
    fn test_level_name_is_trimmed() {
        let (_temp, _logger, resolver) = resolver_with(Some("level-name=  Bedrock level  \n"));
        assert_eq!(resolver.resolve_target_world(), "Bedrock level");
    }

    #[test]
    fn test_comments_are_ignored() {
        let (_temp, _logger, resolver) = resolver_with(Some(
            "# level-name=commented\n# Allowed values: Any string\nlevel-name=creative\n",
        ));
        assert_eq!(resolver.resolve_target_world(), "creative");
    }

    #[test]
    fn test_missing_key_falls_back_with_warning() {
        let (_temp, logger, resolver) = resolver_with(Some("server-port=19132\n"));

        assert_eq!(resolver.resolve_target_world(), "world");
        assert!(logger.contains(LogLevel::Warn, "No level-name found"));
    }

    #[test]
    fn test_empty_value_falls_back_with_warning() {
        let (_temp, logger, resolver) = resolver_with(Some("level-name=   \n"));

        assert_eq!(resolver.resolve_target_world(), "world");
        assert!(logger.contains(LogLevel::Warn, "No level-name found"));
    }

    #[test]
    fn test_missing_file_falls_back_with_error() {
        let (_temp, logger, resolver) = resolver_with(None);

        assert_eq!(resolver.resolve_target_world(), "world");
        assert!(logger.contains(LogLevel::Error, "server.properties not found"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let (_temp, logger, resolver) = resolver_with(Some("garbage\nlevel-name=survival\n"));

        assert_eq!(resolver.resolve_target_world(), "survival");
        assert!(logger.records().is_empty());
    }

    #[test]
    fn test_section_headers_are_ignored() {
        let (_temp, _logger, resolver) = resolver_with(Some("[misc]\nlevel-name=survival\n"));
        assert_eq!(resolver.resolve_target_world(), "survival");
    }

    #[test]
    fn test_first_non_empty_level_name_wins() {
        let (_temp, _logger, resolver) =
            resolver_with(Some("level-name=\nlevel-name=second\nlevel-name=third\n"));
        assert_eq!(resolver.resolve_target_world(), "second");
    }

    #[test]
    fn test_similar_keys_do_not_match() {
        assert_eq!(find_level_name("level-name-old=a\nlevel-seed=1\n"), None);
        assert_eq!(find_level_name(" level-name=indented\n"), None);
        assert_eq!(
            find_level_name("level-name=\"quoted\" \\ kept\r\n"),
            Some("\"quoted\" \\ kept".to_string())
        );
    }

    #[test]
    fn test_read_level_name_absent_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("server.properties");
        fs::write(&path, "difficulty=easy\n").unwrap();

        assert_eq!(read_level_name(&path).unwrap(), None);
    }
}
