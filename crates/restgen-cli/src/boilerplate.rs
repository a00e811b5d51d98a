// License boilerplate loading

use std::fs;
use std::path::Path;

use chrono::Datelike;

use crate::error::{CliError, CliResult};

/// Placeholder replaced with the current year
pub const YEAR_PLACEHOLDER: &str = "YEAR";

/// Substitute `year` for every `YEAR` in `content`
pub fn render_boilerplate(content: &str, year: i32) -> String {
    content.replace(YEAR_PLACEHOLDER, &year.to_string())
}

/// Read the header prepended to every generated file
///
/// No path means no header.
pub fn load_boilerplate(path: Option<&Path>) -> CliResult<Vec<u8>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let content = fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("cannot read boilerplate file {}: {}", path.display(), e))
    })?;
    let year = chrono::Local::now().year();
    Ok(render_boilerplate(&content, year).into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_year() {
        let out = render_boilerplate("Copyright YEAR Acme.\n(c) YEAR", 2031);
        assert_eq!(out, "Copyright 2031 Acme.\n(c) 2031");
    }

    #[test]
    fn test_no_path_gives_empty_header() {
        assert!(load_boilerplate(None).unwrap().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boilerplate.go.txt");
        fs::write(&path, "/*\nCopyright YEAR Acme.\n*/\n").unwrap();

        let header = String::from_utf8(load_boilerplate(Some(&path)).unwrap()).unwrap();
        let year = chrono::Local::now().year().to_string();
        assert!(header.contains(&format!("Copyright {} Acme.", year)));
        assert!(!header.contains(YEAR_PLACEHOLDER));
    }

    #[test]
    fn test_unreadable_file_is_config_error() {
        let err = load_boilerplate(Some(Path::new("/nonexistent/boilerplate.go.txt"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
