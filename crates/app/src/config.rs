use std::path::{Path, PathBuf};

pub const DEFAULT_DB_URL: &str = "sqlite://exam.sqlite3";

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL that
/// creates the database file on first use.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.contains("mode=memory") {
        return trimmed.to_owned();
    }

    let without_scheme = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path_str, query) = match without_scheme.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_scheme, None),
    };

    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };

    match query {
        Some(query) if query.contains("mode=") => {
            format!("sqlite://{}?{query}", absolute.display())
        }
        Some(query) => format!("sqlite://{}?{query}&mode=rwc", absolute.display()),
        None => format!("sqlite://{}?mode=rwc", absolute.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_urls_pass_through() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:file:x?mode=memory&cache=shared"),
            "sqlite:file:x?mode=memory&cache=shared"
        );
    }

    #[test]
    fn absolute_paths_gain_create_mode() {
        assert_eq!(
            normalize_sqlite_url("/tmp/exam.sqlite3"),
            "sqlite:///tmp/exam.sqlite3?mode=rwc"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/exam.sqlite3"),
            "sqlite:///tmp/exam.sqlite3?mode=rwc"
        );
    }

    #[test]
    fn explicit_mode_is_kept() {
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/exam.sqlite3?mode=ro"),
            "sqlite:///tmp/exam.sqlite3?mode=ro"
        );
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let url = normalize_sqlite_url(DEFAULT_DB_URL);
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            url,
            format!("sqlite://{}?mode=rwc", cwd.join("exam.sqlite3").display())
        );
    }
}
