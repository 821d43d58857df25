//! Resolves request paths against the configured web root.
//!
//! Resolution never leaves the root: `..` segments, absolute paths and
//! drive prefixes are rejected before touching the filesystem, and report
//! the same way as a missing file.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs::File;

use crate::mime;

/// Probed in order when the request path is empty.
const INDEX_FILES: &[&str] = &["index.html", "index.htm", "default.html", "default.htm"];

/// An opened file ready to stream, plus the metadata the response headers
/// need. Computed fresh per request, never cached.
#[derive(Debug)]
pub struct ServedFile {
    pub file: File,
    pub content_type: &'static str,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

#[derive(Debug)]
pub enum FileResult {
    Found(ServedFile),
    NotFound,
}

/// Resolve `request_path` under `root` and open it. `Ok(NotFound)` covers
/// missing files, non-files and escape attempts; `Err` is an I/O failure on
/// a file that exists and should have been served.
pub async fn resolve(request_path: &str, root: &Path) -> io::Result<FileResult> {
    let mut relative = request_path.strip_prefix('/').unwrap_or(request_path).to_string();

    if relative.is_empty() {
        for index in INDEX_FILES {
            if tokio::fs::metadata(root.join(index)).await.is_ok() {
                relative = index.to_string();
                break;
            }
        }
        if relative.is_empty() {
            return Ok(FileResult::NotFound);
        }
    }

    let Some(safe) = sanitize(&relative) else {
        return Ok(FileResult::NotFound);
    };
    let path = root.join(safe);

    // Any metadata failure means "not an existing regular file" — this also
    // covers paths that descend through a file, which report NotADirectory
    // rather than NotFound. Err is reserved for a file that exists and then
    // fails to open.
    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(_) => return Ok(FileResult::NotFound),
    };
    if !metadata.is_file() {
        return Ok(FileResult::NotFound);
    }

    let file = File::open(&path).await?;
    let content_type = content_type_for(&path);

    Ok(FileResult::Found(ServedFile {
        file,
        content_type,
        len: metadata.len(),
        modified: metadata.modified().ok(),
    }))
}

/// Reduce a request path to plain relative components. Anything that could
/// step outside the root (`..`, a root or prefix component) rejects the
/// whole path.
fn sanitize(path: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => mime::content_type(&format!(".{ext}")),
        None => mime::content_type(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tuner-www-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn sanitize_rejects_escapes() {
        assert_eq!(sanitize("../secret"), None);
        assert_eq!(sanitize("a/../../secret"), None);
        assert_eq!(sanitize("/etc/passwd"), None);
        assert_eq!(sanitize("./ui/app.js"), Some(PathBuf::from("ui/app.js")));
    }

    #[tokio::test]
    async fn empty_path_probes_index_files_in_order() {
        let root = temp_root("index-order");
        std::fs::write(root.join("default.html"), "default").unwrap();
        std::fs::write(root.join("index.htm"), "htm").unwrap();

        match resolve("/", &root).await.unwrap() {
            FileResult::Found(f) => {
                // index.htm beats default.html in the probe order
                assert_eq!(f.len, 3);
                assert_eq!(f.content_type, "text/html");
            }
            FileResult::NotFound => panic!("expected an index document"),
        }
        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn empty_path_with_no_index_misses() {
        let root = temp_root("no-index");
        assert!(matches!(
            resolve("/", &root).await.unwrap(),
            FileResult::NotFound
        ));
        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn resolves_nested_file_with_content_type() {
        let root = temp_root("nested");
        std::fs::create_dir_all(root.join("ui")).unwrap();
        std::fs::write(root.join("ui/app.css"), "body {}").unwrap();

        match resolve("/ui/app.css", &root).await.unwrap() {
            FileResult::Found(f) => {
                assert_eq!(f.content_type, "text/css");
                assert_eq!(f.len, 7);
                assert!(f.modified.is_some());
            }
            FileResult::NotFound => panic!("expected file"),
        }
        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn escape_attempts_report_not_found() {
        let root = temp_root("escape");
        let outside = root.parent().unwrap().join(format!(
            "tuner-outside-{}.txt",
            std::process::id()
        ));
        std::fs::write(&outside, "secret").unwrap();

        let request = format!("/../{}", outside.file_name().unwrap().to_str().unwrap());
        assert!(matches!(
            resolve(&request, &root).await.unwrap(),
            FileResult::NotFound
        ));

        std::fs::remove_file(&outside).ok();
        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn descending_through_a_file_misses() {
        let root = temp_root("through-file");
        std::fs::write(root.join("index.html"), "<html/>").unwrap();
        // the file exists but is not a directory, so the longer path misses
        assert!(matches!(
            resolve("/index.html/foo", &root).await.unwrap(),
            FileResult::NotFound
        ));
        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn directories_are_not_served() {
        let root = temp_root("dir");
        std::fs::create_dir_all(root.join("ui")).unwrap();
        assert!(matches!(
            resolve("/ui", &root).await.unwrap(),
            FileResult::NotFound
        ));
        std::fs::remove_dir_all(&root).ok();
    }
}
