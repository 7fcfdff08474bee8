//! Static file serving module
//!
//! Resolves a request path beneath an asset route's base directory, reads
//! the file, and builds the response. Resolution is single-shot: a missing
//! file is an immediate 404.

use std::path::{Path, PathBuf};

use http_body_util::Full;
use percent_encoding::percent_decode_str;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::http::{self, mime, response};
use crate::logger;
use crate::routing::AssetRoute;

/// Serve a file beneath an asset route's base directory
pub async fn serve_asset(route: &AssetRoute, rest: &str, is_head: bool) -> Response<Full<Bytes>> {
    match load_asset(route, rest).await {
        Some((content, content_type)) => {
            response::build_asset_response(content, content_type, is_head)
        }
        None => http::build_404_response(),
    }
}

/// Serve the index template; a missing template is a configuration error
pub async fn serve_index(template: &Path, is_head: bool) -> Response<Full<Bytes>> {
    match fs::read(template).await {
        Ok(content) => response::build_html_response(content, is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to render template '{}': {e}",
                template.display()
            ));
            http::build_500_response()
        }
    }
}

/// Load an asset file and infer its content type from the extension
pub async fn load_asset(route: &AssetRoute, rest: &str) -> Option<(Vec<u8>, &'static str)> {
    let file_path = resolve_asset_path(&route.dir, rest)?;
    // File not found is common (404), no need to log
    let content = fs::read(&file_path).await.ok()?;
    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Resolve a relative request path beneath a base directory
///
/// Rejects the path if it escapes the base directory, either lexically
/// (`..`, absolute, or prefix components) or after symlink resolution.
fn resolve_asset_path(base_dir: &Path, rest: &str) -> Option<PathBuf> {
    let relative = sanitize_relative_path(rest)?;

    let base_canonical = match base_dir.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset directory not found or inaccessible '{}': {e}",
                base_dir.display()
            ));
            return None;
        }
    };

    // Canonicalize fails for missing files, which is an ordinary 404
    let file_canonical = base_canonical.join(relative).canonicalize().ok()?;
    if !file_canonical.starts_with(&base_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {rest} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    Some(file_canonical)
}

/// Lexically sanitize a request path
///
/// Segments are percent-decoded individually; only plain file name segments
/// survive. A decoded separator or parent reference is rejected so decoding
/// cannot smuggle a segment past the traversal guard.
fn sanitize_relative_path(rest: &str) -> Option<PathBuf> {
    if rest.starts_with('/') {
        logger::log_warning(&format!("Rejected asset path: {rest}"));
        return None;
    }

    let mut out = PathBuf::new();
    for segment in rest.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }

        let Ok(decoded) = percent_decode_str(segment).decode_utf8() else {
            logger::log_warning(&format!("Rejected asset path: {rest}"));
            return None;
        };

        if decoded == "." {
            continue;
        }
        if decoded == ".."
            || decoded.contains('/')
            || decoded.contains('\\')
            || decoded.contains('\0')
        {
            logger::log_warning(&format!("Rejected asset path: {rest}"));
            return None;
        }

        out.push(decoded.as_ref());
    }

    if out.as_os_str().is_empty() {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    /// Fresh directory under the system temp dir for one test
    fn temp_base() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "siteserve-test-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn asset_route(dir: &Path) -> AssetRoute {
        AssetRoute {
            prefix: "/static/css/".to_string(),
            dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_sanitize_plain_and_nested() {
        assert_eq!(
            sanitize_relative_path("style.css"),
            Some(PathBuf::from("style.css"))
        );
        assert_eq!(
            sanitize_relative_path("sub/dir/file.css"),
            Some(PathBuf::from("sub/dir/file.css"))
        );
        assert_eq!(
            sanitize_relative_path("./a/./b.css"),
            Some(PathBuf::from("a/b.css"))
        );
    }

    #[test]
    fn test_sanitize_decodes_segments() {
        assert_eq!(
            sanitize_relative_path("my%20photo.png"),
            Some(PathBuf::from("my photo.png"))
        );
        assert_eq!(
            sanitize_relative_path("fonts/Fira%2BSans.woff2"),
            Some(PathBuf::from("fonts/Fira+Sans.woff2"))
        );
    }

    #[test]
    fn test_sanitize_rejects_traversal() {
        assert_eq!(sanitize_relative_path("../../etc/passwd"), None);
        assert_eq!(sanitize_relative_path("a/../../b.css"), None);
        assert_eq!(sanitize_relative_path("/etc/passwd"), None);
        assert_eq!(sanitize_relative_path(""), None);
        assert_eq!(sanitize_relative_path("."), None);
    }

    #[test]
    fn test_sanitize_rejects_decoded_traversal() {
        // Decoding must not reintroduce separators or parent references
        assert_eq!(sanitize_relative_path("%2e%2e/secret.txt"), None);
        assert_eq!(sanitize_relative_path("..%2F..%2Fetc/passwd"), None);
        assert_eq!(sanitize_relative_path("a%2Fb.css"), None);
        assert_eq!(sanitize_relative_path("a%5Cb.css"), None);
        assert_eq!(sanitize_relative_path("a%00.css"), None);
        // Invalid UTF-8 after decoding
        assert_eq!(sanitize_relative_path("%ff%fe.css"), None);
    }

    #[tokio::test]
    async fn test_load_asset_byte_identical() {
        let base = temp_base();
        let bytes = b"body { color: #333; }".to_vec();
        std::fs::write(base.join("style.css"), &bytes).expect("write asset");

        let (content, content_type) = load_asset(&asset_route(&base), "style.css")
            .await
            .expect("asset should load");
        assert_eq!(content, bytes);
        assert_eq!(content_type, "text/css");
    }

    #[tokio::test]
    async fn test_load_asset_nested_path() {
        let base = temp_base();
        std::fs::create_dir_all(base.join("vendor")).expect("create subdir");
        std::fs::write(base.join("vendor/lib.js"), b"export {};").expect("write asset");

        let (content, content_type) = load_asset(&asset_route(&base), "vendor/lib.js")
            .await
            .expect("asset should load");
        assert_eq!(content, b"export {};");
        assert_eq!(content_type, "text/javascript");
    }

    #[tokio::test]
    async fn test_load_asset_percent_encoded_name() {
        let base = temp_base();
        let bytes = vec![0x89u8, 0x50, 0x4e, 0x47];
        std::fs::write(base.join("my photo.png"), &bytes).expect("write asset");

        let (content, content_type) = load_asset(&asset_route(&base), "my%20photo.png")
            .await
            .expect("encoded name should resolve");
        assert_eq!(content, bytes);
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn test_load_asset_missing_file() {
        let base = temp_base();
        assert!(load_asset(&asset_route(&base), "missing.css").await.is_none());
    }

    #[tokio::test]
    async fn test_load_asset_blocks_traversal() {
        let parent = temp_base();
        let base = parent.join("css");
        std::fs::create_dir_all(&base).expect("create base");
        std::fs::write(parent.join("secret.txt"), b"secret").expect("write file");

        let route = asset_route(&base);
        assert!(load_asset(&route, "../secret.txt").await.is_none());
        assert!(load_asset(&route, "../../etc/passwd").await.is_none());
        assert!(load_asset(&route, "..%2F..%2Fetc/passwd").await.is_none());
    }

    #[tokio::test]
    async fn test_serve_asset_status() {
        let base = temp_base();
        std::fs::write(base.join("logo.png"), [0x89u8, 0x50, 0x4e, 0x47]).expect("write asset");
        let route = asset_route(&base);

        let resp = serve_asset(&route, "logo.png", false).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "image/png");

        let resp = serve_asset(&route, "missing.png", false).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_serve_index() {
        let base = temp_base();
        let template = base.join("index.html");
        std::fs::write(&template, b"<html><body>home</body></html>").expect("write template");

        let resp = serve_index(&template, false).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_serve_index_missing_template() {
        let base = temp_base();
        let resp = serve_index(&base.join("absent.html"), false).await;
        assert_eq!(resp.status(), 500);
    }
}
