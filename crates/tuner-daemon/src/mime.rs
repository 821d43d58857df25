/// Extension → content type, matching the appliance's serving table.
///
/// The extension is expected with its leading dot and is compared
/// case-insensitively. Anything unmapped, including the empty string, is
/// served as `application/octet-stream`.
pub fn content_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        ".asf" => "video/x-ms-asf",
        ".asx" => "video/x-ms-asf",
        ".avi" => "video/x-msvideo",
        ".bin" => "application/octet-stream",
        ".cco" => "application/x-cocoa",
        ".crt" => "application/x-x509-ca-cert",
        ".css" => "text/css",
        ".deb" => "application/octet-stream",
        ".der" => "application/x-x509-ca-cert",
        ".dll" => "application/octet-stream",
        ".dmg" => "application/octet-stream",
        ".ear" => "application/java-archive",
        ".eot" => "application/octet-stream",
        ".exe" => "application/octet-stream",
        ".flv" => "video/x-flv",
        ".gif" => "image/gif",
        ".hqx" => "application/mac-binhex40",
        ".htc" => "text/x-component",
        ".htm" => "text/html",
        ".html" => "text/html",
        ".ico" => "image/x-icon",
        ".img" => "application/octet-stream",
        ".iso" => "application/octet-stream",
        ".jar" => "application/java-archive",
        ".jardiff" => "application/x-java-archive-diff",
        ".jng" => "image/x-jng",
        ".jnlp" => "application/x-java-jnlp-file",
        ".jpeg" => "image/jpeg",
        ".jpg" => "image/jpeg",
        ".js" => "application/x-javascript",
        ".mml" => "text/mathml",
        ".mng" => "video/x-mng",
        ".mov" => "video/quicktime",
        ".mp3" => "audio/mpeg",
        ".mpeg" => "video/mpeg",
        ".mpg" => "video/mpeg",
        ".msi" => "application/octet-stream",
        ".msm" => "application/octet-stream",
        ".msp" => "application/octet-stream",
        ".pdb" => "application/x-pilot",
        ".pdf" => "application/pdf",
        ".pem" => "application/x-x509-ca-cert",
        ".pl" => "application/x-perl",
        ".pm" => "application/x-perl",
        ".png" => "image/png",
        ".prc" => "application/x-pilot",
        ".ra" => "audio/x-realaudio",
        ".rar" => "application/x-rar-compressed",
        ".rpm" => "application/x-redhat-package-manager",
        ".rss" => "text/xml",
        ".run" => "application/x-makeself",
        ".sea" => "application/x-sea",
        ".shtml" => "text/html",
        ".sit" => "application/x-stuffit",
        ".swf" => "application/x-shockwave-flash",
        ".tcl" => "application/x-tcl",
        ".tk" => "application/x-tcl",
        ".txt" => "text/plain",
        ".war" => "application/java-archive",
        ".wbmp" => "image/vnd.wap.wbmp",
        ".wmv" => "video/x-ms-wmv",
        ".xml" => "text/xml",
        ".xpi" => "application/x-xpinstall",
        ".zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_extensions() {
        assert_eq!(content_type(".html"), "text/html");
        assert_eq!(content_type(".css"), "text/css");
        assert_eq!(content_type(".mp3"), "audio/mpeg");
        assert_eq!(content_type(".wmv"), "video/x-ms-wmv");
        assert_eq!(content_type(".zip"), "application/zip");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(content_type(".HTML"), "text/html");
        assert_eq!(content_type(".Jpg"), "image/jpeg");
    }

    #[test]
    fn unknown_and_empty_fall_back_to_binary() {
        assert_eq!(content_type(".nope"), "application/octet-stream");
        assert_eq!(content_type(""), "application/octet-stream");
        assert_eq!(content_type("html"), "application/octet-stream");
    }
}
