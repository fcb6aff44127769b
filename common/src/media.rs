//! 画像ペイロード（data URI / 生Base64）の相互変換
//!
//! AIとの境界では `data:<mime>;base64,<payload>` 形式と、
//! プレフィックスなしの生Base64（image/jpeg扱い）の両方を受け付ける。

/// プレフィックスなしの場合のMIMEタイプ
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// インライン画像（MIMEタイプ + Base64データ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// data URIまたは生Base64をパース
    ///
    /// Base64部分に含まれる空白・改行は除去する。
    ///
    /// # Examples
    /// ```
    /// use wardrobe_ai_common::media::InlineImage;
    ///
    /// let img = InlineImage::parse("data:image/png;base64,iVBO\nRw0K");
    /// assert_eq!(img.mime_type, "image/png");
    /// assert_eq!(img.data, "iVBORw0K");
    ///
    /// let bare = InlineImage::parse("/9j/4AAQ");
    /// assert_eq!(bare.mime_type, "image/jpeg");
    /// ```
    pub fn parse(payload: &str) -> Self {
        let payload = payload.trim();

        if let Some((mime_type, data)) = split_data_uri(payload) {
            return Self::new(mime_type, strip_whitespace(data));
        }

        Self::new(DEFAULT_MIME_TYPE, strip_whitespace(payload))
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// `data:<mime>;base64,<payload>` を (mime, payload) に分解
fn split_data_uri(payload: &str) -> Option<(&str, &str)> {
    let rest = payload.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mime_type = header.strip_suffix(";base64")?;

    if mime_type.is_empty() || !mime_type.contains('/') {
        return None;
    }

    Some((mime_type, data))
}

fn strip_whitespace(data: &str) -> String {
    data.chars().filter(|c| !c.is_whitespace()).collect()
}

/// ファイル拡張子からMIMEタイプを推定
pub fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_uri() {
        let img = InlineImage::parse("data:image/webp;base64,UklGR");
        assert_eq!(img.mime_type, "image/webp");
        assert_eq!(img.data, "UklGR");
    }

    #[test]
    fn test_parse_bare_base64_defaults_to_jpeg() {
        let img = InlineImage::parse("  /9j/4AAQ\r\nSkZJRg  ");
        assert_eq!(img.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(img.data, "/9j/4AAQSkZJRg");
    }

    #[test]
    fn test_parse_non_base64_data_uri_treated_as_bare() {
        // base64指定のないdata URIは生データ扱い
        let img = InlineImage::parse("data:text/plain,hello");
        assert_eq!(img.mime_type, DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_symmetric_forms() {
        let from_uri = InlineImage::parse("data:image/jpeg;base64,AAAA");
        let from_bare = InlineImage::parse("AAAA");
        assert_eq!(from_uri, from_bare);
        assert_eq!(from_bare.to_data_uri(), "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_mime_type_for_extension() {
        assert_eq!(mime_type_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_type_for_extension("png"), Some("image/png"));
        assert_eq!(mime_type_for_extension("txt"), None);
    }
}
