//! # 消息模型
//!
//! 扩展与宿主之间只交换两种 JSON 结构：
//! - `Request`：`{"action": "copyGif", "url": "..."}`
//! - `Response`：成功时携带 `method`，失败时携带 `error`，两者互斥
//!
//! 缺失的可选字段在序列化时直接省略，而不是输出 `null`，
//! 与扩展端 `response.error || 'Unknown error'` 的判断方式保持一致。

use serde::{Deserialize, Deserializer, Serialize};

/// 唯一支持的动作名。
pub const COPY_GIF_ACTION: &str = "copyGif";

/// 成功响应中的 `method` 字段取值。
pub const NATIVE_METHOD: &str = "native";

/// 扩展发来的请求。
///
/// `action` 缺失或为 `null` 时按空字符串处理，走“未知动作”分支。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Request {
    /// 构造一个 `copyGif` 请求。
    pub fn copy_gif(url: impl Into<String>) -> Self {
        Self {
            action: COPY_GIF_ACTION.to_string(),
            url: Some(url.into()),
        }
    }

    pub fn is_copy_gif(&self) -> bool {
        self.action == COPY_GIF_ACTION
    }

    /// 返回非空 URL；缺失、空串或纯空白均视为未提供。
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 回写给扩展的响应。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success() -> Self {
        Self {
            success: true,
            method: Some(NATIVE_METHOD.to_string()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            method: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_omits_error_field() {
        let json = serde_json::to_string(&Response::success()).expect("serialize failed");
        assert_eq!(json, r#"{"success":true,"method":"native"}"#);
    }

    #[test]
    fn failure_response_omits_method_field() {
        let json = serde_json::to_string(&Response::failure("No URL provided"))
            .expect("serialize failed");
        assert_eq!(json, r#"{"success":false,"error":"No URL provided"}"#);
    }

    #[test]
    fn request_without_url_parses() {
        let request: Request =
            serde_json::from_str(r#"{"action":"copyGif"}"#).expect("parse failed");

        assert!(request.is_copy_gif());
        assert_eq!(request.url(), None);
    }

    #[test]
    fn request_without_action_is_not_copy_gif() {
        let request: Request =
            serde_json::from_str(r#"{"url":"https://example.com/a.gif"}"#).expect("parse failed");

        assert_eq!(request.action, "");
        assert!(!request.is_copy_gif());
    }

    #[test]
    fn null_action_is_an_unknown_action_not_a_parse_error() {
        let request: Request = serde_json::from_str(r#"{"action":null,"url":"https://example.com/a.gif"}"#)
            .expect("parse failed");

        assert_eq!(request.action, "");
        assert!(!request.is_copy_gif());
    }

    #[test]
    fn blank_url_is_treated_as_missing() {
        let request = Request::copy_gif("   ");
        assert_eq!(request.url(), None);

        let request = Request::copy_gif("https://example.com/a.gif");
        assert_eq!(request.url(), Some("https://example.com/a.gif"));
    }
}
