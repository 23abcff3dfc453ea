//! 模型回覆的 JSON 解碼
//!
//! 模型常把 JSON 包在說明文字或 code fence 裡，先整段解析，失敗再取第一個 `[`
//! 到最後一個 `]` 之間的內容重試。

use crate::utils::error::{ItweetError, Result};
use serde_json::Value;

pub fn decode_json_array(raw: &str) -> Result<Vec<Value>> {
    let raw = raw.trim();

    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(direct_err) => {
            tracing::debug!("Direct JSON parse failed ({}), trying bracketed slice", direct_err);
            let slice = bracketed_slice(raw).ok_or_else(|| ItweetError::InvalidSelectionFormat {
                message: "AI response was not valid JSON".to_string(),
            })?;
            serde_json::from_str::<Value>(slice).map_err(|e| {
                ItweetError::InvalidSelectionFormat {
                    message: format!("AI response was not valid JSON: {}", e),
                }
            })?
        }
    };

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ItweetError::InvalidSelectionFormat {
            message: "AI response JSON must be a list".to_string(),
        }),
    }
}

fn bracketed_slice(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (end > start).then(|| &raw[start..=end])
}
