//! 通用 API 响应模型
//!
//! 定义统一的 API 响应格式

use serde::{Deserialize, Serialize};
use chrono::Utc;
use chrono_tz::America::New_York;

/// 获取美股市场时间（America/New_York）
fn get_market_time() -> chrono::DateTime<chrono_tz::Tz> {
    Utc::now().with_timezone(&New_York)
}

/// 统一 API 响应结构
///
/// 筛选结果为空时 `success` 仍为 true，`data` 为空，`message` 给出提示
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    /// 美东时间，RFC 3339
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: get_market_time().to_rfc3339(),
        }
    }

    /// 创建警告响应
    ///
    /// 请求本身有效，但没有可展示的数据（例如筛选结果为空）
    pub fn warning(message: String) -> Self {
        Self {
            success: true,
            data: None,
            message,
            timestamp: get_market_time().to_rfc3339(),
        }
    }

    /// 创建错误响应（success 为 false）
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            timestamp: get_market_time().to_rfc3339(),
        }
    }
}
