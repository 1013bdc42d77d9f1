//! 应用共享状态

use crate::models::Ticker;
use crate::services::cache::DatasetCache;

/// 所有请求处理器通过 `web::Data` 共享的状态
pub struct AppState {
    /// 数据集缓存
    pub cache: DatasetCache,
    /// 未指定股票时的默认选择
    pub default_tickers: Vec<Ticker>,
}

impl AppState {
    pub fn new(cache: DatasetCache, default_tickers: Vec<Ticker>) -> Self {
        Self {
            cache,
            default_tickers,
        }
    }
}
