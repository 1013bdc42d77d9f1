//! 业务逻辑服务模块
//!
//! 封装数据加载、筛选和指标计算逻辑

pub mod cache;             // 数据集缓存
pub mod charts;            // 图表数据构建
pub mod dashboard_service; // 看板计算流程
pub mod filter;            // 日期区间筛选
pub mod loader;            // CSV 加载
pub mod metrics;           // 关键指标
