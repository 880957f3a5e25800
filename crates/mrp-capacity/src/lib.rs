//! # MRP Capacity
//!
//! 產能需求計劃：將計劃訂單依途程換算為工作中心逐期負荷。
//! 只報告負荷，不調整訂單；超載由呼叫端決定如何處理。

pub mod capacity;

// Re-export 主要類型
pub use capacity::{CapacityPlanner, CrpResult};
