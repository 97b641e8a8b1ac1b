// src/lib.rs

//! 固定刻みの数値積分 (台形則・シンプソン則) と常微分方程式ソルバ
//! (オイラー法・ルンゲ・クッタ法)、およびその収束解析。

pub mod analysis;
pub mod config;
pub mod math;
pub mod problems;
pub mod report;
