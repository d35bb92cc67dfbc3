//! 各运行模式的入口

pub mod modes;
