//! ports - 抽象 trait 层
//!
//! 定义记录存储（Record Store）的抽象接口

mod repository;
mod unit_of_work;

pub use repository::*;
pub use unit_of_work::*;
