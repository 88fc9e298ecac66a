//! 实体基础 trait

/// 实体 trait
///
/// 实体的标识由记录存储分配，创建后不可变
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}
