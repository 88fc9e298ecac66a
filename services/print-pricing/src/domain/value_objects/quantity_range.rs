//! 数量区间值对象

use serde::Serialize;

/// 闭区间 `[min, max]`，`max` 严格大于 `min`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityRange {
    min_quantity: u32,
    max_quantity: u32,
}

impl QuantityRange {
    /// `max <= min` 时返回 `None`
    pub fn new(min_quantity: u32, max_quantity: u32) -> Option<Self> {
        (max_quantity > min_quantity).then_some(Self {
            min_quantity,
            max_quantity,
        })
    }

    pub fn min_quantity(&self) -> u32 {
        self.min_quantity
    }

    pub fn max_quantity(&self) -> u32 {
        self.max_quantity
    }

    /// 两个闭区间 `[a,b]`、`[c,d]` 相交当且仅当 `a <= d && c <= b`
    ///
    /// 共享端点也算相交：`[1,10]` 与 `[10,20]` 共享数量 10
    pub fn overlaps(&self, other: &QuantityRange) -> bool {
        self.min_quantity <= other.max_quantity && other.min_quantity <= self.max_quantity
    }

    pub fn contains(&self, quantity: u32) -> bool {
        self.min_quantity <= quantity && quantity <= self.max_quantity
    }
}
