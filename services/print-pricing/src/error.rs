//! 定价引擎错误模型
//!
//! 每条拒绝路径都返回可区分的错误变体，调用方可以穷举处理

use std::fmt;

use errors::{AppError, ProblemDetails};
use serde::Serialize;
use thiserror::Error;

/// 单个字段的校验失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// 字段路径，与输入记录的字段名一致（如 `packetQty`）
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 一次提交中所有字段级错误，按字段出现顺序排列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// 查找指定字段的错误
    pub fn field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// 没有错误时返回 `Ok(())`
    pub fn into_result(self) -> Result<(), PricingError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PricingError::Validation(self))
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// 与候选阶梯冲突的既有阶梯
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierConflict {
    pub tier_id: String,
    pub min_quantity: u32,
    pub max_quantity: u32,
}

/// 定价引擎错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("maxQuantity ({max_quantity}) must be greater than minQuantity ({min_quantity})")]
    RangeOrder { min_quantity: u32, max_quantity: u32 },

    #[error(
        "Quantity range conflicts with existing tier (min: {}, max: {})",
        .0.min_quantity,
        .0.max_quantity
    )]
    Conflict(TierConflict),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl PricingError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// 错误所挂的字段路径；`RangeOrder` 固定挂在 `maxQuantity` 上
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::RangeOrder { .. } => Some("maxQuantity"),
            _ => None,
        }
    }

    /// 稳定的机器可读标签
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::RangeOrder { .. } => "range_order",
            Self::Conflict(_) => "conflict",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Store(_) => "store",
        }
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::RangeOrder { .. } => 422,
            Self::Conflict(_) => 409,
            Self::InvalidRequest(_) => 400,
            Self::Store(e) => e.status_code(),
        }
    }

    /// 转换为 Problem Details；存储错误沿用其自身的表示
    pub fn to_problem_details(&self) -> ProblemDetails {
        let title = match self {
            Self::Store(e) => return e.to_problem_details(),
            Self::Validation(_) => "Validation Error",
            Self::RangeOrder { .. } => "Invalid Quantity Range",
            Self::Conflict(_) => "Price Tier Conflict",
            Self::InvalidRequest(_) => "Invalid Request",
        };
        ProblemDetails {
            r#type: format!("/problems/{}", self.kind().replace('_', "-")),
            title: title.to_string(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    /// 字段级错误（含 `RangeOrder`）可由用户修正后重新提交
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::RangeOrder { .. } | Self::Conflict(_)
        )
    }
}

/// Result 类型别名
pub type PricingResult<T> = Result<T, PricingError>;
