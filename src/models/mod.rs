//! 数据模型模块
//! 用户与认证，以及拼车、旅伴、历史遗迹三个业务域

pub mod auth;
pub mod buddy;
pub mod ride;
pub mod site;
pub mod user;

/// 列表接口默认每页条数
pub const DEFAULT_PAGE_SIZE: i64 = 50;
/// 列表接口每页上限
pub const MAX_PAGE_SIZE: i64 = 100;

/// 规范化分页参数，返回 (limit, offset)
pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

/// validator 自定义规则：字符串去除空白后不能为空
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(None, None), (50, 0));
        assert_eq!(page_bounds(Some(500), Some(-3)), (100, 0));
        assert_eq!(page_bounds(Some(0), Some(20)), (1, 20));
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Rome").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }
}
