use crate::{
    dto::orders::OrderWithHistory,
    error::{AppError, AppResult},
    models::Order,
    services::order_service::{HistoryView, find_order, load_history},
    state::AppState,
};

/// Accepts `7`, `0007`, `os-7` or `OS-0007`.
pub fn parse_order_ref(raw: &str) -> AppResult<i32> {
    let upper = raw.trim().to_ascii_uppercase();
    let digits = upper.strip_prefix("OS-").unwrap_or(&upper);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::invalid("order number must be numeric"));
    }
    match digits.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(_) => Err(AppError::invalid("order number must be positive")),
        // All digits but beyond any stored id.
        Err(_) => Err(AppError::NotFound),
    }
}

/// Customer self-service lookup.
///
/// Succeeds only when the order exists and its code matches, ignoring case.
/// The history returned holds customer-visible entries only, newest first.
pub async fn lookup(state: &AppState, order_ref: &str, code: &str) -> AppResult<OrderWithHistory> {
    let order_id = parse_order_ref(order_ref)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::invalid("lookup code is required"));
    }

    let order = find_order(&state.orm, order_id).await?;
    if !order.lookup_code.eq_ignore_ascii_case(code) {
        tracing::info!(order_id, "consultation with wrong code");
        return Err(AppError::InvalidCode);
    }

    let history = load_history(&state.orm, order_id, HistoryView::CustomerVisible).await?;
    Ok(OrderWithHistory {
        order: Order::try_from(order)?,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_padded_and_prefixed_numbers() {
        assert_eq!(parse_order_ref("7").unwrap(), 7);
        assert_eq!(parse_order_ref(" 0007 ").unwrap(), 7);
        assert_eq!(parse_order_ref("os-0042").unwrap(), 42);
    }

    #[test]
    fn rejects_non_numeric_or_non_positive_numbers() {
        for raw in ["abc", "", "OS-", "0", "000", "-3", "1.5"] {
            assert!(
                matches!(parse_order_ref(raw), Err(AppError::InvalidInput(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn numbers_beyond_any_id_are_not_found() {
        assert!(matches!(parse_order_ref("99999999999"), Err(AppError::NotFound)));
        assert!(matches!(parse_order_ref("OS-99999999999"), Err(AppError::NotFound)));
    }
}
