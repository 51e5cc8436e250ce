use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    AwaitingQuote,
    AwaitingApproval,
    InProgress,
    Closed,
    Unrepairable,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Open,
        OrderStatus::AwaitingQuote,
        OrderStatus::AwaitingApproval,
        OrderStatus::InProgress,
        OrderStatus::Closed,
        OrderStatus::Unrepairable,
    ];

    pub const TERMINAL: [OrderStatus; 2] = [OrderStatus::Closed, OrderStatus::Unrepairable];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::AwaitingQuote => "awaiting_quote",
            OrderStatus::AwaitingApproval => "awaiting_approval",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Closed => "closed",
            OrderStatus::Unrepairable => "unrepairable",
        }
    }

    /// Closed and unrepairable orders leave the working panel, but staff can
    /// still move them back to any other status.
    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL.contains(self)
    }

    fn next(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Open => &[OrderStatus::AwaitingQuote],
            OrderStatus::AwaitingQuote => &[OrderStatus::AwaitingApproval],
            OrderStatus::AwaitingApproval => &[OrderStatus::InProgress],
            OrderStatus::InProgress => &[OrderStatus::Closed, OrderStatus::Unrepairable],
            OrderStatus::Closed | OrderStatus::Unrepairable => &[],
        }
    }

    pub fn can_move_to(&self, target: OrderStatus) -> bool {
        *self == target || self.next().contains(&target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| AppError::invalid(format!("unknown status '{s}'")))
    }
}

/// How status changes are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any known status may replace any other.
    Loose,
    /// Only the forward intake -> quote -> approval -> repair -> outcome steps.
    Strict,
}

impl TransitionPolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Loose
        }
    }

    pub fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<(), AppError> {
        match self {
            TransitionPolicy::Loose => Ok(()),
            TransitionPolicy::Strict if from.can_move_to(to) => Ok(()),
            TransitionPolicy::Strict => Err(AppError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses_case_insensitively() {
        assert_eq!("IN_PROGRESS".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!(" open ".parse::<OrderStatus>().unwrap(), OrderStatus::Open);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn only_closed_and_unrepairable_are_terminal() {
        let terminal: Vec<_> = OrderStatus::ALL.into_iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![OrderStatus::Closed, OrderStatus::Unrepairable]);
    }

    #[test]
    fn loose_policy_accepts_reverting_a_closed_order() {
        assert!(TransitionPolicy::Loose
            .check(OrderStatus::Closed, OrderStatus::Open)
            .is_ok());
    }

    #[test]
    fn strict_policy_follows_the_repair_sequence() {
        let strict = TransitionPolicy::Strict;
        assert!(strict.check(OrderStatus::Open, OrderStatus::AwaitingQuote).is_ok());
        assert!(strict.check(OrderStatus::InProgress, OrderStatus::Unrepairable).is_ok());
        assert!(strict.check(OrderStatus::AwaitingApproval, OrderStatus::AwaitingApproval).is_ok());
        assert!(matches!(
            strict.check(OrderStatus::Open, OrderStatus::Closed),
            Err(AppError::InvalidTransition { .. })
        ));
        assert!(strict.check(OrderStatus::Closed, OrderStatus::Open).is_err());
    }
}
