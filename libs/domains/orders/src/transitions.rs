//! Order state transition rules

use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::{OrderError, OrderResult};
use crate::models::OrderState;

/// How strictly explicit state changes are validated.
///
/// Cancellation always has its own rule (never from a terminal state),
/// whatever the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransitionPolicy {
    /// Any state may be set from any state
    #[default]
    Permissive,
    /// Terminal states (delivered, cancelled) are frozen
    TerminalLocked,
    /// Only the edges of the fulfilment graph are allowed
    Strict,
}

impl TransitionPolicy {
    pub fn allows(self, from: OrderState, to: OrderState) -> bool {
        if from == to {
            return true;
        }
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::TerminalLocked => !from.is_terminal(),
            TransitionPolicy::Strict => strict_successors(from).contains(&to),
        }
    }

    pub fn check(self, from: OrderState, to: OrderState) -> OrderResult<()> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(OrderError::InvalidTransition { from, to })
        }
    }
}

/// Forward edges of the fulfilment graph
pub fn strict_successors(from: OrderState) -> &'static [OrderState] {
    use OrderState::*;

    match from {
        Pending => &[Confirmed, Processing, Cancelled, PaymentFailed],
        Confirmed => &[Processing, Shipped, Cancelled],
        Processing => &[Shipped, Cancelled],
        Shipped => &[Delivered, Cancelled],
        PaymentFailed => &[Pending, Confirmed, Cancelled],
        Delivered | Cancelled => &[],
    }
}
