//! Escalating approval of rental changes.
//!
//! A request is offered to each authority level in order. A level either
//! approves it, which ends the walk, or escalates it to the next level.
//! The last level, [`Authority::Admin`], approves unconditionally, so
//! [`ApprovalChain::decide`] never denies a request.
//!
//! ```text
//! Operator --(hours >= max_hours)--> Manager --(cost > max_cost)--> Admin
//!    |                                  |                             |
//!  approve                           approve                       approve
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::Money;
use crate::scooter::{self, Scooter};

/// A request to change the duration of an existing rental.
#[derive(Debug, Clone, Copy)]
pub struct RentalChangeRequest<'a> {
    pub rental_id: &'a str,
    /// Requested new duration in hours.
    pub hours: f64,
    /// The rented scooter, priced at the new duration.
    pub scooter: &'a Scooter,
    pub client_id: &'a str,
}

/// An authority level of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    Operator,
    Manager,
    Admin,
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Authority::Operator => "operator",
            Authority::Manager => "manager",
            Authority::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// Thresholds of the intermediate levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApprovalPolicy {
    /// The operator approves durations strictly below this.
    pub operator_max_hours: f64,
    /// The manager approves costs up to and including this.
    pub manager_max_cost: Money,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            operator_max_hours: 4.0,
            manager_max_cost: Money::from_float(1000.0),
        }
    }
}

/// What a level did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Approved,
    Escalated,
}

/// One step of the decision trail.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEvent<'a> {
    pub authority: Authority,
    pub outcome: Outcome,
    pub rental_id: &'a str,
    pub client_id: &'a str,
    pub hours: f64,
    /// Cost the level priced the request at, if it needed to.
    pub cost: Option<Money>,
}

/// Receives every approval and escalation of the chain.
pub trait DecisionObserver: Send + Sync {
    fn on_decision(&self, event: &DecisionEvent<'_>);
}

/// Writes the decision trail as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl DecisionObserver for TracingObserver {
    fn on_decision(&self, event: &DecisionEvent<'_>) {
        let outcome = match event.outcome {
            Outcome::Approved => "approved",
            Outcome::Escalated => "escalated",
        };
        match event.cost {
            Some(cost) => info!(
                authority = %event.authority,
                rental = event.rental_id,
                client = event.client_id,
                hours = event.hours,
                cost = %cost,
                "rental change {outcome}"
            ),
            None => info!(
                authority = %event.authority,
                rental = event.rental_id,
                client = event.client_id,
                hours = event.hours,
                "rental change {outcome}"
            ),
        }
    }
}

/// Final answer of the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub approved: bool,
    /// The level that settled the request.
    pub authority: Authority,
    /// Cost computed along the way, if any level priced the request.
    pub cost: Option<Money>,
}

/// A level that may escalate, with its threshold.
#[derive(Debug, Clone, Copy)]
enum Level {
    Operator { max_hours: f64 },
    Manager { max_cost: Money },
}

impl Level {
    fn authority(&self) -> Authority {
        match self {
            Level::Operator { .. } => Authority::Operator,
            Level::Manager { .. } => Authority::Manager,
        }
    }

    /// Returns the outcome and the cost, if this level had to compute it.
    fn evaluate(&self, request: &RentalChangeRequest<'_>) -> (Outcome, Option<Money>) {
        match *self {
            Level::Operator { max_hours } => {
                let outcome = if request.hours < max_hours {
                    Outcome::Approved
                } else {
                    Outcome::Escalated
                };
                (outcome, None)
            }
            Level::Manager { max_cost } => {
                let cost = scooter::cost(request.scooter, request.hours);
                let outcome = if cost <= max_cost {
                    Outcome::Approved
                } else {
                    Outcome::Escalated
                };
                (outcome, Some(cost))
            }
        }
    }
}

/// The ordered authority levels. Immutable once built.
pub struct ApprovalChain {
    levels: Vec<Level>,
    observer: Arc<dyn DecisionObserver>,
}

impl ApprovalChain {
    /// Operator, then manager, then admin, with the given thresholds.
    pub fn new(policy: ApprovalPolicy) -> Self {
        Self {
            levels: vec![
                Level::Operator {
                    max_hours: policy.operator_max_hours,
                },
                Level::Manager {
                    max_cost: policy.manager_max_cost,
                },
            ],
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the default tracing observer.
    pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Walk the chain for `request`.
    pub fn decide(&self, request: &RentalChangeRequest<'_>) -> Decision {
        let mut last_cost = None;

        for level in &self.levels {
            let (outcome, cost) = level.evaluate(request);
            last_cost = cost.or(last_cost);
            self.emit(level.authority(), outcome, request, cost);

            if outcome == Outcome::Approved {
                return Decision {
                    approved: true,
                    authority: level.authority(),
                    cost: last_cost,
                };
            }
        }

        // terminal level
        self.emit(Authority::Admin, Outcome::Approved, request, last_cost);
        Decision {
            approved: true,
            authority: Authority::Admin,
            cost: last_cost,
        }
    }

    /// Shorthand for `decide(request).approved`.
    pub fn approves(&self, request: &RentalChangeRequest<'_>) -> bool {
        self.decide(request).approved
    }

    fn emit(
        &self,
        authority: Authority,
        outcome: Outcome,
        request: &RentalChangeRequest<'_>,
        cost: Option<Money>,
    ) {
        self.observer.on_decision(&DecisionEvent {
            authority,
            outcome,
            rental_id: request.rental_id,
            client_id: request.client_id,
            hours: request.hours,
            cost,
        });
    }
}

impl Default for ApprovalChain {
    fn default() -> Self {
        Self::new(ApprovalPolicy::default())
    }
}
