use matching_engine::EngineError;
use thiserror::Error;
use types::errors::OrderError;
use types::ids::{OrderId, UserId};

/// Errors returned by the order service
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("Matching engine rejected order: {0}")]
    Engine(#[from] EngineError),

    #[error("Order already has id {0}; new orders must not carry one")]
    IdAlreadyAssigned(OrderId),

    #[error("Order with id {0} not found")]
    OrderNotFound(OrderId),

    #[error("User {user_id} is not allowed to see order {order_id}")]
    NotOrderOwner { order_id: OrderId, user_id: UserId },
}
