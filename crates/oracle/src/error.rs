use alloy::primitives::Address;

/// Errors produced by the oracle coordination library.
///
/// [`OracleError::InsufficientIdentities`] and
/// [`OracleError::RegistrationExhausted`] are fatal startup conditions;
/// everything else is transient and handled at the call site.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("not enough node accounts to provision oracles: need at least {required}, have {available}")]
    InsufficientIdentities { required: usize, available: usize },

    #[error("registration for oracle {oracle} failed after {attempts} attempts")]
    RegistrationExhausted { oracle: Address, attempts: u32 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),

    #[error(transparent)]
    Rpc(#[from] alloy::transports::TransportError),

    #[error(transparent)]
    Decode(#[from] alloy::sol_types::Error),

    #[error(transparent)]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),
}
