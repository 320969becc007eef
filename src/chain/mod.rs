pub mod address;
pub mod gateway;
pub mod provider;
pub mod rpc;

pub use address::Address;
pub use gateway::{ContractGateway, GatewayError, RpcGateway};
pub use provider::{HttpWalletProvider, WalletError, WalletProvider};

/// JSON-RPC error code a wallet returns when the user declines a prompt
/// (EIP-1193 `userRejectedRequest`).
pub const CODE_USER_REJECTED: i64 = 4001;
