//! bnote-ledger
//!
//! Everything that talks to the outside world: the staking contract (through
//! a JSON-RPC gateway or an offline JSON snapshot) and the market data feed.
//! Transport and decoding failures surface as
//! `BnoteError::UpstreamUnavailable`.

pub mod client;
pub mod market;
pub mod rpc_client;
pub mod snapshot;
pub mod wire;

pub use client::{ConfigurationSource, LedgerClient, TxReceipt};
pub use market::{DexScreenerClient, MarketDataProvider};
pub use rpc_client::RpcLedgerClient;
pub use snapshot::SnapshotLedger;
