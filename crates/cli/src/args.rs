use alloy::primitives::Address;
use clap::Parser;

pub(crate) const DEFAULT_RPC_PROVIDER: &str = "http://localhost:8545";

#[derive(Parser, Debug)]
#[command(name = "surety-cli", version, about, long_about = None)]
pub struct Cli {
    /// RPC endpoint of the node holding the oracle accounts
    #[arg(long, default_value_t = DEFAULT_RPC_PROVIDER.to_string())]
    pub rpc: String,

    /// RPC throttling (req/sec) [default: none]
    #[arg(long)]
    pub rpc_throttle: Option<u32>,

    /// FlightSuretyApp smart contract address
    #[arg(long)]
    pub app: Address,

    /// Block to replay request events from (0 = genesis, so requests opened
    /// before a restart are re-examined)
    #[arg(long, default_value_t = 0)]
    pub from_block: u64,

    /// Log poll interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Number of oracle identities to provision
    #[arg(long, default_value_t = 30)]
    pub pool_size: usize,

    /// Offset into the node account list where the oracle pool begins
    #[arg(long, default_value_t = 20)]
    pub pool_start_offset: usize,

    /// Offset of the airline account whose flights always resolve late
    #[arg(long, default_value_t = 1)]
    pub special_test_offset: usize,

    /// Oracle registration fee, in ether
    #[arg(long, default_value_t = String::from("1"))]
    pub registration_fee: String,

    /// Base retry delay unit in milliseconds (delay = attempt * unit)
    #[arg(long, default_value_t = 2000)]
    pub backoff_unit_ms: u64,

    /// Registration attempts per oracle before giving up
    #[arg(long, default_value_t = 10)]
    pub max_registration_attempts: u32,
}
