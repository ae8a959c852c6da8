pub mod chain;
pub mod clock;
pub mod proof_cache;
pub mod translator;
pub mod verifier;

pub use chain::{ChainClient, EthereumClient};
pub use clock::{Clock, SystemClock};
pub use proof_cache::ProofCache;
pub use verifier::{PaymentGate, ReceiptVerifier, VerifyOutcome};
