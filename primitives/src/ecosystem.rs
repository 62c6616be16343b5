//! Ecosystem Constants for Dormant Account Recovery
//!
//! This module centralizes the system-level constants used by the recovery pallet and the
//! runtimes that host it: the pallet ID from which the custodial account is derived, and the
//! bounds that keep every recovery call within a predictable weight.
//!
//! These constants are the single source of truth and are re-used by runtime configurations
//! and test mocks via the primitives crate.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// Used by `PalletId::into_account_truncating()` to deterministically derive the custodial
/// account that receives swept balances.
pub mod pallet_ids {
  /// Dormant recovery pallet ID (custodial sweep destination)
  pub const DORMANT_RECOVERY_PALLET_ID: &[u8; 8] = b"dormrcv0";
}

/// Recovery parameters bounding queue storage and per-call work.
pub mod params {
  use super::Balance;

  /// Precision scalar for native token amounts (10^12).
  pub const PRECISION: Balance = 1_000_000_000_000;

  /// Maximum number of accounts tracked across both queues at once.
  ///
  /// Both queues are stored as single bounded vectors, so this also caps the PoV size of
  /// every batch call.
  pub const MAX_QUEUE_LENGTH: u32 = 1_024;

  /// Maximum number of queue entries a single `unstake` or `recover` call may visit.
  pub const MAX_BATCH_SIZE: u32 = 255;

  /// Maximum number of accounts accepted by a single `add` or `remove` call.
  pub const MAX_ADMISSION_BATCH: u32 = 128;

  /// Blocks between an undelegation request and the refund becoming claimable
  /// (~3 days at 6s/block).
  ///
  /// Not enforced by the recovery pallet itself; staking adapters and the test ledger use it
  /// to model the external unlock timer the recovery queue has to wait out.
  pub const UNBONDING_DELAY_BLOCKS: u32 = 43_200;
}
