use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

/// Lifecycle stage of a tracked account.
///
/// Terminal outcomes (recovered, removed) are not stages: the account record is deleted.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub enum RecoveryStage {
  /// Holds delegated stake that still has to be released
  AwaitingUnstake,
  /// Stake released (or never present); waiting for refunds to clear before the sweep
  AwaitingRecovery,
}

/// Per-account record. The stage decides which queue holds the account.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct AccountRecord<BlockNumber> {
  pub stage: RecoveryStage,
  pub admitted_at: BlockNumber,
}
