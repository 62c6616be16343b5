use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::ecosystem::Balance;

/// Resources an account currently has delegated, split by the resource they back.
///
/// Undelegation always releases both components together, back to the delegating account.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct DelegatedStake {
  /// Stake backing network bandwidth
  pub bandwidth: Balance,
  /// Stake backing compute time
  pub compute: Balance,
}

impl DelegatedStake {
  pub const fn new(bandwidth: Balance, compute: Balance) -> Self {
    Self { bandwidth, compute }
  }

  pub fn total(&self) -> Balance {
    self.bandwidth.saturating_add(self.compute)
  }

  pub fn is_zero(&self) -> bool {
    self.bandwidth == 0 && self.compute == 0
  }
}

/// An outstanding unlock request. While one exists for an account, its staked funds are
/// neither delegated nor spendable.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct PendingRefund<BlockNumber> {
  /// Amount that becomes spendable once claimed
  pub amount: Balance,
  /// Block at which the undelegation was requested
  pub requested_at: BlockNumber,
}

impl<BlockNumber> PendingRefund<BlockNumber> {
  pub fn new(amount: Balance, requested_at: BlockNumber) -> Self {
    Self {
      amount,
      requested_at,
    }
  }
}
