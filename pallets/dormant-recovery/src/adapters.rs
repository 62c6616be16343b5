//! Collaborator traits for the recovery pallet
//!
//! The staking and refund subsystems are owned by other pallets. These traits expose only the
//! queries and requests the recovery state machine needs, so the pallet stays independent of
//! any particular staking implementation. The token ledger is plain `fungible`.

use frame::prelude::*;
use primitives::{Balance, DelegatedStake, PendingRefund};

/// Stake delegation subsystem.
pub trait StakeLedger<AccountId> {
  /// Stake currently delegated by `who`, if any.
  fn delegated(who: &AccountId) -> Option<DelegatedStake>;

  /// Undelegate exactly `stake` back to `who`, starting the external unlock timer.
  fn undelegate(who: &AccountId, stake: DelegatedStake) -> DispatchResult;
}

/// Pending refund (unlock) subsystem.
pub trait RefundLedger<AccountId, BlockNumber> {
  /// Outstanding unlock request for `who`, if any.
  fn pending_refund(who: &AccountId) -> Option<PendingRefund<BlockNumber>>;

  /// Claim the outstanding refund of `who`. Fails while the unlock has not matured.
  fn claim_refund(who: &AccountId) -> Result<Balance, DispatchError>;
}

/// No staking: nothing is ever delegated, so every account is admitted for recovery directly.
impl<AccountId> StakeLedger<AccountId> for () {
  fn delegated(_: &AccountId) -> Option<DelegatedStake> {
    None
  }

  fn undelegate(_: &AccountId, _: DelegatedStake) -> DispatchResult {
    Err(DispatchError::Other("StakeLedger not configured"))
  }
}

/// No refunds: no account is ever held back by an unlock.
impl<AccountId, BlockNumber> RefundLedger<AccountId, BlockNumber> for () {
  fn pending_refund(_: &AccountId) -> Option<PendingRefund<BlockNumber>> {
    None
  }

  fn claim_refund(_: &AccountId) -> Result<Balance, DispatchError> {
    Err(DispatchError::Other("RefundLedger not configured"))
  }
}
