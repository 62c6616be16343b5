extern crate alloc;

use crate as pallet_dormant_recovery;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl,
  traits::{ConstU32, ConstU128, Get, fungible::Mutate},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{Balance, DelegatedStake, PendingRefund, params};
use std::cell::RefCell;
use std::collections::BTreeMap;

pub type AccountId = u64;
pub type BlockNumber = u64;

pub const MAX_QUEUE: u32 = params::MAX_QUEUE_LENGTH;
pub const MAX_BATCH: u32 = params::MAX_BATCH_SIZE;
pub const MAX_ADMISSION: u32 = params::MAX_ADMISSION_BATCH;
pub const EXISTENTIAL_DEPOSIT: Balance = 10;

/// Blocks until a requested refund becomes claimable
pub const UNBONDING_DELAY: BlockNumber = params::UNBONDING_DELAY_BLOCKS as BlockNumber;

/// Signer used for the permissionless calls
pub const KEEPER: AccountId = 1;
pub const DORMANT_A: AccountId = 10;
pub const DORMANT_B: AccountId = 11;
pub const DORMANT_C: AccountId = 12;
pub const DORMANT_D: AccountId = 13;

thread_local! {
  pub static STAKES: RefCell<BTreeMap<AccountId, DelegatedStake>> =
    const { RefCell::new(BTreeMap::new()) };
  pub static REFUNDS: RefCell<BTreeMap<AccountId, PendingRefund<BlockNumber>>> =
    const { RefCell::new(BTreeMap::new()) };
  pub static UNDELEGATIONS: RefCell<Vec<(AccountId, DelegatedStake)>> =
    const { RefCell::new(Vec::new()) };
  pub static CLAIM_REQUESTS: RefCell<Vec<AccountId>> = const { RefCell::new(Vec::new()) };
  pub static REJECT_UNDELEGATION: RefCell<bool> = const { RefCell::new(false) };
}

pub fn set_stake(who: AccountId, bandwidth: Balance, compute: Balance) {
  STAKES.with(|s| {
    s.borrow_mut()
      .insert(who, DelegatedStake::new(bandwidth, compute))
  });
}

pub fn clear_stake(who: AccountId) {
  STAKES.with(|s| s.borrow_mut().remove(&who));
}

pub fn set_refund(who: AccountId, amount: Balance, requested_at: BlockNumber) {
  REFUNDS.with(|r| {
    r.borrow_mut()
      .insert(who, PendingRefund::new(amount, requested_at))
  });
}

pub fn refund_of(who: AccountId) -> Option<PendingRefund<BlockNumber>> {
  REFUNDS.with(|r| r.borrow().get(&who).cloned())
}

pub fn undelegations() -> Vec<(AccountId, DelegatedStake)> {
  UNDELEGATIONS.with(|u| u.borrow().clone())
}

pub fn claim_requests() -> Vec<AccountId> {
  CLAIM_REQUESTS.with(|c| c.borrow().clone())
}

pub fn reject_undelegation(reject: bool) {
  REJECT_UNDELEGATION.with(|r| *r.borrow_mut() = reject);
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    DormantRecovery: pallet_dormant_recovery,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<Balance>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = Balance;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<EXISTENTIAL_DEPOSIT>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

/// Undelegation turns the whole stake into a refund requested at the current block.
pub struct MockStaking;
impl pallet_dormant_recovery::StakeLedger<AccountId> for MockStaking {
  fn delegated(who: &AccountId) -> Option<DelegatedStake> {
    STAKES.with(|s| s.borrow().get(who).cloned())
  }

  fn undelegate(who: &AccountId, stake: DelegatedStake) -> DispatchResult {
    if REJECT_UNDELEGATION.with(|r| *r.borrow()) {
      return Err(DispatchError::Other("Undelegation rejected"));
    }
    let delegated = Self::delegated(who).ok_or(DispatchError::Other("Nothing delegated"))?;
    if delegated != stake {
      return Err(DispatchError::Other("Partial undelegation"));
    }
    clear_stake(*who);
    let now = System::block_number();
    REFUNDS.with(|r| {
      let mut refunds = r.borrow_mut();
      let refund = refunds
        .entry(*who)
        .or_insert_with(|| PendingRefund::new(0, now));
      refund.amount = refund.amount.saturating_add(stake.total());
      refund.requested_at = now;
    });
    UNDELEGATIONS.with(|u| u.borrow_mut().push((*who, stake)));
    Ok(())
  }
}

/// Refunds mature `UNBONDING_DELAY` blocks after the request and are paid out by minting.
pub struct MockRefunds;
impl pallet_dormant_recovery::RefundLedger<AccountId, BlockNumber> for MockRefunds {
  fn pending_refund(who: &AccountId) -> Option<PendingRefund<BlockNumber>> {
    refund_of(*who)
  }

  fn claim_refund(who: &AccountId) -> Result<Balance, DispatchError> {
    CLAIM_REQUESTS.with(|c| c.borrow_mut().push(*who));
    let refund = refund_of(*who).ok_or(DispatchError::Other("No refund pending"))?;
    if System::block_number() < refund.requested_at.saturating_add(UNBONDING_DELAY) {
      return Err(DispatchError::Other("Refund not yet claimable"));
    }
    <Balances as Mutate<AccountId>>::mint_into(who, refund.amount)?;
    REFUNDS.with(|r| r.borrow_mut().remove(who));
    Ok(refund.amount)
  }
}

pub struct RecoveryPalletId;
impl Get<PalletId> for RecoveryPalletId {
  fn get() -> PalletId {
    PalletId(*primitives::pallet_ids::DORMANT_RECOVERY_PALLET_ID)
  }
}

#[cfg(feature = "runtime-benchmarks")]
pub struct MockBenchmarkHelper;
#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<AccountId> for MockBenchmarkHelper {
  fn delegate(who: &AccountId, stake: DelegatedStake) -> DispatchResult {
    set_stake(*who, stake.bandwidth, stake.compute);
    Ok(())
  }
}

impl pallet_dormant_recovery::Config for Test {
  type Currency = Balances;
  type Staking = MockStaking;
  type Refunds = MockRefunds;
  type PalletId = RecoveryPalletId;
  type AdminOrigin = frame_system::EnsureRoot<AccountId>;
  type MaxQueueLength = ConstU32<MAX_QUEUE>;
  type MaxBatchSize = ConstU32<MAX_BATCH>;
  type MaxAdmissionBatch = ConstU32<MAX_ADMISSION>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = MockBenchmarkHelper;
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: alloc::vec![
      (KEEPER, 1_000),
      (DORMANT_A, 500),
      (DORMANT_B, 50),
      (DORMANT_C, 75),
    ],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  // Custodial account gets a provider ref (ED-free)
  pallet_dormant_recovery::GenesisConfig::<Test>::default()
    .assimilate_storage(&mut t)
    .unwrap();

  STAKES.with(|s| s.borrow_mut().clear());
  REFUNDS.with(|r| r.borrow_mut().clear());
  UNDELEGATIONS.with(|u| u.borrow_mut().clear());
  CLAIM_REQUESTS.with(|c| c.borrow_mut().clear());
  reject_undelegation(false);

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
