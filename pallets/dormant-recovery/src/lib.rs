//! Dormant Recovery Pallet
//!
//! Unwinds the delegated stake of dormant accounts and sweeps their native balance into a
//! custodial account, one permissionless batch at a time.
//!
//! ## Lifecycle
//!
//! Accounts are admitted by `AdminOrigin`. An account holding delegated stake waits in the
//! unstake queue until `unstake` releases the stake and moves it to the back of the recovery
//! queue. Accounts without stake enter the recovery queue directly. `recover` either claims an
//! outstanding refund (the account keeps its place) or sweeps the balance and forgets the
//! account.
//!
//! ```text
//! add(stake > 0) -> AwaitingUnstake -> unstake -> AwaitingRecovery -> recover -> (swept)
//! add(stake = 0) ----------------------------------^        ^    |
//!                                                   refund  '----'
//! ```
//!
//! ## Safety
//! - `unstake` and `recover` take no account arguments: they only ever work on the queue
//!   front, so callers cannot pick whom to process.
//! - An account waiting for its unlock to mature is skipped, never blocks the accounts behind
//!   it.
//! - Any account can leave with `remove_me`, which also makes it permanently non-admissible.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod adapters;
pub use adapters::{RefundLedger, StakeLedger};

pub mod types;
pub use types::{AccountRecord, RecoveryStage};

pub mod weights;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub(crate) const LOG_TARGET: &str = "runtime::dormant-recovery";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// Make `who` hold delegated stake, so that admission routes it to the unstake queue.
  fn delegate(
    who: &AccountId,
    stake: primitives::DelegatedStake,
  ) -> frame::deps::sp_runtime::DispatchResult;
}

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, RefundLedger, StakeLedger, WeightInfo};
  use crate::types::{AccountRecord, RecoveryStage};
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::{
      PalletId,
      storage::with_storage_layer,
      traits::{
        fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
        tokens::{Fortitude, Preservation},
      },
    },
    sp_runtime::{
      DispatchError,
      traits::{AccountIdConversion, Zero},
    },
  };
  use frame::prelude::*;
  use primitives::{Balance, DelegatedStake};

  pub type AccountRecordOf<T> = AccountRecord<BlockNumberFor<T>>;
  pub type QueueOf<T> =
    BoundedVec<<T as frame_system::Config>::AccountId, <T as Config>::MaxQueueLength>;

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Native currency swept from recovered accounts
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// Stake delegation subsystem queried on admission and unwound by `unstake`
    type Staking: StakeLedger<Self::AccountId>;

    /// Pending refund subsystem consulted by `recover`
    type Refunds: RefundLedger<Self::AccountId, BlockNumberFor<Self>>;

    /// Pallet ID from which the custodial account is derived
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Origin allowed to admit and remove accounts.
    ///
    /// Starts as the deployer and is handed to a collective once the pallet is trusted with
    /// moving funds; that handover is a runtime configuration change.
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Maximum number of accounts tracked across both queues
    #[pallet::constant]
    type MaxQueueLength: Get<u32>;

    /// Maximum number of queue entries visited by one `unstake` or `recover`
    #[pallet::constant]
    type MaxBatchSize: Get<u32>;

    /// Maximum number of accounts in one `add` or `remove`
    #[pallet::constant]
    type MaxAdmissionBatch: Get<u32>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Lifecycle record of every tracked account. The stage names the queue holding it.
  #[pallet::storage]
  #[pallet::getter(fn accounts)]
  pub type Accounts<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, AccountRecordOf<T>, OptionQuery>;

  /// Accounts holding delegated stake, earliest admitted first
  #[pallet::storage]
  #[pallet::getter(fn unstake_queue)]
  pub type UnstakeQueue<T: Config> = StorageValue<_, QueueOf<T>, ValueQuery>;

  /// Accounts cleared for the sweep, earliest admitted or unstaked first
  #[pallet::storage]
  #[pallet::getter(fn recovery_queue)]
  pub type RecoveryQueue<T: Config> = StorageValue<_, QueueOf<T>, ValueQuery>;

  /// Accounts that opted out through `remove_me`, with the block they did so.
  ///
  /// Entries are never removed. Any signer may add its own key, tracked or not, and pays the
  /// `remove_me` fee for the new key; repeated calls by the same signer add nothing.
  #[pallet::storage]
  #[pallet::getter(fn exempted)]
  pub type Exempted<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, BlockNumberFor<T>, OptionQuery>;

  /// Native balance swept into the custodial account so far
  #[pallet::storage]
  #[pallet::getter(fn total_recovered)]
  pub type TotalRecovered<T: Config> = StorageValue<_, Balance, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Account admitted into the queue of its stage
    AccountAdmitted {
      who: T::AccountId,
      stage: RecoveryStage,
    },
    /// Account removed before being recovered
    AccountRemoved {
      who: T::AccountId,
      stage: RecoveryStage,
    },
    /// Account opted out of recovery for good
    AccountExempted { who: T::AccountId },
    /// Delegated stake released back to its owner; the unlock timer is running
    StakeReleased {
      who: T::AccountId,
      stake: DelegatedStake,
    },
    /// Account moved from the unstake queue to the back of the recovery queue
    MovedToRecovery { who: T::AccountId },
    /// Matured refund claimed; the account is swept on a later pass
    RefundClaimed { who: T::AccountId, amount: Balance },
    /// Refund still locked; the account keeps its place in the recovery queue
    RefundDeferred { who: T::AccountId },
    /// Balance swept into the custodial account and the account forgotten
    AccountRecovered { who: T::AccountId, amount: Balance },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Account is already tracked; remove it before admitting it again
    AlreadyQueued,
    /// Account opted out of recovery
    AccountExempted,
    /// The custodial account cannot be recovered into itself
    CustodialAccount,
    /// Tracking more accounts would exceed `MaxQueueLength`
    QueueFull,
    /// Requested batch exceeds `MaxBatchSize`
    BatchTooLarge,
    /// No accounts to unstake
    UnstakeQueueEmpty,
    /// No accounts to recover
    RecoveryQueueEmpty,
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn integrity_test() {
      assert!(T::MaxBatchSize::get() > 0, "MaxBatchSize must be non-zero");
      assert!(
        T::MaxAdmissionBatch::get() <= T::MaxQueueLength::get(),
        "MaxAdmissionBatch must fit into MaxQueueLength"
      );
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Admit accounts for recovery.
    ///
    /// Accounts holding delegated stake join the unstake queue, all others the recovery
    /// queue. No funds move. The call fails as a whole if any account is already tracked,
    /// exempted, or the custodial account itself.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::add(accounts.len() as u32))]
    pub fn add(
      origin: OriginFor<T>,
      accounts: BoundedVec<T::AccountId, T::MaxAdmissionBatch>,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let now = frame_system::Pallet::<T>::block_number();
      let custodian = Self::account_id();
      let mut unstaking = UnstakeQueue::<T>::get();
      let mut recovering = RecoveryQueue::<T>::get();
      for who in accounts {
        ensure!(who != custodian, Error::<T>::CustodialAccount);
        ensure!(
          !Exempted::<T>::contains_key(&who),
          Error::<T>::AccountExempted
        );
        ensure!(
          !Accounts::<T>::contains_key(&who),
          Error::<T>::AlreadyQueued
        );
        let tracked = unstaking.len().saturating_add(recovering.len()) as u32;
        ensure!(tracked < T::MaxQueueLength::get(), Error::<T>::QueueFull);
        let stage = match T::Staking::delegated(&who) {
          Some(stake) if !stake.is_zero() => RecoveryStage::AwaitingUnstake,
          _ => RecoveryStage::AwaitingRecovery,
        };
        let queue = match stage {
          RecoveryStage::AwaitingUnstake => &mut unstaking,
          RecoveryStage::AwaitingRecovery => &mut recovering,
        };
        queue
          .try_push(who.clone())
          .map_err(|_| Error::<T>::QueueFull)?;
        Accounts::<T>::insert(
          &who,
          AccountRecord {
            stage,
            admitted_at: now,
          },
        );
        log::debug!(target: LOG_TARGET, "admitted {:?} as {:?}", who, stage);
        Self::deposit_event(Event::AccountAdmitted { who, stage });
      }
      UnstakeQueue::<T>::put(unstaking);
      RecoveryQueue::<T>::put(recovering);
      Ok(())
    }

    /// Remove accounts from whichever queue holds them.
    ///
    /// Accounts that are not tracked are ignored, so removing twice is harmless.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::remove(accounts.len() as u32))]
    pub fn remove(
      origin: OriginFor<T>,
      accounts: BoundedVec<T::AccountId, T::MaxAdmissionBatch>,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      for who in accounts.iter() {
        Self::do_remove(who);
      }
      Ok(())
    }

    /// Leave recovery for good.
    ///
    /// Must be signed by `account` itself. Works whether or not the account is queued and
    /// regardless of who controls `AdminOrigin`; afterwards `add` rejects the account.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::remove_me())]
    pub fn remove_me(origin: OriginFor<T>, account: T::AccountId) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(who == account, DispatchError::BadOrigin);
      Self::do_remove(&account);
      if !Exempted::<T>::contains_key(&account) {
        Exempted::<T>::insert(&account, frame_system::Pallet::<T>::block_number());
        log::info!(target: LOG_TARGET, "{:?} opted out of recovery", account);
        Self::deposit_event(Event::AccountExempted { who: account });
      }
      Ok(())
    }

    /// Release the stake of up to `n` accounts from the front of the unstake queue.
    ///
    /// Every visited account moves to the recovery queue, whether or not it still held stake.
    /// Fails if nothing was visited.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::unstake((*n).min(T::MaxBatchSize::get())))]
    pub fn unstake(origin: OriginFor<T>, n: u32) -> DispatchResult {
      ensure_signed(origin)?;
      ensure!(n <= T::MaxBatchSize::get(), Error::<T>::BatchTooLarge);
      let mut batch = UnstakeQueue::<T>::get().into_inner();
      let take = batch.len().min(n as usize);
      ensure!(take > 0, Error::<T>::UnstakeQueueEmpty);
      let remaining = batch.split_off(take);
      let mut recovering = RecoveryQueue::<T>::get();
      for who in batch {
        Self::release_stake(&who)?;
        recovering
          .try_push(who.clone())
          .map_err(|_| Error::<T>::QueueFull)?;
        Accounts::<T>::mutate(&who, |record| {
          if let Some(record) = record {
            record.stage = RecoveryStage::AwaitingRecovery;
          }
        });
        Self::deposit_event(Event::MovedToRecovery { who });
      }
      UnstakeQueue::<T>::put(QueueOf::<T>::truncate_from(remaining));
      RecoveryQueue::<T>::put(recovering);
      Ok(())
    }

    /// Sweep up to `n` accounts from the front of the recovery queue.
    ///
    /// An account with a pending refund gets the refund claimed and stays where it is; the
    /// slot still counts toward `n`. Every other visited account has its whole spendable
    /// balance moved to the custodial account and is forgotten. Fails if nothing was visited.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::recover((*n).min(T::MaxBatchSize::get())))]
    pub fn recover(origin: OriginFor<T>, n: u32) -> DispatchResult {
      ensure_signed(origin)?;
      ensure!(n <= T::MaxBatchSize::get(), Error::<T>::BatchTooLarge);
      let custodian = Self::account_id();
      let mut queue = RecoveryQueue::<T>::get().into_iter();
      let mut retained = Vec::new();
      let mut visited = 0u32;
      while visited < n {
        let Some(who) = queue.next() else { break };
        visited = visited.saturating_add(1);
        if T::Refunds::pending_refund(&who).is_some() {
          Self::claim_refund(&who);
          retained.push(who);
          continue;
        }
        let amount = Self::sweep_balance(&who, &custodian)?;
        Accounts::<T>::remove(&who);
        TotalRecovered::<T>::mutate(|total| *total = total.saturating_add(amount));
        Self::deposit_event(Event::AccountRecovered { who, amount });
      }
      ensure!(visited > 0, Error::<T>::RecoveryQueueEmpty);
      retained.extend(queue);
      RecoveryQueue::<T>::put(QueueOf::<T>::truncate_from(retained));
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Custodial account receiving every swept balance
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Current stage of `who`, or `None` if the account is not tracked
    pub fn stage_of(who: &T::AccountId) -> Option<RecoveryStage> {
      Accounts::<T>::get(who).map(|record| record.stage)
    }

    fn do_remove(who: &T::AccountId) -> Option<RecoveryStage> {
      let stage = Accounts::<T>::take(who)?.stage;
      let dequeue = |queue: &mut QueueOf<T>| queue.retain(|queued| queued != who);
      match stage {
        RecoveryStage::AwaitingUnstake => UnstakeQueue::<T>::mutate(dequeue),
        RecoveryStage::AwaitingRecovery => RecoveryQueue::<T>::mutate(dequeue),
      }
      log::debug!(target: LOG_TARGET, "removed {:?} from {:?}", who, stage);
      Self::deposit_event(Event::AccountRemoved {
        who: who.clone(),
        stage,
      });
      Some(stage)
    }

    fn release_stake(who: &T::AccountId) -> DispatchResult {
      match T::Staking::delegated(who) {
        Some(stake) if !stake.is_zero() => {
          T::Staking::undelegate(who, stake)?;
          log::debug!(
            target: LOG_TARGET,
            "undelegated {} from {:?}",
            stake.total(),
            who
          );
          Self::deposit_event(Event::StakeReleased {
            who: who.clone(),
            stake,
          });
        }
        _ => log::debug!(target: LOG_TARGET, "nothing to unstake for {:?}", who),
      }
      Ok(())
    }

    /// Claims in its own storage layer, so a refund that has not matured yet leaves no trace
    /// and does not abort the batch.
    fn claim_refund(who: &T::AccountId) {
      match with_storage_layer(|| T::Refunds::claim_refund(who)) {
        Ok(amount) => {
          log::debug!(
            target: LOG_TARGET,
            "claimed refund of {} for {:?}, skipping for now",
            amount,
            who
          );
          Self::deposit_event(Event::RefundClaimed {
            who: who.clone(),
            amount,
          });
        }
        Err(err) => {
          log::debug!(
            target: LOG_TARGET,
            "refund of {:?} not claimable yet: {:?}",
            who,
            err
          );
          Self::deposit_event(Event::RefundDeferred { who: who.clone() });
        }
      }
    }

    fn sweep_balance(
      who: &T::AccountId,
      custodian: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      let balance =
        T::Currency::reducible_balance(who, Preservation::Expendable, Fortitude::Polite);
      if balance.is_zero() {
        log::debug!(target: LOG_TARGET, "nothing to recover from {:?}", who);
        return Ok(Zero::zero());
      }
      T::Currency::transfer(who, custodian, balance, Preservation::Expendable)?;
      log::debug!(target: LOG_TARGET, "recovered {} from {:?}", balance, who);
      Ok(balance)
    }
  }

  /// Genesis configuration: the custodial account is kept alive without ED
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      // Custodial account survives zero native balance via provider reference
      frame_system::Pallet::<T>::inc_providers(&Pallet::<T>::account_id());
    }
  }
}
