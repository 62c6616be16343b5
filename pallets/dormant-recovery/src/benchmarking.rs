extern crate alloc;

use crate::*;
use alloc::vec::Vec;
use frame::deps::frame_benchmarking::{account, v2::*};
use frame::deps::frame_support::traits::{EnsureOrigin, fungible::Mutate as NativeMutate};
use frame::deps::frame_system::{self, RawOrigin};
use frame::prelude::*;
use primitives::{DelegatedStake, ecosystem::params::PRECISION};

const SEED: u32 = 0;

fn accounts_named<T: Config>(name: &'static str, count: u32) -> Vec<T::AccountId> {
  (0..count).map(|i| account(name, i, SEED)).collect()
}

fn delegate<T: Config>(who: &T::AccountId) {
  T::BenchmarkHelper::delegate(who, DelegatedStake::new(PRECISION, PRECISION))
    .expect("benchmark helper must be able to delegate");
}

// Appends records and queue entries directly, bypassing the admission batch bound.
fn enqueue<T: Config>(accounts: &[T::AccountId], stage: RecoveryStage) {
  let admitted_at = frame_system::Pallet::<T>::block_number();
  for who in accounts {
    Accounts::<T>::insert(who, AccountRecord { stage, admitted_at });
  }
  let extend = |queue: &mut QueueOf<T>| {
    for who in accounts {
      queue
        .try_push(who.clone())
        .expect("benchmark seeding stays within MaxQueueLength");
    }
  };
  match stage {
    RecoveryStage::AwaitingUnstake => UnstakeQueue::<T>::mutate(extend),
    RecoveryStage::AwaitingRecovery => RecoveryQueue::<T>::mutate(extend),
  }
}

// Untouched entries that keep the queues at `MaxQueueLength` once `reserved` more are tracked.
fn fill<T: Config>(reserved: u32, stage: RecoveryStage) {
  let fillers = accounts_named::<T>("filler", T::MaxQueueLength::get().saturating_sub(reserved));
  enqueue::<T>(&fillers, stage);
}

fn batch_bound<T: Config>() -> u32 {
  T::MaxBatchSize::get().min(T::MaxQueueLength::get())
}

#[benchmarks]
mod benches {
  use super::*;

  // Worst case: every account holds stake and lands behind a nearly full queue.
  #[benchmark]
  fn add(a: Linear<1, { T::MaxAdmissionBatch::get() }>) -> Result<(), BenchmarkError> {
    let origin = T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    fill::<T>(a, RecoveryStage::AwaitingUnstake);
    let accounts = accounts_named::<T>("admitted", a);
    accounts.iter().for_each(delegate::<T>);
    let batch = BoundedVec::truncate_from(accounts.clone());

    #[extrinsic_call]
    add(origin as T::RuntimeOrigin, batch);

    let queue = UnstakeQueue::<T>::get();
    assert_eq!(queue.len() as u32, T::MaxQueueLength::get());
    assert!(accounts.iter().all(|who| queue.contains(who)));
    Ok(())
  }

  // Removed accounts sit at the back of a full queue.
  #[benchmark]
  fn remove(a: Linear<1, { T::MaxAdmissionBatch::get() }>) -> Result<(), BenchmarkError> {
    let origin = T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    fill::<T>(a, RecoveryStage::AwaitingRecovery);
    let accounts = accounts_named::<T>("removed", a);
    enqueue::<T>(&accounts, RecoveryStage::AwaitingRecovery);
    let batch = BoundedVec::truncate_from(accounts);

    #[extrinsic_call]
    remove(origin as T::RuntimeOrigin, batch);

    assert_eq!(
      RecoveryQueue::<T>::get().len() as u32,
      T::MaxQueueLength::get().saturating_sub(a)
    );
    Ok(())
  }

  // The caller sits at the back of a full unstake queue.
  #[benchmark]
  fn remove_me() {
    fill::<T>(1, RecoveryStage::AwaitingUnstake);
    let caller: T::AccountId = whitelisted_caller();
    enqueue::<T>(&[caller.clone()], RecoveryStage::AwaitingUnstake);

    #[extrinsic_call]
    remove_me(RawOrigin::Signed(caller.clone()), caller.clone());

    assert!(Exempted::<T>::contains_key(&caller));
    assert!(!UnstakeQueue::<T>::get().contains(&caller));
  }

  // The batch is at the front; the rest of the full queue is rewritten behind it.
  #[benchmark]
  fn unstake(n: Linear<1, { batch_bound::<T>() }>) {
    let caller: T::AccountId = whitelisted_caller();
    let accounts = accounts_named::<T>("unstaked", n);
    accounts.iter().for_each(delegate::<T>);
    enqueue::<T>(&accounts, RecoveryStage::AwaitingUnstake);
    fill::<T>(n, RecoveryStage::AwaitingUnstake);

    #[extrinsic_call]
    unstake(RawOrigin::Signed(caller), n);

    assert_eq!(
      UnstakeQueue::<T>::get().len() as u32,
      T::MaxQueueLength::get().saturating_sub(n)
    );
    assert_eq!(RecoveryQueue::<T>::get().len(), n as usize);
  }

  // Every visited account holds a balance, so each one costs a transfer.
  #[benchmark]
  fn recover(n: Linear<1, { batch_bound::<T>() }>) {
    let caller: T::AccountId = whitelisted_caller();
    let accounts = accounts_named::<T>("swept", n);
    for who in &accounts {
      T::Currency::mint_into(who, PRECISION).expect("minting into a fresh account works");
    }
    enqueue::<T>(&accounts, RecoveryStage::AwaitingRecovery);
    fill::<T>(n, RecoveryStage::AwaitingRecovery);

    #[extrinsic_call]
    recover(RawOrigin::Signed(caller), n);

    assert_eq!(
      RecoveryQueue::<T>::get().len() as u32,
      T::MaxQueueLength::get().saturating_sub(n)
    );
    assert_eq!(
      TotalRecovered::<T>::get(),
      PRECISION.saturating_mul(n as u128)
    );
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
