#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use codec::MaxEncodedLen;
use core::marker::PhantomData;
use polkadot_sdk::frame_support::{
  traits::Get,
  weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
  fn add(a: u32) -> Weight;
  fn remove(a: u32) -> Weight;
  fn remove_me() -> Weight;
  fn unstake(n: u32) -> Weight;
  fn recover(n: u32) -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);

impl<T: polkadot_sdk::frame_system::Config + crate::Config> SubstrateWeight<T> {
  // Proof size of one queue decoded and re-encoded in full.
  fn queue_proof() -> u64 {
    crate::QueueOf::<T>::max_encoded_len() as u64
  }

  // Linear scan over a full queue (`retain`, `contains`).
  fn queue_scan() -> Weight {
    Weight::from_parts(60_000, 0).saturating_mul(u64::from(T::MaxQueueLength::get()))
  }
}

impl<T: polkadot_sdk::frame_system::Config + crate::Config> WeightInfo for SubstrateWeight<T> {
  // Per account: exemption, record, stake query. Both queues are read and written once.
  fn add(a: u32) -> Weight {
    Weight::from_parts(18_000_000, 4000)
      .saturating_add(Weight::from_parts(0, Self::queue_proof().saturating_mul(2)))
      .saturating_add(Weight::from_parts(12_000_000, 1500).saturating_mul(a.into()))
      .saturating_add(T::DbWeight::get().reads(2))
      .saturating_add(T::DbWeight::get().reads((3_u64).saturating_mul(a.into())))
      .saturating_add(T::DbWeight::get().writes(2))
      .saturating_add(T::DbWeight::get().writes((1_u64).saturating_mul(a.into())))
  }

  // Per account: record removal and a scan of the queue holding it.
  fn remove(a: u32) -> Weight {
    Weight::from_parts(18_000_000, 4000)
      .saturating_add(Weight::from_parts(0, Self::queue_proof().saturating_mul(2)))
      .saturating_add(Weight::from_parts(9_000_000, 600).saturating_mul(a.into()))
      .saturating_add(Self::queue_scan().saturating_mul(a.into()))
      .saturating_add(T::DbWeight::get().reads((2_u64).saturating_mul(a.into())))
      .saturating_add(T::DbWeight::get().writes((2_u64).saturating_mul(a.into())))
  }

  // One queue scanned and rewritten, plus a new `Exempted` key.
  fn remove_me() -> Weight {
    Weight::from_parts(24_000_000, 4000)
      .saturating_add(Weight::from_parts(0, Self::queue_proof()))
      .saturating_add(Self::queue_scan())
      .saturating_add(T::DbWeight::get().reads(3))
      .saturating_add(T::DbWeight::get().writes(3))
  }

  // Per entry: stake query, undelegation, record update. Both queues are rewritten.
  fn unstake(n: u32) -> Weight {
    Weight::from_parts(20_000_000, 4000)
      .saturating_add(Weight::from_parts(0, Self::queue_proof().saturating_mul(2)))
      .saturating_add(Weight::from_parts(35_000_000, 3000).saturating_mul(n.into()))
      .saturating_add(T::DbWeight::get().reads(2))
      .saturating_add(T::DbWeight::get().reads((4_u64).saturating_mul(n.into())))
      .saturating_add(T::DbWeight::get().writes(2))
      .saturating_add(T::DbWeight::get().writes((4_u64).saturating_mul(n.into())))
  }

  // Per entry: refund query and claim, or balance query, transfer and record removal.
  fn recover(n: u32) -> Weight {
    Weight::from_parts(20_000_000, 4000)
      .saturating_add(Weight::from_parts(0, Self::queue_proof()))
      .saturating_add(Weight::from_parts(45_000_000, 3600).saturating_mul(n.into()))
      .saturating_add(T::DbWeight::get().reads(2))
      .saturating_add(T::DbWeight::get().reads((4_u64).saturating_mul(n.into())))
      .saturating_add(T::DbWeight::get().writes(2))
      .saturating_add(T::DbWeight::get().writes((4_u64).saturating_mul(n.into())))
  }
}

impl WeightInfo for () {
  fn add(a: u32) -> Weight {
    Weight::from_parts(18_000_000, 4000)
      .saturating_add(Weight::from_parts(12_000_000, 1500).saturating_mul(a.into()))
  }

  fn remove(a: u32) -> Weight {
    Weight::from_parts(18_000_000, 4000)
      .saturating_add(Weight::from_parts(9_000_000, 600).saturating_mul(a.into()))
  }

  fn remove_me() -> Weight {
    Weight::from_parts(24_000_000, 4000)
  }

  fn unstake(n: u32) -> Weight {
    Weight::from_parts(20_000_000, 4000)
      .saturating_add(Weight::from_parts(35_000_000, 3000).saturating_mul(n.into()))
  }

  fn recover(n: u32) -> Weight {
    Weight::from_parts(20_000_000, 4000)
      .saturating_add(Weight::from_parts(45_000_000, 3600).saturating_mul(n.into()))
  }
}
