//! Damage system - DamageEvent and the modifier pipeline

mod event;
mod pipeline;
mod thrust;

pub use event::{DamageEvent, DamageFlags};
pub(crate) use pipeline::{deal_damage, mitigate, Hit, Stage};
pub use thrust::thrust_magnitude;
