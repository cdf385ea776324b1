//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod push;

pub(crate) use check::CheckArgs;
pub(crate) use push::PushArgs;
