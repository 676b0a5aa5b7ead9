//! Actor (mobj) data model: mobjinfo/state tables and the full/static
//! tagged-union actor representation.

pub mod actor;
pub mod constants;
pub mod info;

pub use actor::{remove_mobj, spawn_mobj, set_mobj_state, Mobj, MobjKind, MobjPosition, MobjSpawnArgs, SetStateResult};
pub use info::{mobjinfo, state, Action, MobjFlags, MobjInfo, MobjType, State, StateId};
