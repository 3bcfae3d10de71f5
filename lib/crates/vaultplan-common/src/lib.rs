pub mod desired_state;
pub mod facts;

pub use desired_state::{DesiredState, InstallMethod, ListenerSpec, ServiceEnsure, Stanza};
pub use facts::{NodeFacts, OsFamily, ServiceProvider};
