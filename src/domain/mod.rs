//! Domain logic - publish inputs and rules independent of the version-control backend

pub mod remote;
pub mod session;

pub use remote::RemoteUrl;
pub use session::{PublishMode, PublishSession};
