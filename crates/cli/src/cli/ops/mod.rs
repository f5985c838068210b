pub mod init;
pub mod remote;
pub mod version;

pub use init::Init;
pub use remote::Remote;
pub use version::Version;
