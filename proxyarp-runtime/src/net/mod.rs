mod device;
pub use self::device::*;

mod link;
pub use self::link::*;

mod host;
pub use self::host::*;
