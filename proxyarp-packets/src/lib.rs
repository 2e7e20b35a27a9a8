mod types;
pub use self::types::*;

mod ip_address;
pub use self::ip_address::*;

mod ethernet;
pub use self::ethernet::*;

mod arp;
pub use self::arp::*;
