mod port_table;
pub use self::port_table::*;
