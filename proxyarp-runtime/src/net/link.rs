use crate::net::ConnectPoint;
use std::fmt;

/// A directed infrastructure link. Both ends of a live link are fabric ports.
#[derive(Eq, Clone, Hash, PartialEq, Debug)]
pub struct Link {
    src: ConnectPoint,
    dst: ConnectPoint,
}

impl Link {
    pub fn new(src: ConnectPoint, dst: ConnectPoint) -> Self {
        Link { src, dst }
    }

    pub fn src(&self) -> &ConnectPoint {
        &self.src
    }

    pub fn dst(&self) -> &ConnectPoint {
        &self.dst
    }

    /// Both endpoints, source first.
    pub fn endpoints(&self) -> [ConnectPoint; 2] {
        [self.src.clone(), self.dst.clone()]
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}
