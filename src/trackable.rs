// src/trackable.rs

/// Handle to a trackable by its public id (e.g. `TB123AB`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Trackable {
    pub tid: String,
}

impl Trackable {
    pub fn new(tid: impl Into<String>) -> Self {
        Self { tid: tid.into() }
    }
}
