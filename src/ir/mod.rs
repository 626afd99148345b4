//! 中間表現

pub mod translation;
