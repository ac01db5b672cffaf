//! Cross-platform domain state: occasions, the upload gallery, and the
//! prediction reconciliation index.

pub mod occasion;
pub mod platform;
pub mod predictions;
pub mod timing;
pub mod uploads;
