pub mod proposal;
pub mod rfp;
pub mod vendor;

pub use proposal::ProposalRow;
pub use rfp::{RfpRow, RfpStatus};
pub use vendor::VendorRow;
