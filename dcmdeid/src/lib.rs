//! DCMdeid de-identifies DICOM records. It resolves a tag policy against every
//! data element of a record, including those nested in sequences, and runs
//! batches of records through a reviewable template of replacement values.

mod integration_tests;

pub mod core {
  pub use dcmdeid_core::*;
}

pub mod json {
  pub use dcmdeid_json::*;
}

pub mod anonymize {
  pub use dcmdeid_anonymize::*;
}

pub mod batch {
  pub use dcmdeid_batch::*;
}
