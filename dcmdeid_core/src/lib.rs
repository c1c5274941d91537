//! Core types for working with DICOM data sets in DCMdeid: data element tags,
//! value representations, data element values, data sets, and the paths used
//! to locate data elements inside nested sequences.

pub mod data_element_tag;
pub mod data_element_value;
pub mod data_error;
pub mod data_set;
pub mod data_set_path;
pub mod dictionary;
pub mod error;
pub mod value_representation;

pub use data_element_tag::DataElementTag;
pub use data_element_value::DataElementValue;
pub use data_error::DataError;
pub use data_set::DataSet;
pub use data_set_path::DataSetPath;
pub use error::{DcmdeidError, print_error_lines, print_warning};
pub use value_representation::ValueRepresentation;
