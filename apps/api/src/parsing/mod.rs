// Document parsing: file bytes → raw text → sectioned Document.

pub mod formats;
pub mod sections;
