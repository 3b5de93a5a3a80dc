pub mod document;
pub mod error;
pub mod record;
pub mod resolve;

pub use document::{DataPackageDocument, FieldDefinition, FieldType, Resource, Schema};
pub use error::{DocumentError, Result};
pub use record::RowRecord;
pub use resolve::{ResolvedSchema, resolve};
