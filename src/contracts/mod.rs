pub mod error;
pub mod locale;
pub mod record;
pub mod sequence;

pub use error::{LockResultExt, SequenceError, StoreError, SysrefError};
pub use locale::{LocalizedValue, TextDirection};
pub use record::{needs_reference, parse_reference, Record, RecordStore, ScanTarget};
pub use sequence::SequenceStore;
