// Adapters layer: concrete record sources behind the RecordSource port.

pub mod remote;
pub mod static_source;

pub use remote::RemoteSource;
pub use static_source::StaticSource;
