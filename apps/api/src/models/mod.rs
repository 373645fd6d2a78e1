pub mod job;

pub use job::JobListing;
