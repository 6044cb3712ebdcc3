mod job;
mod job_id;
mod job_status;
mod product;
mod raw_content;

pub use job::{Job, JobSummary};
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use product::{
    Product, ProductDraft, ProductSpecifications, ProductValidationError, SpecificationsDraft,
    parse_price,
};
pub use raw_content::RawContent;
