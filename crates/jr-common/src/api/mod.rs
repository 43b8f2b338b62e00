pub mod profile;
pub mod search_request;
pub mod search_response;

pub use profile::{CvParseRequest, CvParseResponse, ProfileUpsertRequest};
pub use search_request::SearchRequest;
pub use search_response::{IngestAck, RankedJob, SearchResponse};
