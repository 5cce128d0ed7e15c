//! Assessment Extraction Pipeline
//!
//! Everything that happens to an interview after the conversation itself:
//! naming the candidate, writing the report document, and turning stored
//! reports back into structured score data. Nothing here touches a live
//! session; the parser and listing work only from files on disk.

pub mod listing;
pub mod name;
pub mod parser;
pub mod report;
pub mod score;

pub use listing::{list_reports, ListingQuery, SortBy, SortOrder};
pub use name::{extract_name, extract_name_locally};
pub use parser::{parse_narrative, parse_report_file, parse_report_text, AssessmentRecord, NarrativeScores};
pub use report::{ReportDraft, ReportStore};
pub use score::extract_score;
