#![forbid(unsafe_code)]

pub mod catalog_service;
pub mod config_service;
pub mod error;
pub mod export_service;
pub mod generator;
pub mod pool_service;
pub mod quiz_flow;
pub mod results_view;
pub mod session_service;

pub use quiz_core::Clock;

pub use catalog_service::{CatalogService, NoteTypeInfo};
pub use config_service::{ConfigService, FieldDefaults, resolve_defaults};
pub use error::{ExportError, PoolError, QuizError, QuizFlowError, SessionError};
pub use export_service::{export_results, render_results};
pub use generator::QuizGenerator;
pub use pool_service::{PoolRequest, PoolService};
pub use quiz_flow::{QuizFlow, QuizFlowService, StartRequest};
pub use results_view::{ResultRow, ResultsView, strip_markup};
pub use session_service::{AnswerOutcome, PageView, QuizSession};
