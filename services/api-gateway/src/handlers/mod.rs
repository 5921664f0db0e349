pub mod charts;
pub mod chat;
pub mod health;
pub mod history;
pub mod upload;

pub use charts::*;
pub use chat::*;
pub use health::*;
pub use history::*;
pub use upload::*;

use insight_utils::InsightError;

pub(crate) fn store_error(error: anyhow::Error) -> InsightError {
    InsightError::database(format!("{:#}", error))
}
