mod add;
mod play;
mod questions;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use add::AddQuestionView;
pub use play::PlayView;
pub use questions::QuestionsView;
pub use state::{view_state_from_resource, ViewError, ViewState};
