// Workflow Module - the mood-music pipeline controller
//
// The controller owns the session state and talks to the outside world only
// through the traits in `traits`, so every collaborator can be mocked.

pub mod controller;
pub mod errors;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod mocks;


pub use controller::WorkflowController;
pub use errors::{RemoteCallError, ValidationError, WorkflowError};
pub use traits::{EmotionAnalyzer, ImageSource, Notifier, SongRecommender};
#[cfg(any(test, feature = "testing"))]
pub use traits::MockNotifier;
pub use types::{
    ActionOutcome, CallTarget, EmotionAnalysis, ImageInfo, SelectedImage, WorkflowPhase,
    WorkflowSnapshot,
};
