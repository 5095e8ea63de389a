pub mod candidate;
pub mod view;

pub use candidate::CandidateFile;
pub use view::FormView;
