// Client-side half of the upload flow: validation, the file picker model, and
// the drop zone state machine. Network access goes through `transport`.

pub mod dropzone;
pub mod picker;
pub mod validator;

pub use dropzone::{DropZone, InteractionState, Selection, UploadTicket};
pub use validator::{validate, Rejection, Verdict};
