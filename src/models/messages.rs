use serde::{Deserialize, Serialize};

use crate::guestbook::{Focus, SurfaceView, form::FormState};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FeedbackClientMessage {
    Ping { ts: u64 },
    /// Pointer entered or left the carousel.
    Hover { active: bool },
    Next,
    Prev,
    Select { index: usize },
    FormName { value: String },
    FormComment { value: String },
    FormHover { star: u8 },
    FormLeave,
    FormStar { star: u8 },
    FormSubmit,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FeedbackServerMessage {
    Snapshot { view: SurfaceView },
    Focus { focus: Focus },
    Form { state: FormState },
    /// Blocking notice for the visitor, e.g. a rejected submission.
    Alert { message: String },
    Pong { ts: u64, pong: u64 },
    Error { message: String },
}
