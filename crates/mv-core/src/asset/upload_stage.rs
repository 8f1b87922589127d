//! Upload pipeline stages.
//! 上传流水线状态。
//!
//! `ReceivingFile -> Validating -> WritingBlob -> RecordingMetadata -> Complete`,
//! any stage except `Complete` may exit to `Rejected`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadStage {
    ReceivingFile,
    Validating,
    WritingBlob,
    RecordingMetadata,
    Complete,
    Rejected(RejectedAt),
}

/// The stage a rejected upload was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectedAt {
    ReceivingFile,
    Validating,
    WritingBlob,
    RecordingMetadata,
}

impl UploadStage {
    /// The next stage on the success path. Terminal stages stay put.
    pub fn advance(self) -> Self {
        match self {
            Self::ReceivingFile => Self::Validating,
            Self::Validating => Self::WritingBlob,
            Self::WritingBlob => Self::RecordingMetadata,
            Self::RecordingMetadata => Self::Complete,
            terminal => terminal,
        }
    }

    pub fn reject(self) -> Self {
        match self {
            Self::ReceivingFile => Self::Rejected(RejectedAt::ReceivingFile),
            Self::Validating => Self::Rejected(RejectedAt::Validating),
            Self::WritingBlob => Self::Rejected(RejectedAt::WritingBlob),
            Self::RecordingMetadata => Self::Rejected(RejectedAt::RecordingMetadata),
            terminal => terminal,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Rejected(_))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReceivingFile => "receiving_file",
            Self::Validating => "validating",
            Self::WritingBlob => "writing_blob",
            Self::RecordingMetadata => "recording_metadata",
            Self::Complete => "complete",
            Self::Rejected(_) => "rejected",
        }
    }
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(at) => write!(f, "rejected({at:?})"),
            other => f.write_str(other.as_str()),
        }
    }
}
