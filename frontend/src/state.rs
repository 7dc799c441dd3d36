use shared::ClassificationResult;

/// Client-side lifecycle of one image. `F` is whatever handle the view keeps
/// for the selected file (a browser `File` plus its preview URL in the app).
#[derive(Debug)]
pub enum UploadState<F> {
    Empty,
    Previewing {
        image: F,
    },
    Analyzing {
        image: F,
    },
    ResultShown {
        image: F,
        result: ClassificationResult,
    },
}

impl<F> Default for UploadState<F> {
    fn default() -> Self {
        UploadState::Empty
    }
}

impl<F> UploadState<F> {
    /// Replaces any current image. Ignored while a request is in flight.
    pub fn select(&mut self, image: F) -> bool {
        if self.is_analyzing() {
            return false;
        }
        *self = UploadState::Previewing { image };
        true
    }

    /// Moves to `Analyzing` and hands back the image to submit.
    pub fn begin_analysis(&mut self) -> Option<&F> {
        let image = match std::mem::take(self) {
            UploadState::Previewing { image } | UploadState::ResultShown { image, .. } => image,
            other => {
                *self = other;
                return None;
            }
        };
        *self = UploadState::Analyzing { image };
        self.image()
    }

    /// Completes the in-flight analysis. A completion that arrives in any
    /// other state is dropped.
    pub fn finish(&mut self, result: ClassificationResult) -> bool {
        match std::mem::take(self) {
            UploadState::Analyzing { image } => {
                *self = UploadState::ResultShown { image, result };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Back to `Empty`, dropping preview and result. In-flight requests
    /// cannot be cancelled, so this is ignored while analyzing.
    pub fn clear(&mut self) -> bool {
        match self {
            UploadState::Empty | UploadState::Analyzing { .. } => false,
            _ => {
                *self = UploadState::Empty;
                true
            }
        }
    }

    pub fn image(&self) -> Option<&F> {
        match self {
            UploadState::Empty => None,
            UploadState::Previewing { image }
            | UploadState::Analyzing { image }
            | UploadState::ResultShown { image, .. } => Some(image),
        }
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            UploadState::ResultShown { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, UploadState::Analyzing { .. })
    }

    pub fn can_analyze(&self) -> bool {
        matches!(
            self,
            UploadState::Previewing { .. } | UploadState::ResultShown { .. }
        )
    }
}
