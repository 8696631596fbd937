#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EncodingState {
    Started,
    Finished,
}

/// Encoding lifecycle of a single item: unset -> started -> finished,
/// or back to unset when the encoding is canceled.
#[derive(Clone, Debug, Default)]
pub struct EncodingInfo {
    state: Option<EncodingState>,
    progress: f32,
}

impl EncodingInfo {
    pub fn new() -> Self {
        EncodingInfo {
            state: None,
            progress: 0.0,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn encoding_in_progress(&self) -> bool {
        self.state == Some(EncodingState::Started)
    }

    pub fn conversion_finished(&self) -> bool {
        self.state == Some(EncodingState::Finished)
    }

    pub fn on_encoding_started(&mut self) {
        assert!(self.state.is_none(), "Bad encoding state: {:?}, must be unset", self.state);
        self.state = Some(EncodingState::Started);
    }

    pub fn update_encoding_progress(&mut self, progress: f32) {
        self.assert_started();
        self.progress = progress;
    }

    pub fn on_encoding_canceled(&mut self) {
        self.assert_started();
        self.state = None;
        self.progress = 0.0;
    }

    pub fn on_encoding_finished(&mut self) {
        self.assert_started();
        self.state = Some(EncodingState::Finished);
        self.progress = 0.0;
    }

    fn assert_started(&self) {
        assert!(
            self.state == Some(EncodingState::Started),
            "Bad encoding state: {:?}, must be Started",
            self.state
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_resets_progress() {
        let mut info = EncodingInfo::new();
        info.on_encoding_started();
        assert!(info.encoding_in_progress());
        info.update_encoding_progress(0.25);
        info.update_encoding_progress(0.75);
        assert_eq!(info.progress(), 0.75);
        info.on_encoding_finished();
        assert_eq!(info.progress(), 0.0);
        assert!(info.conversion_finished());
        assert!(!info.encoding_in_progress());
    }

    #[test]
    fn test_cancel_resets_state_and_progress() {
        let mut info = EncodingInfo::new();
        info.on_encoding_started();
        info.update_encoding_progress(0.5);
        info.on_encoding_canceled();
        assert_eq!(info.progress(), 0.0);
        assert!(!info.encoding_in_progress());
        assert!(!info.conversion_finished());

        // a canceled item may be started again
        info.on_encoding_started();
        assert!(info.encoding_in_progress());
    }

    #[test]
    #[should_panic(expected = "must be Started")]
    fn test_cancel_before_start_panics() {
        EncodingInfo::new().on_encoding_canceled();
    }

    #[test]
    #[should_panic(expected = "must be Started")]
    fn test_progress_before_start_panics() {
        EncodingInfo::new().update_encoding_progress(0.1);
    }

    #[test]
    #[should_panic(expected = "must be Started")]
    fn test_finish_twice_panics() {
        let mut info = EncodingInfo::new();
        info.on_encoding_started();
        info.on_encoding_finished();
        info.on_encoding_finished();
    }

    #[test]
    #[should_panic(expected = "must be unset")]
    fn test_start_twice_panics() {
        let mut info = EncodingInfo::new();
        info.on_encoding_started();
        info.on_encoding_started();
    }
}
