use volrelay::display::{DisplaySink, DisplayUpdate, Notice};

/// A display sink that records every update in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub updates: Vec<DisplayUpdate>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text appended since the last clear, concatenated.
    pub fn shown_text(&self) -> String {
        let start = self
            .updates
            .iter()
            .rposition(|u| matches!(u, DisplayUpdate::Clear))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.updates[start..]
            .iter()
            .filter_map(|u| match u {
                DisplayUpdate::AppendLine(l) => Some(l.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.updates
            .iter()
            .filter_map(|u| match u {
                DisplayUpdate::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn last_progress(&self) -> Option<u8> {
        self.progress_values().last().copied()
    }

    pub fn notices(&self) -> Vec<&Notice> {
        self.updates
            .iter()
            .filter_map(|u| match u {
                DisplayUpdate::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.notices()
            .into_iter()
            .filter(|n| n.is_error())
            .map(|n| n.message.as_str())
            .collect()
    }
}

impl DisplaySink for RecordingSink {
    fn clear(&mut self) {
        self.updates.push(DisplayUpdate::Clear);
    }

    fn append_line(&mut self, line: &str) {
        self.updates.push(DisplayUpdate::AppendLine(line.to_string()));
    }

    fn set_progress(&mut self, percent: u8) {
        self.updates.push(DisplayUpdate::Progress(percent));
    }

    fn notify(&mut self, notice: &Notice) {
        self.updates.push(DisplayUpdate::Notify(notice.clone()));
    }
}
